//! Integration tests for the crawler
//!
//! These tests use wiremock to serve GBK-encoded listing and detail pages and
//! run the full crawl cycle end-to-end against temporary store files.

mod common;

use common::{
    block_page, detail_page, gbk_page, lines, listing_page, serve, test_config, test_store,
};
use reel_harvest::crawler::crawl;
use reel_harvest::{FailedRecord, RecordStore};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SOURCE: &str = "/html/gndy/dyzz/";

/// Serves a two-page listing with three detail pages
async fn serve_two_page_listing(server: &MockServer) {
    serve(
        server,
        "/html/gndy/dyzz/index.html",
        &listing_page(&[("/i/101.html", "流浪地球"), ("/i/102.html", "满江红")], 2),
    )
    .await;
    serve(
        server,
        "/html/gndy/dyzz/index_2.html",
        &listing_page(&[("/i/103.html", "独行月球")], 2),
    )
    .await;

    serve(
        server,
        "/i/101.html",
        &detail_page("流浪地球", Some("magnet:?xt=urn:btih:AAA101")),
    )
    .await;
    serve(
        server,
        "/i/102.html",
        &detail_page("满江红", Some("ftp://dl.example.net/102.mkv")),
    )
    .await;
    serve(server, "/i/103.html", &detail_page("独行月球", None)).await;
}

#[tokio::test]
async fn test_full_crawl_two_pages() {
    let server = MockServer::start().await;
    serve_two_page_listing(&server).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &[SOURCE], dir.path());
    let store = test_store(&config);

    let summary = crawl(config.clone(), test_store(&config), 1).await.unwrap();

    assert_eq!(summary.sources_visited, 1);
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.records_added, 3);
    assert_eq!(summary.records_without_link, 1);
    assert_eq!(summary.records_failed, 0);

    let movies = store.read_movies().unwrap();
    assert_eq!(movies.len(), 3);

    assert_eq!(movies[0].title, "流浪地球");
    assert_eq!(movies[0].detail_url, format!("{}/i/101.html", server.uri()));
    assert_eq!(
        movies[0].download_link.as_deref(),
        Some("magnet:?xt=urn:btih:AAA101")
    );
    assert_eq!(
        movies[1].download_link.as_deref(),
        Some("ftp://dl.example.net/102.mkv")
    );
    assert_eq!(movies[2].title, "独行月球");
    assert_eq!(movies[2].download_link, None);

    let movie_lines = lines(store.movies_path());
    assert_eq!(movie_lines[0], "Title,DetailUrl,DownloadLink");
    assert_eq!(
        movie_lines[3],
        format!("\"独行月球\",\"{}/i/103.html\",\"\"", server.uri())
    );

    assert!(store.read_failed().unwrap().is_empty());
}

#[tokio::test]
async fn test_rerun_adds_no_duplicates() {
    let server = MockServer::start().await;
    serve_two_page_listing(&server).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &[SOURCE], dir.path());

    crawl(config.clone(), test_store(&config), 1).await.unwrap();
    let before = lines(test_store(&config).movies_path());

    let second = crawl(config.clone(), test_store(&config), 1).await.unwrap();
    assert_eq!(second.records_added, 0);
    assert_eq!(second.records_skipped, 3);

    let after = lines(test_store(&config).movies_path());
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_listing_repeats_link_only_fetched_once() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/html/gndy/dyzz/index.html",
        &listing_page(&[("/i/101.html", "流浪地球")], 2),
    )
    .await;
    serve(
        &server,
        "/html/gndy/dyzz/index_2.html",
        &listing_page(&[("/i/101.html", "流浪地球")], 2),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/i/101.html"))
        .respond_with(gbk_page(&detail_page(
            "流浪地球",
            Some("magnet:?xt=urn:btih:AAA101"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &[SOURCE], dir.path());

    let summary = crawl(config.clone(), test_store(&config), 1).await.unwrap();
    assert_eq!(summary.records_added, 1);
    assert_eq!(summary.records_skipped, 1);
}

#[tokio::test]
async fn test_unresolvable_details_go_to_failed_store() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/html/gndy/dyzz/index.html",
        &listing_page(
            &[
                ("/i/201.html", "消失的她"),
                ("/i/202.html", "封神"),
                ("/i/203.html", "长安三万里"),
            ],
            1,
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/i/201.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    serve(&server, "/i/202.html", &block_page()).await;
    serve(
        &server,
        "/i/203.html",
        &detail_page("长安三万里", Some("magnet:?xt=urn:btih:CCC203")),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &[SOURCE], dir.path());
    let store = test_store(&config);

    let summary = crawl(config.clone(), test_store(&config), 1).await.unwrap();
    assert_eq!(summary.records_added, 1);
    assert_eq!(summary.records_failed, 2);

    let failed = store.read_failed().unwrap();
    assert_eq!(
        failed,
        vec![
            FailedRecord::new("消失的她", format!("{}/i/201.html", server.uri())),
            FailedRecord::new("封神", format!("{}/i/202.html", server.uri())),
        ]
    );

    let movies = store.read_movies().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "长安三万里");
}

#[tokio::test]
async fn test_transient_error_is_retried() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/html/gndy/dyzz/index.html",
        &listing_page(&[("/i/301.html", "热辣滚烫")], 1),
    )
    .await;

    // First request fails, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/i/301.html"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    serve(
        &server,
        "/i/301.html",
        &detail_page("热辣滚烫", Some("magnet:?xt=urn:btih:DDD301")),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &[SOURCE], dir.path());

    let summary = crawl(config.clone(), test_store(&config), 1).await.unwrap();
    assert_eq!(summary.records_added, 1);
    assert_eq!(summary.records_failed, 0);

    let requests = server.received_requests().await.unwrap();
    let detail_requests = requests
        .iter()
        .filter(|r| r.url.path() == "/i/301.html")
        .count();
    assert_eq!(detail_requests, 2);
}

#[tokio::test]
async fn test_start_page_skips_earlier_items() {
    let server = MockServer::start().await;
    serve_two_page_listing(&server).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &[SOURCE], dir.path());
    let store = test_store(&config);

    let summary = crawl(config.clone(), test_store(&config), 2).await.unwrap();
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.records_added, 1);

    let movies = store.read_movies().unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "独行月球");
}

#[tokio::test]
async fn test_unreachable_source_is_skipped() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/5/",
        &listing_page(&[("/i/501.html", "年会不能停")], 1),
    )
    .await;
    serve(
        &server,
        "/i/501.html",
        &detail_page("年会不能停", Some("magnet:?xt=urn:btih:EEE501")),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &["/html/missing/", "/5/"], dir.path());

    let summary = crawl(config.clone(), test_store(&config), 1).await.unwrap();
    assert_eq!(summary.sources_skipped, 1);
    assert_eq!(summary.sources_visited, 1);
    assert_eq!(summary.records_added, 1);
}

#[tokio::test]
async fn test_failed_listing_page_is_skipped() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/html/gndy/dyzz/index.html",
        &listing_page(&[("/i/101.html", "流浪地球")], 3),
    )
    .await;
    serve(
        &server,
        "/html/gndy/dyzz/index_3.html",
        &listing_page(&[("/i/103.html", "独行月球")], 3),
    )
    .await;
    serve(
        &server,
        "/i/101.html",
        &detail_page("流浪地球", Some("magnet:?xt=urn:btih:AAA101")),
    )
    .await;
    serve(
        &server,
        "/i/103.html",
        &detail_page("独行月球", Some("magnet:?xt=urn:btih:AAA103")),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &[SOURCE], dir.path());

    let summary = crawl(config.clone(), test_store(&config), 1).await.unwrap();
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.pages_failed, 1);
    assert_eq!(summary.records_added, 2);
}

#[tokio::test]
async fn test_failing_link_attempted_once_per_run() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/html/gndy/dyzz/index.html",
        &listing_page(&[("/i/9.html", "第二十条")], 2),
    )
    .await;
    serve(
        &server,
        "/html/gndy/dyzz/index_2.html",
        &listing_page(&[("/i/9.html", "第二十条")], 2),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &[SOURCE], dir.path());
    let store = test_store(&config);

    // One resolution, retried up to the attempt limit
    Mock::given(method("GET"))
        .and(path("/i/9.html"))
        .respond_with(ResponseTemplate::new(404))
        .expect(u64::from(config.fetch.max_attempts))
        .mount(&server)
        .await;

    let summary = crawl(config.clone(), test_store(&config), 1).await.unwrap();
    assert_eq!(summary.records_failed, 1);
    assert_eq!(summary.records_skipped, 1);
    assert_eq!(store.read_failed().unwrap().len(), 1);
}
