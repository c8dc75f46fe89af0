//! Integration tests for the repair pass
//!
//! Stores are seeded directly, then the repair pass runs against wiremock
//! detail pages.

mod common;

use common::{detail_page, gbk_page, lines, serve, test_config, test_store};
use reel_harvest::crawler::repair;
use reel_harvest::{FailedRecord, MovieRecord, RecordStore};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn detail_url(server: &MockServer, id: u32) -> String {
    format!("{}/i/{}.html", server.uri(), id)
}

#[tokio::test]
async fn test_replays_pending_failed_entries() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/i/2.html",
        &detail_page("满江红", Some("magnet:?xt=urn:btih:BBB2")),
    )
    .await;

    // Already stored, so never refetched
    Mock::given(method("GET"))
        .and(path("/i/1.html"))
        .respond_with(gbk_page(&detail_page("流浪地球", None)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &[], dir.path());
    let store = test_store(&config);
    store.init().unwrap();

    store
        .append_movie(&MovieRecord::new(
            "流浪地球",
            detail_url(&server, 1),
            Some("magnet:?xt=urn:btih:AAA1".to_string()),
        ))
        .unwrap();
    store
        .append_failed(&FailedRecord::new("流浪地球", detail_url(&server, 1)))
        .unwrap();
    store
        .append_failed(&FailedRecord::new("满江红", detail_url(&server, 2)))
        .unwrap();
    store
        .append_failed(&FailedRecord::new("满江红", detail_url(&server, 2)))
        .unwrap();

    let summary = repair(config.clone(), test_store(&config)).await.unwrap();
    assert_eq!(summary.failed_pending, 1);
    assert_eq!(summary.failed_recovered, 1);
    assert!(!summary.rewritten);

    let movies = store.read_movies().unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(
        movies[1],
        MovieRecord::new(
            "满江红",
            detail_url(&server, 2),
            Some("magnet:?xt=urn:btih:BBB2".to_string())
        )
    );

    // The failed store is an append-only log
    assert_eq!(store.read_failed().unwrap().len(), 3);
}

#[tokio::test]
async fn test_recovered_entry_without_link_is_kept() {
    let server = MockServer::start().await;
    serve(&server, "/i/7.html", &detail_page("封神", None)).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &[], dir.path());
    let store = test_store(&config);
    store
        .append_failed(&FailedRecord::new("", detail_url(&server, 7)))
        .unwrap();

    let summary = repair(config.clone(), test_store(&config)).await.unwrap();
    assert_eq!(summary.failed_recovered, 1);

    // Appended without a link, then counted as incomplete by the second pass
    assert_eq!(summary.incomplete_found, 1);
    assert_eq!(summary.incomplete_fixed, 0);

    let movies = store.read_movies().unwrap();
    assert_eq!(movies, vec![MovieRecord::new("封神", detail_url(&server, 7), None)]);
}

#[tokio::test]
async fn test_amends_incomplete_records_in_place() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/i/11.html",
        &detail_page("独行月球", Some("magnet:?xt=urn:btih:CCC11")),
    )
    .await;
    serve(
        &server,
        "/i/12.html",
        &detail_page("热辣滚烫", Some("ftp://dl.example.net/12.mkv")),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &[], dir.path());
    let store = test_store(&config);

    let complete = MovieRecord::new(
        "长安三万里",
        detail_url(&server, 10),
        Some("magnet:?xt=urn:btih:CCC10".to_string()),
    );
    store
        .append_movies(&[
            complete.clone(),
            MovieRecord::new("独行月球", detail_url(&server, 11), None),
            MovieRecord::new("", detail_url(&server, 12), Some("ftp://old".to_string())),
        ])
        .unwrap();

    let summary = repair(config.clone(), test_store(&config)).await.unwrap();
    assert_eq!(summary.incomplete_found, 2);
    assert_eq!(summary.incomplete_fixed, 2);
    assert!(summary.rewritten);

    let movies = store.read_movies().unwrap();
    assert_eq!(
        movies,
        vec![
            complete,
            MovieRecord::new(
                "独行月球",
                detail_url(&server, 11),
                Some("magnet:?xt=urn:btih:CCC11".to_string())
            ),
            MovieRecord::new(
                "热辣滚烫",
                detail_url(&server, 12),
                Some("ftp://dl.example.net/12.mkv".to_string())
            ),
        ]
    );
    assert_eq!(lines(store.movies_path()).len(), 4);
}

#[tokio::test]
async fn test_failed_amendment_leaves_store_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/i/21.html"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &[], dir.path());
    let store = test_store(&config);
    store
        .append_movie(&MovieRecord::new("消失的她", detail_url(&server, 21), None))
        .unwrap();
    let before = std::fs::read(store.movies_path()).unwrap();

    let summary = repair(config.clone(), test_store(&config)).await.unwrap();
    assert_eq!(summary.incomplete_found, 1);
    assert_eq!(summary.incomplete_fixed, 0);
    assert!(!summary.rewritten);

    assert_eq!(std::fs::read(store.movies_path()).unwrap(), before);
}

#[tokio::test]
async fn test_repair_never_shrinks_store() {
    let server = MockServer::start().await;

    serve(
        &server,
        "/i/31.html",
        &detail_page("年会不能停", Some("magnet:?xt=urn:btih:EEE31")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/i/32.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &[], dir.path());
    let store = test_store(&config);
    store
        .append_movies(&[
            MovieRecord::new("年会不能停", detail_url(&server, 31), None),
            MovieRecord::new("第二十条", detail_url(&server, 32), None),
            MovieRecord::new("", "", None),
        ])
        .unwrap();
    let before = lines(store.movies_path()).len();

    let summary = repair(config.clone(), test_store(&config)).await.unwrap();
    assert_eq!(summary.incomplete_found, 3);
    assert_eq!(summary.incomplete_fixed, 1);
    assert!(summary.rewritten);

    assert_eq!(lines(store.movies_path()).len(), before);

    let movies = store.read_movies().unwrap();
    assert_eq!(movies[1].title, "第二十条");
    assert_eq!(movies[2], MovieRecord::new("", "", None));
}

#[tokio::test]
async fn test_amendment_keeps_stored_link_when_page_has_none() {
    let server = MockServer::start().await;
    serve(&server, "/i/41.html", &detail_page("飞驰人生", None)).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &[], dir.path());
    let store = test_store(&config);
    store
        .append_movie(&MovieRecord::new(
            "",
            detail_url(&server, 41),
            Some("magnet:?xt=urn:btih:KEEP".to_string()),
        ))
        .unwrap();

    let summary = repair(config.clone(), test_store(&config)).await.unwrap();
    assert_eq!(summary.incomplete_fixed, 1);
    assert!(summary.rewritten);

    assert_eq!(
        store.read_movies().unwrap(),
        vec![MovieRecord::new(
            "飞驰人生",
            detail_url(&server, 41),
            Some("magnet:?xt=urn:btih:KEEP".to_string())
        )]
    );
}
