//! Shared fixtures for the integration tests
//!
//! Pages are served GBK-encoded, the way the real site serves them, and every
//! delay and backoff is disabled through configuration.

#![allow(dead_code)]

use encoding_rs::GBK;
use reel_harvest::config::{Config, DelayConfig, FetchConfig, OutputConfig, SiteConfig};
use reel_harvest::CsvStore;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Encodes markup as GBK
pub fn gbk(markup: &str) -> Vec<u8> {
    let (bytes, _, unmappable) = GBK.encode(markup);
    assert!(!unmappable, "fixture contains characters GBK cannot encode");
    bytes.into_owned()
}

/// A 200 response with a GBK body
pub fn gbk_page(markup: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(gbk(markup))
        .insert_header("content-type", "text/html")
}

/// Serves a GBK page for GET requests to `route`
pub async fn serve(server: &MockServer, route: &str, markup: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(gbk_page(markup))
        .mount(server)
        .await;
}

/// Listing markup with the given `(href, title)` items and page count
pub fn listing_page(items: &[(&str, &str)], pages: u32) -> String {
    let links: String = items
        .iter()
        .map(|(href, title)| {
            format!(
                r#"<li><a class="ulink" href="{}" title="{}">{}</a></li>"#,
                href, title, title
            )
        })
        .collect();

    let pager = if pages > 1 {
        format!(r#"<div class="x"><a href="index_{}.html">尾页</a></div>"#, pages)
    } else {
        String::new()
    };

    format!(
        r#"<html><head><title>列表</title></head><body>
        <a href="/html/gndy/">分类</a>
        <div class="co_content8"><ul>{}</ul>{}</div>
        </body></html>"#,
        links, pager
    )
}

/// Detail markup with a title and, optionally, a Zoom download anchor
pub fn detail_page(title: &str, link: Option<&str>) -> String {
    let zoom = link
        .map(|href| format!(r#"<a href="{}">下载地址</a>"#, href))
        .unwrap_or_default();

    format!(
        r#"<html><head><title>{}</title></head><body>
        <div class="title_all"><h1>{}</h1></div>
        <div id="Zoom"><p>简介</p>{}</div>
        </body></html>"#,
        title, title, zoom
    )
}

/// A page the site returns when it throttles a client
pub fn block_page() -> String {
    "<html><body><p>访问太频繁，请稍后再试</p></body></html>".to_string()
}

/// Configuration pointed at the mock server, with no delays
pub fn test_config(server: &MockServer, sources: &[&str], dir: &Path) -> Config {
    Config {
        site: SiteConfig {
            base_url: server.uri(),
            ..SiteConfig::default()
        },
        fetch: FetchConfig {
            max_attempts: 2,
            base_delay_ms: 0,
            jitter_ms: 0,
            timeout_secs: 5,
            referer: None,
            ..FetchConfig::default()
        },
        delays: DelayConfig::none(),
        output: OutputConfig {
            movies_path: dir.join("movies.csv").display().to_string(),
            failed_path: dir.join("failed.csv").display().to_string(),
        },
        sources: sources
            .iter()
            .map(|source| format!("{}{}", server.uri(), source))
            .collect(),
        ..Config::default()
    }
}

/// The store a test configuration writes to
pub fn test_store(config: &Config) -> CsvStore {
    CsvStore::new(&config.output.movies_path, &config.output.failed_path)
}

/// Lines of a store file, header included
pub fn lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
