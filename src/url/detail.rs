use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static ITEM_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/i/\d+\.html$").expect("valid item path regex"));

static HTML_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/html/[\w/]+\d+\.html$").expect("valid html path regex"));

/// Returns true if the href points at a film detail page
///
/// Two shapes are accepted: `/i/<digits>.html` and `/html/.../<digits>.html`.
/// Category and navigation links match neither.
pub fn is_detail_path(href: &str) -> bool {
    ITEM_PATH.is_match(href) || HTML_PATH.is_match(href)
}

/// Resolves a listing href against the site origin
///
/// Returns None if the href is not a detail link or cannot be resolved.
pub fn resolve_detail_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if !is_detail_path(href) {
        return None;
    }

    base_url.join(href).ok().map(String::from)
}
