//! Listing page count inference
//!
//! The site's listing templates disagree about where page numbers live, so
//! several independent locations are scanned and the largest number wins.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static PAGE_OPTIONS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".co_content8 select option").expect("valid option selector")
});

static PAGER_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".co_content8 .x a").expect("valid pager selector"));

static PAGING_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".pages a, .pagelist a").expect("valid paging selector"));

static ALL_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid anchor selector"));

static INDEX_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"index_(\d+)\.html").expect("valid index page regex"));

/// Anchor texts that mark a "last page" link
const LAST_PAGE_TEXTS: &[&str] = &["末页", "尾页"];

/// Determines the number of pages of a listing from its first page
///
/// # Sources
///
/// 1. Option texts of the page selector under `.co_content8`
/// 2. `index_<N>.html` hrefs of anchors under `.co_content8 .x`
/// 3. Texts and `index_<N>.html` hrefs of anchors under `.pages` / `.pagelist`
/// 4. `index_<N>.html` hrefs of anchors whose text contains 末页 or 尾页
///
/// # Returns
///
/// The maximum page number found, or 1 if none was found
///
/// # Example
///
/// ```
/// use reel_harvest::extract::max_page;
///
/// assert_eq!(max_page("<html><body><p>one page</p></body></html>"), 1);
/// ```
pub fn max_page(markup: &str) -> u32 {
    let document = Html::parse_document(markup);
    let mut max = 1;

    for option in document.select(&PAGE_OPTIONS) {
        raise(&mut max, parse_leading_int(&element_text(option)));
    }

    for anchor in document.select(&PAGER_LINKS) {
        raise(&mut max, href_page(anchor));
    }

    for anchor in document.select(&PAGING_LINKS) {
        raise(&mut max, parse_leading_int(element_text(anchor).trim()));
        raise(&mut max, href_page(anchor));
    }

    for anchor in document.select(&ALL_LINKS) {
        let text = element_text(anchor);
        if LAST_PAGE_TEXTS.iter().any(|marker| text.contains(marker)) {
            raise(&mut max, href_page(anchor));
        }
    }

    tracing::debug!("Detected max page: {}", max);
    max
}

/// Parses the integer at the start of a string
///
/// Leading whitespace and a `+` sign are skipped, then leading ASCII digits
/// are read and anything after them ignored. Returns None if there are no
/// digits, the number is negative, or it does not fit in a `u32`.
///
/// # Examples
///
/// ```
/// use reel_harvest::extract::parse_leading_int;
///
/// assert_eq!(parse_leading_int(" 12 "), Some(12));
/// assert_eq!(parse_leading_int("7页"), Some(7));
/// assert_eq!(parse_leading_int("下一页"), None);
/// ```
pub fn parse_leading_int(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let text = text.strip_prefix('+').unwrap_or(text);

    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    text[..end].parse().ok()
}

fn raise(max: &mut u32, candidate: Option<u32>) {
    if let Some(page) = candidate {
        if page > *max {
            *max = page;
        }
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Page number encoded in an anchor's `index_<N>.html` href
fn href_page(anchor: ElementRef<'_>) -> Option<u32> {
    let href = anchor.value().attr("href")?;
    INDEX_PAGE
        .captures(href)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
