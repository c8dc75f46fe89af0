//! Listing page item extraction

use crate::url::resolve_detail_link;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static LISTING_ITEMS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".co_content8 .ulink[href]").expect("valid item selector"));

/// A detail link found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    /// Absolute detail page URL
    pub url: String,

    /// Anchor text, used to name the entry if its detail page fails
    pub title: String,
}

/// Extracts the detail links of a listing page, in document order
///
/// Only `.ulink` anchors in the listing container whose href has a detail
/// page shape are kept, which drops navigation and category links. Each URL
/// is reported once even if the page links it several times.
///
/// # Arguments
///
/// * `markup` - Decoded listing page markup
/// * `base_url` - Site origin that relative hrefs are resolved against
pub fn extract_listing_items(markup: &str, base_url: &Url) -> Vec<ListingItem> {
    let document = Html::parse_document(markup);
    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for anchor in document.select(&LISTING_ITEMS) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let Some(url) = resolve_detail_link(href, base_url) else {
            tracing::trace!("Skipping non-detail listing link: {}", href);
            continue;
        };

        if !seen.insert(url.clone()) {
            continue;
        }

        let title = anchor
            .value()
            .attr("title")
            .map(str::to_string)
            .unwrap_or_else(|| anchor.text().collect::<String>());

        items.push(ListingItem {
            url,
            title: title.trim().to_string(),
        });
    }

    items
}
