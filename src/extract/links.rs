//! Raw-text download link scanning
//!
//! These run over the decoded page text rather than a parsed document, which
//! catches links the site prints as plain text or inside scripts.

use regex::Regex;
use std::sync::LazyLock;

use super::LinkSource;

static MAGNET_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"magnet:\?xt=urn:btih:[a-zA-Z0-9]+").expect("valid magnet regex")
});

static FTP_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"ftp://[^\s"'<>]+"#).expect("valid ftp regex"));

static HTTP_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'<>]+"#).expect("valid http regex"));

static STATIC_ASSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|gif|css|js)$").expect("valid asset regex")
});

/// First magnet link in the text, verbatim
pub fn find_magnet_link(text: &str) -> Option<&str> {
    MAGNET_LINK.find(text).map(|m| m.as_str())
}

/// First FTP URL in the text
pub fn find_ftp_link(text: &str) -> Option<&str> {
    FTP_LINK.find(text).map(|m| m.as_str())
}

/// True if the link ends in an image, stylesheet or script extension
pub fn is_static_asset(link: &str) -> bool {
    STATIC_ASSET.is_match(link)
}

/// First HTTP(S) URL in the text that is neither a static asset nor on the
/// site's own domain
pub fn find_http_link<'a>(text: &'a str, site_domain: &str) -> Option<&'a str> {
    HTTP_LINK
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|link| !is_static_asset(link) && !link.contains(site_domain))
}

/// Runs the raw-text fallbacks in order: magnet, FTP, then HTTP(S)
pub fn find_text_link(text: &str, site_domain: &str) -> Option<(String, LinkSource)> {
    if let Some(link) = find_magnet_link(text) {
        return Some((link.to_string(), LinkSource::Magnet));
    }

    if let Some(link) = find_ftp_link(text) {
        return Some((link.to_string(), LinkSource::Ftp));
    }

    find_http_link(text, site_domain).map(|link| (link.to_string(), LinkSource::Http))
}
