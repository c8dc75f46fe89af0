//! Detail page field extraction

use crate::config::{ExtractionConfig, SiteConfig};
use crate::extract::links::find_text_link;
use crate::extract::ExtractError;
use scraper::{Html, Selector};
use std::fmt;
use std::sync::LazyLock;

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".title_all h1").expect("valid title selector"));

static CONTENT_ANCHORS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#Zoom a[href]").expect("valid content selector"));

/// Link schemes accepted from anchors in the content area
const ACCEPTED_SCHEMES: &[&str] = &["magnet:", "ftp:", "http:", "https:"];

/// Which extraction step produced the download link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkSource {
    /// An anchor inside the content area
    Zoom,
    /// A magnet link found in the page text
    Magnet,
    /// An FTP URL found in the page text
    Ftp,
    /// A filtered HTTP(S) URL found in the page text
    Http,
    /// Nothing found
    None,
}

impl fmt::Display for LinkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Zoom => "content area",
            Self::Magnet => "magnet text",
            Self::Ftp => "ftp text",
            Self::Http => "http text",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

/// Fields extracted from one detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFields {
    /// Trimmed, non-empty title
    pub title: String,

    /// The download link, if any step found one
    pub download_link: Option<String>,

    /// Which step produced `download_link`
    pub link_source: LinkSource,
}

/// Extracts title and download link from detail page markup
///
/// Extraction is strict: a block page or a missing title fails the whole
/// page. A missing download link does not.
#[derive(Debug, Clone)]
pub struct DetailExtractor {
    site_domain: String,
    block_phrases: Vec<String>,
}

impl DetailExtractor {
    pub fn new(site_domain: impl Into<String>, block_phrases: Vec<String>) -> Self {
        Self {
            site_domain: site_domain.into(),
            block_phrases,
        }
    }

    pub fn from_config(site: &SiteConfig, extraction: &ExtractionConfig) -> Self {
        Self::new(site.domain.clone(), extraction.block_phrases.clone())
    }

    /// Extracts the fields of a detail page
    ///
    /// # Link Resolution
    ///
    /// First match wins; each step runs only if all earlier ones found nothing:
    ///
    /// 1. First `#Zoom` anchor whose href starts with `magnet:`, `ftp:`, `http:` or `https:`
    /// 2. First magnet link in the raw text
    /// 3. First FTP URL in the raw text
    /// 4. First HTTP(S) URL in the raw text that is not a static asset and not on the site's domain
    ///
    /// # Returns
    ///
    /// * `Ok(DetailFields)` - Title found; the link may still be absent
    /// * `Err(ExtractError::Blocked)` - The page is an anti-scraping block page
    /// * `Err(ExtractError::MissingTitle)` - No title element, or it is empty
    ///
    /// # Example
    ///
    /// ```
    /// use reel_harvest::DetailExtractor;
    ///
    /// let extractor = DetailExtractor::new("dy2018.com", vec![]);
    /// let html = r#"<div class="title_all"><h1>Film</h1></div>
    ///     <div id="Zoom"><a href="magnet:?xt=urn:btih:ABC123">dl</a></div>"#;
    /// let fields = extractor.extract(html).unwrap();
    /// assert_eq!(fields.download_link.as_deref(), Some("magnet:?xt=urn:btih:ABC123"));
    /// ```
    pub fn extract(&self, markup: &str) -> Result<DetailFields, ExtractError> {
        if let Some(phrase) = self.block_phrase(markup) {
            return Err(ExtractError::Blocked {
                phrase: phrase.to_string(),
            });
        }

        let document = Html::parse_document(markup);

        let title = extract_title(&document).ok_or(ExtractError::MissingTitle)?;

        let (download_link, link_source) = match find_content_link(&document) {
            Some(link) => (Some(link), LinkSource::Zoom),
            None => match find_text_link(markup, &self.site_domain) {
                Some((link, source)) => (Some(link), source),
                None => (None, LinkSource::None),
            },
        };

        tracing::trace!("Download link source for '{}': {}", title, link_source);

        Ok(DetailFields {
            title,
            download_link,
            link_source,
        })
    }

    /// Returns the first configured block phrase present in the markup
    pub fn block_phrase(&self, markup: &str) -> Option<&str> {
        self.block_phrases
            .iter()
            .map(String::as_str)
            .find(|phrase| !phrase.is_empty() && markup.contains(phrase))
    }
}

/// Text of the title element(s), trimmed; None if empty
fn extract_title(document: &Html) -> Option<String> {
    let title: String = document
        .select(&TITLE)
        .flat_map(|element| element.text())
        .collect();

    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// First content-area anchor with an accepted scheme, in document order
fn find_content_link(document: &Html) -> Option<String> {
    document
        .select(&CONTENT_ANCHORS)
        .filter_map(|element| element.value().attr("href"))
        .find(|href| ACCEPTED_SCHEMES.iter().any(|scheme| href.starts_with(scheme)))
        .map(str::to_string)
}
