use crate::url::SourceKind;

/// Builds the URL of a listing page
///
/// | Source shape            | Page 1                  | Page N > 1                              |
/// |-------------------------|-------------------------|-----------------------------------------|
/// | `.../<digits>/`         | source                  | source + `index_N.html`                 |
/// | `.../index.html`        | source                  | `index.html` replaced by `index_N.html` |
/// | any other directory     | source + `index.html`   | source + `index_N.html`                 |
///
/// Page numbers below 1 are treated as page 1.
///
/// # Examples
///
/// ```
/// use reel_harvest::url::page_url;
///
/// assert_eq!(page_url("https://site/5/", 3), "https://site/5/index_3.html");
/// assert_eq!(page_url("https://site/html/bikan/", 1), "https://site/html/bikan/index.html");
/// ```
pub fn page_url(source: &str, page: u32) -> String {
    let page = page.max(1);

    match SourceKind::of(source) {
        SourceKind::Numbered => {
            if page == 1 {
                source.to_string()
            } else {
                format!("{}index_{}.html", source, page)
            }
        }
        SourceKind::IndexPage => {
            if page == 1 {
                source.to_string()
            } else {
                let prefix = source.strip_suffix("index.html").unwrap_or(source);
                format!("{}index_{}.html", prefix, page)
            }
        }
        SourceKind::Directory => {
            if page == 1 {
                format!("{}index.html", source)
            } else {
                format!("{}index_{}.html", source, page)
            }
        }
    }
}
