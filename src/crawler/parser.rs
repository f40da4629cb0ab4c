//! HTML link extraction
//!
//! Collects the raw `href` of every anchor, exactly as written in the page.
//! Nothing is filtered or resolved here; that happens in the page processor.

use scraper::{Html, Selector};

/// Extracts the `href` values of all `<a>` elements
///
/// Values come back in document order, duplicates and empty or malformed values
/// included. The body does not have to be valid UTF-8; invalid sequences are
/// replaced before parsing.
///
/// # Arguments
///
/// * `body` - The raw page bytes
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The hrefs found
/// * `Err(String)` - The document could not be queried
///
/// # Example
///
/// ```
/// use sumi_mirror::crawler::extract_links;
///
/// let html = br#"<html><body><a href="/page">Link</a><a>No href</a></body></html>"#;
/// assert_eq!(extract_links(html).unwrap(), vec!["/page".to_string()]);
/// ```
pub fn extract_links(body: &[u8]) -> Result<Vec<String>, String> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    let selector = Selector::parse("a[href]").map_err(|e| e.to_string())?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect())
}
