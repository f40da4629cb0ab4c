use crate::{UrlError, UrlResult};
use url::{ParseError, Url};

/// Strips the fragment from a raw href
///
/// Absolute hrefs are parsed and re-serialized without their fragment. Relative
/// hrefs cannot be parsed on their own, so everything from the first `#` is cut;
/// they become absolute later, in [`resolve`].
///
/// # Examples
///
/// ```
/// use sumi_mirror::url::defrag;
///
/// assert_eq!(defrag("https://x/y#section").unwrap(), "https://x/y");
/// assert_eq!(defrag("../about#team").unwrap(), "../about");
/// ```
pub fn defrag(raw: &str) -> UrlResult<String> {
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_fragment(None);
            Ok(url.into())
        }
        Err(ParseError::RelativeUrlWithoutBase) => Ok(strip_fragment(raw).to_string()),
        Err(e) => Err(UrlError::Parse(format!("{}: {}", raw, e))),
    }
}

/// Resolves a reference against a base URL
///
/// Follows standard resolution rules: absolute, scheme-relative, path-absolute,
/// path-relative and query-only references are all handled. The result never
/// carries a fragment, so its string form is canonical.
pub fn resolve(base: &Url, reference: &str) -> UrlResult<Url> {
    let mut url = base
        .join(reference)
        .map_err(|e| UrlError::Malformed(format!("cannot resolve {:?} against {}: {}", reference, base, e)))?;
    url.set_fragment(None);
    Ok(url)
}

fn strip_fragment(raw: &str) -> &str {
    match raw.find('#') {
        Some(index) => &raw[..index],
        None => raw,
    }
}
