use crate::{UrlError, UrlResult};
use std::path::{Path, PathBuf};
use url::Url;

/// File name used for the seed document and for directory-style URLs
pub const INDEX_FILE: &str = "index.html";

/// Throwaway origin used to parse the path-and-query remainder of a URL
const LOCAL_ORIGIN: &str = "http://mirror.invalid";

/// Maps a URL to the local file it is mirrored to
///
/// # Mapping Rules
///
/// 1. The seed is treated as ending in exactly one `/`
/// 2. A URL no longer than the seed maps to `out_dir/index.html`
/// 3. Otherwise the remainder after the seed (keeping its leading `/`) is the
///    path and query to mirror
/// 4. Path segments become directories; empty segments collapse and a trailing
///    `/` maps to `index.html` inside that directory
/// 5. A query is appended to the file name as `?key=value&key`, keys sorted,
///    with any `/` inside a key or value written as `%2F`
///
/// Rule 4 departs from a plain join of the remainder onto `out_dir`: a plain
/// join stores `/docs/` at `out/docs` and `/?page=2` at `out/?page=2`. Here
/// they land at `out/docs/index.html` and `out/index.html?page=2`, so that
/// `/docs/` and `/docs/intro` can both be mirrored.
///
/// # Arguments
///
/// * `url` - The canonical URL to map
/// * `seed` - The seed string the crawl started from
/// * `out_dir` - Root of the mirror on disk
///
/// # Returns
///
/// * `Ok(PathBuf)` - Local path for the page
/// * `Err(UrlError)` - The remainder could not be split off or parsed
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use sumi_mirror::url::map_url_to_path;
///
/// let out = Path::new("out");
/// let path = map_url_to_path("https://example.com/foo", "https://example.com", out).unwrap();
/// assert_eq!(path, PathBuf::from("out/foo"));
///
/// let path = map_url_to_path("https://example.com", "https://example.com", out).unwrap();
/// assert_eq!(path, PathBuf::from("out/index.html"));
/// ```
pub fn map_url_to_path(url: &str, seed: &str, out_dir: &Path) -> UrlResult<PathBuf> {
    let seed = format!("{}/", seed.strip_suffix('/').unwrap_or(seed));

    if url.len() <= seed.len() {
        return Ok(out_dir.join(INDEX_FILE));
    }

    let remainder = url.get(seed.len() - 1..).ok_or_else(|| {
        UrlError::Malformed(format!("{} cannot be split at the end of seed {}", url, seed))
    })?;

    let parsed = if remainder.starts_with('/') {
        Url::parse(&format!("{}{}", LOCAL_ORIGIN, remainder))
    } else {
        Url::parse(&format!("{}/{}", LOCAL_ORIGIN, remainder))
    }
    .map_err(|e| UrlError::Malformed(format!("{}: {}", url, e)))?;

    let path = parsed.path();
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() || path.ends_with('/') {
        segments.push(INDEX_FILE);
    }

    let mut local = out_dir.to_path_buf();
    let (file_name, dirs) = match segments.split_last() {
        Some(split) => split,
        None => return Ok(local.join(INDEX_FILE)),
    };

    for dir in dirs {
        local.push(dir);
    }

    match canonical_query(&parsed) {
        Some(query) => local.push(format!("{}?{}", file_name, query)),
        None => local.push(file_name),
    }

    Ok(local)
}

/// Builds the query string used in file names
///
/// Parameters are sorted by key (repeated keys keep their relative order). A key
/// whose only value is empty is written bare. Returns `None` when there are no
/// parameters at all.
fn canonical_query(url: &Url) -> Option<String> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (escape_slashes(&k), escape_slashes(&v)))
        .collect();

    if params.is_empty() {
        return None;
    }

    params.sort_by(|a, b| a.0.cmp(&b.0));

    let mut parts = Vec::with_capacity(params.len());
    let mut start = 0;
    while start < params.len() {
        let key = &params[start].0;
        let end = params[start..]
            .iter()
            .position(|(k, _)| k != key)
            .map_or(params.len(), |offset| start + offset);
        let group = &params[start..end];

        if group.len() == 1 && group[0].1.is_empty() {
            parts.push(key.clone());
        } else {
            parts.extend(group.iter().map(|(k, v)| format!("{}={}", k, v)));
        }

        start = end;
    }

    Some(parts.join("&"))
}

fn escape_slashes(s: &str) -> String {
    s.replace('/', "%2F")
}
