//! HTTP client construction
//!
//! Requests are plain GETs with no custom headers. Redirects follow the client's
//! default policy and deadlines only apply when configured.

use crate::config::HttpConfig;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client shared by every page of a run
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_mirror::config::HttpConfig;
/// use sumi_mirror::crawler::build_http_client;
///
/// let config = HttpConfig {
///     timeout_secs: Some(30),
///     connect_timeout_secs: Some(10),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().gzip(true).brotli(true);

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    if let Some(secs) = config.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_default_client() {
        let client = build_http_client(&HttpConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_client_with_timeouts() {
        let config = HttpConfig {
            timeout_secs: Some(5),
            connect_timeout_secs: Some(2),
        };
        assert!(build_http_client(&config).is_ok());
    }
}
