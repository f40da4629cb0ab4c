use serde::Deserialize;

/// Main configuration structure for Sumi-Mirror
///
/// Every section is optional in the TOML file; missing sections take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages processed at the same time
    #[serde(rename = "max-parallelism", default = "default_max_parallelism")]
    pub max_parallelism: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_parallelism: default_max_parallelism(),
        }
    }
}

fn default_max_parallelism() -> u32 {
    1
}

/// HTTP client configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// Whole-request deadline in seconds (no deadline when unset)
    #[serde(rename = "timeout-secs", default)]
    pub timeout_secs: Option<u64>,

    /// Connection establishment deadline in seconds
    #[serde(rename = "connect-timeout-secs", default)]
    pub connect_timeout_secs: Option<u64>,
}
