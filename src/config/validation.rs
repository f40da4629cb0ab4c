use crate::config::types::{Config, CrawlerConfig, HttpConfig};
use crate::ConfigError;
use crate::url::Seed;

/// Upper bound on concurrently processed pages
pub const MAX_PARALLELISM: u32 = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_parallelism < 1 || config.max_parallelism > MAX_PARALLELISM {
        return Err(ConfigError::Validation(format!(
            "max_parallelism must be between 1 and {}, got {}",
            MAX_PARALLELISM, config.max_parallelism
        )));
    }

    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout_secs must be greater than 0".to_string(),
        ));
    }

    if config.connect_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates a seed URL given on the command line
///
/// The seed must use the `http://` or `https://` scheme and parse as a URL.
/// Returns it in canonical form, ready to start a mirror from.
pub fn validate_seed(seed: &str) -> Result<Seed, ConfigError> {
    Seed::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Config {
        Config {
            crawler: CrawlerConfig { max_parallelism: 4 },
            http: HttpConfig {
                timeout_secs: Some(30),
                connect_timeout_secs: None,
            },
        }
    }

    #[test]
    fn test_valid_config() {
        let config = create_valid_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_parallelism() {
        let mut config = create_valid_config();
        config.crawler.max_parallelism = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_parallelism_upper_bound() {
        let mut config = create_valid_config();
        config.crawler.max_parallelism = MAX_PARALLELISM;
        assert!(validate(&config).is_ok());

        config.crawler.max_parallelism = MAX_PARALLELISM + 1;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = create_valid_config();
        config.http.timeout_secs = Some(0);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_connect_timeout() {
        let mut config = create_valid_config();
        config.http.connect_timeout_secs = Some(0);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_seed_https() {
        let seed = validate_seed("https://example.com#top").unwrap();
        assert_eq!(seed.as_str(), "https://example.com/");
    }

    #[test]
    fn test_seed_http() {
        assert!(validate_seed("http://example.com/docs/").is_ok());
    }

    #[test]
    fn test_seed_bad_scheme() {
        let result = validate_seed("ftp://example.com/");
        assert!(matches!(result.unwrap_err(), ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn test_seed_without_scheme() {
        assert!(validate_seed("example.com").is_err());
    }

    #[test]
    fn test_seed_unparsable() {
        assert!(validate_seed("http://").is_err());
    }
}
