use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing. The AI credential is
/// optional here: only the enrichment path refuses to run without it.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub artifact_base_url: String,
    pub anthropic_api_key: Option<String>,
    pub chrome_bin: String,
    pub render_timeout: Duration,
    pub enrichment_timeout: Duration,
    pub enrichment_max_in_flight: usize,
    pub rate_limit_per_minute: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3_bucket = require_env("S3_BUCKET")?;
        let s3_endpoint = require_env("S3_ENDPOINT")?;
        let artifact_base_url = std::env::var("ARTIFACT_BASE_URL").unwrap_or_else(|_| {
            format!("{}/{}", s3_endpoint.trim_end_matches('/'), s3_bucket)
        });

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            s3_bucket,
            s3_endpoint,
            aws_access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            artifact_base_url,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            chrome_bin: std::env::var("CHROME_BIN").unwrap_or_else(|_| "chromium".to_string()),
            render_timeout: Duration::from_secs(parse_env("RENDER_TIMEOUT_SECS", 60)?),
            enrichment_timeout: Duration::from_secs(parse_env("ENRICHMENT_TIMEOUT_SECS", 90)?),
            enrichment_max_in_flight: parse_env("ENRICHMENT_MAX_IN_FLIGHT", 3)?,
            rate_limit_per_minute: parse_env("RATE_LIMIT_PER_MINUTE", 10)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u64 = parse_env("COMPETENCE_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_optional_env_treats_blank_as_unset() {
        std::env::set_var("COMPETENCE_TEST_BLANK_KEY", "   ");
        assert!(optional_env("COMPETENCE_TEST_BLANK_KEY").is_none());
        std::env::remove_var("COMPETENCE_TEST_BLANK_KEY");
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("COMPETENCE_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("COMPETENCE_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("COMPETENCE_TEST_BAD_PORT");
    }
}
