use serde::Deserialize;

const DEFAULT_PORT: &str = "8082";
const DEFAULT_CONFIG_API_URL: &str = "https://api.conturs.com";
const DEFAULT_ALLOWED_ORIGINS: &str =
    "https://conturs.com,https://www.conturs.com,https://app.conturs.com";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Base URL of the scoring config service; `/config` is appended.
    pub config_api_url: String,
    pub config_api_timeout_secs: u64,
    /// Origins allowed by CORS. Empty means any origin, without credentials.
    pub allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8082,
            config_api_url: DEFAULT_CONFIG_API_URL.to_string(),
            config_api_timeout_secs: 10,
            allowed_origins: parse_origins(DEFAULT_ALLOWED_ORIGINS),
            max_body_bytes: 5 * 1024 * 1024,
            rate_limit_per_second: 10,
            rate_limit_burst: 20,
        }
    }
}

/// Splits a comma separated origin list. `*` anywhere in the list allows
/// every origin.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect();

    if origins.iter().any(|origin| origin == "*") {
        Vec::new()
    } else {
        origins
    }
}

fn positive_number<T>(name: &str, default: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    let value: T = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{} must be a valid number", name))?;
    if value <= T::default() {
        anyhow::bail!("{} must be greater than zero", name);
    }
    Ok(value)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            config_api_url: std::env::var("CONFIG_API_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONFIG_API_URL.to_string())
                .parse::<url::Url>()
                .map_err(|e| anyhow::anyhow!("CONFIG_API_URL is not a valid URL: {}", e))
                .and_then(|url| {
                    if url.scheme() != "http" && url.scheme() != "https" {
                        anyhow::bail!("CONFIG_API_URL must start with http:// or https://");
                    }
                    Ok(url.as_str().trim_end_matches('/').to_string())
                })?,
            config_api_timeout_secs: positive_number("CONFIG_API_TIMEOUT_SECS", "10")?,
            allowed_origins: parse_origins(
                &std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
            ),
            max_body_bytes: positive_number("MAX_BODY_BYTES", "5242880")?,
            rate_limit_per_second: positive_number("RATE_LIMIT_PER_SECOND", "10")?,
            rate_limit_burst: positive_number("RATE_LIMIT_BURST", "20")?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Config API URL: {}", config.config_api_url);
        tracing::debug!("Config API timeout: {}s", config.config_api_timeout_secs);
        if config.allowed_origins.is_empty() {
            tracing::warn!("CORS allows any origin");
        } else {
            tracing::debug!("CORS allowed origins: {:?}", config.allowed_origins);
        }
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
