use serde::Deserialize;

pub const DEFAULT_PROVIDER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_PROVIDER_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_PROVIDER_REFERER: &str = "http://localhost:5173";
pub const DEFAULT_LEADS_CSV_PATH: &str = "leads.csv";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Bearer token for the completion provider. Not validated; an empty key
    /// simply fails authentication on every call.
    pub provider_api_key: String,
    pub provider_url: String,
    pub provider_model: String,
    pub provider_referer: String,
    pub leads_csv_path: String,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from `lookup`, which returns the value of a
    /// variable or `None` when it is unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let config = Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            provider_api_key: lookup("OPENROUTER_API_KEY").unwrap_or_default(),
            provider_url: non_empty("PROVIDER_URL")
                .map(|url| {
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("PROVIDER_URL must start with http:// or https://");
                    }
                    Ok(url)
                })
                .transpose()?
                .unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string()),
            provider_model: non_empty("PROVIDER_MODEL")
                .unwrap_or_else(|| DEFAULT_PROVIDER_MODEL.to_string()),
            provider_referer: non_empty("PROVIDER_REFERER")
                .unwrap_or_else(|| DEFAULT_PROVIDER_REFERER.to_string()),
            leads_csv_path: non_empty("LEADS_CSV_PATH")
                .unwrap_or_else(|| DEFAULT_LEADS_CSV_PATH.to_string()),
            max_body_bytes: lookup("MAX_BODY_BYTES")
                .unwrap_or_else(|| "1048576".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_BODY_BYTES must be a positive integer"))?,
        };

        // Log successful configuration load (without sensitive values)
        if config.provider_api_key.trim().is_empty() {
            tracing::warn!("OPENROUTER_API_KEY is not set; provider calls will fail authentication");
        }
        tracing::debug!("Provider URL: {}", config.provider_url);
        tracing::debug!("Provider model: {}", config.provider_model);
        tracing::debug!("Leads CSV path: {}", config.leads_csv_path);
        tracing::debug!("Server address: {}:{}", config.host, config.port);

        Ok(config)
    }
}
