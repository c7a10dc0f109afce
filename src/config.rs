use anyhow::{Context, Result};
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Telegram bot token
    #[serde(default)]
    pub api_key: String,
    /// Shop name printed in front of the product id in every `/check` reply
    #[serde(default = "default_label")]
    pub label: String,
    #[serde(default)]
    pub catalog: HashMap<String, String>,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub indicator: IndicatorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The markup element whose presence means "in stock".
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct IndicatorConfig {
    #[serde(default = "default_indicator_tag")]
    pub tag: String,
    #[serde(default = "default_indicator_class")]
    pub class: String,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            tag: default_indicator_tag(),
            class: default_indicator_class(),
        }
    }
}

fn default_label() -> String {
    "Eden".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn default_indicator_tag() -> String {
    "span".to_string()
}

fn default_indicator_class() -> String {
    "instock".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!("api_key is missing or empty");
        }

        if self.http.timeout_secs == 0 {
            anyhow::bail!("http.timeout_secs must be greater than zero");
        }

        if self.indicator.tag.trim().is_empty() || self.indicator.class.trim().is_empty() {
            anyhow::bail!("indicator.tag and indicator.class must not be empty");
        }

        for (id, locator) in &self.catalog {
            let url = Url::parse(locator)
                .with_context(|| format!("catalog entry '{}' has an invalid URL: {}", id, locator))?;
            if !matches!(url.scheme(), "http" | "https") {
                anyhow::bail!(
                    "catalog entry '{}' must use http or https, got '{}'",
                    id,
                    url.scheme()
                );
            }
        }

        Ok(())
    }
}
