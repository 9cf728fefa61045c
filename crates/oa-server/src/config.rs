//! API server configuration.

use serde::Deserialize;

use oa_advisor::AdvisorConfig;

/// Top-level server configuration: listen address plus advisor settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ListenConfig,
    #[serde(flatten)]
    pub advisor: AdvisorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load from the file named by `OA_CONFIG`, else defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var("OA_CONFIG") {
            Ok(path) => {
                tracing::info!(path = %path, "loading config");
                Self::from_file(&path)
            }
            Err(_) => {
                tracing::warn!("OA_CONFIG not set, using default config");
                Ok(Self::default())
            }
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
