use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub chat: ChatDefaults,
}

/// Remote service endpoint settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EndpointConfig {
    #[serde(default = "EndpointConfig::default_base_url")]
    pub base_url: String,
    pub token: String,
}

impl EndpointConfig {
    fn default_base_url() -> String {
        "http://114.55.105.91:9010/gpt-ai".to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatDefaults {
    /// Fixed-string locale, "en" or "zh".
    #[serde(default = "ChatDefaults::default_locale")]
    pub locale: String,
}

impl Default for ChatDefaults {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
        }
    }
}

impl ChatDefaults {
    fn default_locale() -> String {
        "en".to_string()
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'kokoro init' to create config.",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_json::from_str(&content)?;

        Ok(config)
    }

    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("kokoro"))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        let config_template = r#"{
  "endpoint": {
    "base_url": "http://114.55.105.91:9010/gpt-ai",
    "token": "1234567890"
  },
  "chat": {
    "locale": "en"
  }
}
"#;

        std::fs::write(&config_path, config_template)?;
        println!("Created config file at: {}", config_path.display());
        println!("Please edit it to set your service endpoint and token.");

        Ok(())
    }
}
