use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Stored CLI state: which server to talk to and the token from the last
/// login. Lives in config.json under the CLI config directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub server_url: String,
    pub token: Option<String>,
    pub email: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".to_string(),
            token: None,
            email: None,
        }
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("ROUTINELY_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home)
            .join(".config")
            .join("routinely")
            .join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_config() -> anyhow::Result<CliConfig> {
    let config_file = get_config_dir()?.join("config.json");

    let mut config = if config_file.exists() {
        let content = fs::read_to_string(config_file)?;
        serde_json::from_str(&content)?
    } else {
        CliConfig::default()
    };

    // One-off server override without touching the stored config
    if let Ok(server) = std::env::var("ROUTINELY_SERVER") {
        config.server_url = server;
    }

    Ok(config)
}

pub fn save_config(config: &CliConfig) -> anyhow::Result<()> {
    let config_file = get_config_dir()?.join("config.json");

    let content = serde_json::to_string_pretty(config)?;
    fs::write(config_file, content)?;
    Ok(())
}
