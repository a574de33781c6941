use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "usda-fas";
const CONFIG_FILE: &str = "config.toml";

/// Keys accepted by `config set` / `config get`.
pub const KNOWN_KEYS: &[&str] = &["api.url"];

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api: ApiSection,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct ApiSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    path: PathBuf,
    pub api_url: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path()?)
    }

    /// Read the config at `path`; a missing file yields an empty config.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let file = read_file(&path)?;
        Ok(Self {
            path,
            api_url: file.api.url,
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
            .context("Failed to determine config directory")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut file = read_file(&self.path)?;
        match key {
            "api.url" => {
                url::Url::parse(value).with_context(|| format!("Invalid URL '{}'", value))?;
                file.api.url = Some(value.to_string());
            }
            _ => bail!(
                "Unknown configuration key '{}' (known keys: {})",
                key,
                KNOWN_KEYS.join(", ")
            ),
        }

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(&file).context("Failed to serialize config")?;
        fs::write(&self.path, content).context("Failed to write config file")?;

        self.api_url = file.api.url;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match key {
            "api.url" => Ok(self.api_url.clone()),
            _ => bail!(
                "Unknown configuration key '{}' (known keys: {})",
                key,
                KNOWN_KEYS.join(", ")
            ),
        }
    }
}

fn read_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}
