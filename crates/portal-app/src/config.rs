//! Configuration management for safety-portal
//!
//! Config stored at: ~/.config/safety-portal/config.toml

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use portal_domain::service::ScoreRules;
use portal_types::{ConfigError, OutputFormat, Result};

const APP_DIR: &str = "safety-portal";

/// Operations teams scored and tracked by default
pub const DEFAULT_TEAMS: [&str; 7] = [
    "동대구운용팀",
    "서대구운용팀",
    "남대구운용팀",
    "포항운용팀",
    "안동운용팀",
    "구미운용팀",
    "문경운용팀",
];

/// AI assistant settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// OpenAI-compatible API root
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,

    #[serde(default = "default_ai_model")]
    pub model: String,

    /// API key; `OPENAI_API_KEY` is used when unset.
    /// Without a key the assistant answers from the FAQ table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// System prompt override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

fn default_ai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_ai_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: default_ai_base_url(),
            model: default_ai_model(),
            api_key: None,
            system_prompt: None,
        }
    }
}

impl AiConfig {
    /// Configured key, else `OPENAI_API_KEY`; blank keys count as absent
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the REST server listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Data directory override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Upload directory override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_dir: Option<PathBuf>,

    /// Team roster
    #[serde(default = "default_teams")]
    pub teams: Vec<String>,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub scoring: ScoreRules,
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_teams() -> Vec<String> {
    DEFAULT_TEAMS.iter().map(|t| t.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            data_dir: None,
            upload_dir: None,
            teams: default_teams(),
            output_format: OutputFormat::default(),
            ai: AiConfig::default(),
            scoring: ScoreRules::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NotFound)?.join(APP_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Directory holding the JSON tables
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir().ok_or(ConfigError::NotFound)?.join(APP_DIR);
        Ok(data_dir)
    }

    /// Directory holding uploaded files
    pub fn upload_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.upload_dir {
            return Ok(dir.clone());
        }
        Ok(self.data_dir()?.join("uploads"))
    }

    /// Load config from the default location, or defaults when absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `PORTAL_BIND` and `PORTAL_DATA_DIR` from the environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup("PORTAL_BIND").filter(|v| !v.trim().is_empty()) {
            self.bind_addr = bind.trim().to_string();
        }
        if let Some(dir) = lookup("PORTAL_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir.trim()));
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Safety Portal Configuration")?;
        writeln!(f, "===========================")?;
        writeln!(f)?;
        writeln!(f, "Bind address:   {}", self.bind_addr)?;
        writeln!(
            f,
            "Data dir:       {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(
            f,
            "Upload dir:     {}",
            self.upload_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Teams:          {}", self.teams.join(", "))?;
        writeln!(f, "AI base URL:    {}", self.ai.base_url)?;
        writeln!(f, "AI model:       {}", self.ai.model)?;
        writeln!(
            f,
            "AI backend:     {}",
            if self.ai.resolved_api_key().is_some() {
                "openai"
            } else {
                "faq (no API key)"
            }
        )?;
        writeln!(f, "Base score:     {}", self.scoring.base)?;
        writeln!(f, "Output format:  {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert_eq!(config.teams.len(), 7);
        assert_eq!(config.scoring.base, 100);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.data_dir = Some(dir.path().join("data"));
        config.ai.model = "gpt-4o".to_string();
        config.scoring.fine_speed = -2;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ai.model, "gpt-4o");
        assert_eq!(loaded.scoring.fine_speed, -2);
        assert_eq!(loaded.upload_dir().unwrap(), dir.path().join("data").join("uploads"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "bind_addr = \"127.0.0.1:8080\"\n[scoring]\nbase = 90\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.scoring.base, 90);
        assert_eq!(config.scoring.accident, -40);
        assert_eq!(config.ai.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "teams = 3").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, portal_types::Error::Config(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(|name| match name {
            "PORTAL_BIND" => Some("127.0.0.1:9000".to_string()),
            "PORTAL_DATA_DIR" => Some("/srv/portal".to_string()),
            _ => None,
        });
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.data_dir.unwrap(), PathBuf::from("/srv/portal"));
    }
}
