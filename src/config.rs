use std::{
    env, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;
use strum::{Display, EnumString};
use thiserror::Error;

pub const CONFIG_ENV: &str = "PIPESH_CONFIG";
pub const PROMPT_ENV: &str = "PIPESH_PROMPT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid PIPESH_PROMPT value {0:?}")]
    PromptMode(String),
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub prompt: PromptConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptConfig {
    pub show: PromptMode,
    pub color: bool,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            show: PromptMode::Auto,
            color: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PromptMode {
    /// Only when stdin is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Log to `directory/file` instead of stderr.
    pub directory: Option<PathBuf>,
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file: "pipesh.log".into(),
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl Config {
    /// Loads `$PIPESH_CONFIG`, or the per-user config file if one exists, and
    /// applies environment overrides. No file at all means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match config_path() {
            Some(path) => Self::from_path(&path)?,
            None => Self::default(),
        };

        if let Ok(mode) = env::var(PROMPT_ENV) {
            config.prompt.show = mode
                .parse()
                .map_err(|_| ConfigError::PromptMode(mode.clone()))?;
        }

        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        text.parse()
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV) {
        return Some(path.into());
    }

    let base = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

    Some(base.join("pipesh").join("config.toml")).filter(|path| path.is_file())
}
