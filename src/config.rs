//! Application configuration and well-known paths.
//!
//! Both values are built once in `main` and handed to each component by
//! reference. Precedence for configuration values: environment variables
//! (`HVM_GITHUBTOKEN`, `HVM_NUMTAGSTODISPLAY`, `HVM_SORTASCENDING`), then the
//! TOML file in the user configuration directory, then defaults.

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::HvmError;
use crate::runtime::Runtime;

pub const APP_NAME: &str = "hvm";
pub const REPOSITORY_OWNER: &str = "gohugoio";
pub const REPOSITORY_NAME: &str = "hugo";
pub const SELF_REPOSITORY_OWNER: &str = "jmooring";
pub const SELF_REPOSITORY_NAME: &str = "hvm";
pub const SELF_UPDATE_URL: &str = "https://github.com/jmooring/hvm/releases/latest";
pub const DEFAULT_DIR_NAME: &str = "default";
pub const DOT_FILE_NAME: &str = ".hvm";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_NUM_TAGS_TO_DISPLAY: i64 = 30;

const ENV_GITHUB_TOKEN: &str = "HVM_GITHUBTOKEN";
const ENV_NUM_TAGS_TO_DISPLAY: &str = "HVM_NUMTAGSTODISPLAY";
const ENV_SORT_ASCENDING: &str = "HVM_SORTASCENDING";

const DEFAULT_CONFIG_FILE: &str = "githubToken = ''\nnumTagsToDisplay = 30\nsortAscending = false\n";

/// Typed, validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub github_token: Option<String>,
    /// Number of tags offered for selection; negative means all.
    pub num_tags_to_display: i64,
    pub sort_ascending: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            num_tags_to_display: DEFAULT_NUM_TAGS_TO_DISPLAY,
            sort_ascending: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    github_token: Option<String>,
    num_tags_to_display: Option<i64>,
    sort_ascending: Option<bool>,
}

impl AppConfig {
    /// Load configuration from `config_file`, creating it with defaults when absent,
    /// then apply environment overrides.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, config_file: &Path) -> Result<Self> {
        if !runtime.exists(config_file) {
            if let Some(parent) = config_file.parent() {
                runtime.create_dir_all(parent)?;
            }
            debug!("Writing default configuration to {:?}", config_file);
            runtime.write(config_file, DEFAULT_CONFIG_FILE.as_bytes())?;
        }

        let content = runtime.read_to_string(config_file)?;
        let mut config = Self::from_toml(&content, config_file)?;
        config.apply_env(runtime, config_file)?;
        config.validate(config_file)?;
        Ok(config)
    }

    fn from_toml(content: &str, config_file: &Path) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| {
            HvmError::Config(format!("{}: see {}", e.message(), config_file.display()))
        })?;

        let defaults = Self::default();
        Ok(Self {
            github_token: file.github_token.filter(|t| !t.is_empty()),
            num_tags_to_display: file
                .num_tags_to_display
                .unwrap_or(defaults.num_tags_to_display),
            sort_ascending: file.sort_ascending.unwrap_or(defaults.sort_ascending),
        })
    }

    fn apply_env<R: Runtime>(&mut self, runtime: &R, config_file: &Path) -> Result<()> {
        if let Ok(token) = runtime.env_var(ENV_GITHUB_TOKEN) {
            self.github_token = Some(token).filter(|t| !t.is_empty());
        }

        if let Ok(value) = runtime.env_var(ENV_NUM_TAGS_TO_DISPLAY) {
            self.num_tags_to_display = value.trim().parse().map_err(|_| {
                HvmError::Config(format!(
                    "numTagsToDisplay must be a non-zero integer: see {}",
                    config_file.display()
                ))
            })?;
        }

        if let Ok(value) = runtime.env_var(ENV_SORT_ASCENDING) {
            self.sort_ascending = parse_bool(&value).ok_or_else(|| {
                HvmError::Config(format!(
                    "sortAscending must be a boolean: see {}",
                    config_file.display()
                ))
            })?;
        }

        Ok(())
    }

    fn validate(&self, config_file: &Path) -> Result<()> {
        if self.num_tags_to_display == 0 {
            return Err(HvmError::Config(format!(
                "numTagsToDisplay must be a non-zero integer: see {}",
                config_file.display()
            ))
            .into());
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "t" => Some(true),
        "false" | "0" | "f" => Some(false),
        _ => None,
    }
}

/// Filesystem locations used by the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AppPaths {
    pub cache_dir: PathBuf,
    pub config_dir: PathBuf,
    pub working_dir: PathBuf,
    pub default_dir_name: String,
    pub dot_file_name: String,
}

impl AppPaths {
    /// Resolve application paths. `cache_dir` and `config_dir` override the
    /// per-user defaults; the cache directory is created if needed.
    #[tracing::instrument(skip(runtime))]
    pub fn resolve<R: Runtime>(
        runtime: &R,
        cache_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let cache_dir = match cache_dir {
            Some(dir) => dir,
            None => runtime
                .cache_dir()
                .context("Unable to determine the user cache directory")?
                .join(APP_NAME),
        };
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => runtime
                .config_dir()
                .context("Unable to determine the user config directory")?
                .join(APP_NAME),
        };
        let working_dir = runtime.current_dir()?;

        runtime.create_dir_all(&cache_dir)?;

        Ok(Self {
            cache_dir,
            config_dir,
            working_dir,
            default_dir_name: DEFAULT_DIR_NAME.to_string(),
            dot_file_name: DOT_FILE_NAME.to_string(),
        })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    pub fn default_dir(&self) -> PathBuf {
        self.cache_dir.join(&self.default_dir_name)
    }

    pub fn dot_file_path(&self) -> PathBuf {
        self.working_dir.join(&self.dot_file_name)
    }
}
