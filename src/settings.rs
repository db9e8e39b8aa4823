use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const MIN_SAVED_NOTICE_MS: u64 = 250;
const MAX_SAVED_NOTICE_MS: u64 = 10_000;
const DEFAULT_SAVED_NOTICE_MS: u64 = 1_500;

/// Environment override for the backend origin; a `--api-url` flag wins
/// over this, which wins over the settings file.
pub const API_URL_ENV: &str = "TASK_BOARD_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend origin; the client appends `/api`.
    pub api_url: String,
    /// How long the "saved" indicator dwells before reverting to idle.
    pub saved_notice_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            saved_notice_ms: DEFAULT_SAVED_NOTICE_MS,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("task-board");
        path.push("settings.toml");
        Some(path)
    }

    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        Self::load_from_path(&path)
    }

    fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(mut settings) => {
                    settings.validate();
                    settings
                }
                Err(error) => {
                    warn!(
                        "failed to parse settings config '{}': {}",
                        path.display(),
                        error
                    );
                    Self::default()
                }
            },
            Err(error) => {
                warn!(
                    "failed to read settings config '{}': {}",
                    path.display(),
                    error
                );
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path().ok_or_else(|| anyhow!("unable to determine config path"))?;
        self.save_to_path(&path)
    }

    fn save_to_path(&self, path: &Path) -> anyhow::Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("invalid settings config path"))?;
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory '{}'", parent.display()))?;

        let mut validated = self.clone();
        validated.validate();
        let contents =
            toml::to_string_pretty(&validated).context("failed to serialize settings to TOML")?;

        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow!("invalid settings config file name"))?
            .to_string_lossy()
            .to_string();
        let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

        fs::write(&tmp_path, contents).with_context(|| {
            format!(
                "failed to write temporary settings file '{}'",
                tmp_path.display()
            )
        })?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "failed to atomically rename settings file '{}' to '{}'",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    fn validate(&mut self) {
        self.saved_notice_ms = self
            .saved_notice_ms
            .clamp(MIN_SAVED_NOTICE_MS, MAX_SAVED_NOTICE_MS);

        let trimmed = self.api_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            warn!("empty api_url in settings config; falling back to default");
            self.api_url = DEFAULT_API_URL.to_string();
        } else {
            self.api_url = trimmed.to_string();
        }
    }
}
