//! SpotLive configuration.
//!
//! Settings come from `~/.config/spotlive/config.toml`, overridden by
//! `SPOTLIVE_*` environment variables (e.g. `SPOTLIVE_SUPABASE_URL`).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{SpotLiveError, SpotLiveResult};

static DEFAULT_IMAGE_BUCKET: &str = "event-images";

fn default_image_bucket() -> String {
    DEFAULT_IMAGE_BUCKET.to_string()
}

/// Configuration at ~/.config/spotlive/config.toml
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpotLiveConfig {
    /// Base URL of the Supabase project, e.g. `https://xyz.supabase.co`
    pub supabase_url: Option<String>,

    /// Public (anon) API key of the project
    pub supabase_anon_key: Option<String>,

    /// Storage bucket that receives event images
    #[serde(default = "default_image_bucket")]
    pub image_bucket: String,
}

impl Default for SpotLiveConfig {
    fn default() -> Self {
        SpotLiveConfig {
            supabase_url: None,
            supabase_anon_key: None,
            image_bucket: default_image_bucket(),
        }
    }
}

/// Values the gateway client cannot start without.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub url: String,
    pub anon_key: String,
    pub image_bucket: String,
}

impl SpotLiveConfig {
    pub fn config_dir() -> SpotLiveResult<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| SpotLiveError::Config("Could not determine config directory".into()))?
            .join("spotlive"))
    }

    pub fn config_path() -> SpotLiveResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the config file (created with commented defaults if missing),
    /// then apply `SPOTLIVE_*` environment overrides.
    pub fn load() -> SpotLiveResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path, Environment::with_prefix("SPOTLIVE"))
    }

    fn load_from(path: &Path, env: Environment) -> SpotLiveResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(env)
            .build()
            .map_err(|e| SpotLiveError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SpotLiveError::Config(e.to_string()))
    }

    /// Both connection values, or a config error naming what is missing.
    pub fn gateway_settings(&self) -> SpotLiveResult<GatewaySettings> {
        let url = non_blank(self.supabase_url.as_deref()).ok_or_else(|| {
            SpotLiveError::Config(
                "supabase_url is not set (config.toml or SPOTLIVE_SUPABASE_URL)".into(),
            )
        })?;
        let anon_key = non_blank(self.supabase_anon_key.as_deref()).ok_or_else(|| {
            SpotLiveError::Config(
                "supabase_anon_key is not set (config.toml or SPOTLIVE_SUPABASE_ANON_KEY)".into(),
            )
        })?;

        Ok(GatewaySettings {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            image_bucket: self.image_bucket.clone(),
        })
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> SpotLiveResult<()> {
        let contents = format!(
            "\
# spotlive configuration

# Supabase project URL and public anon key:
# supabase_url = \"https://your-project.supabase.co\"
# supabase_anon_key = \"your-anon-key\"

# Storage bucket for event images:
# image_bucket = \"{}\"
",
            DEFAULT_IMAGE_BUCKET
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SpotLiveError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SpotLiveError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
