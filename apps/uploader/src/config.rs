//! Uploader configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/corpus-uploader/config.toml`
//! - Windows: `%APPDATA%/corpus-uploader/config.toml`

use std::io::Write;
use std::path::{Path, PathBuf};

use corpus_client::Credentials;
use corpus_protocol::constants::DEFAULT_BASE_URL;
use corpus_transfer::DEFAULT_CHUNK_SIZE;
use serde::{Deserialize, Serialize};

pub const ENV_BASE_URL: &str = "CORPUS_API_BASE_URL";
pub const ENV_ACCESS_TOKEN: &str = "CORPUS_ACCESS_TOKEN";

/// Uploader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token saved by `login`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Bytes per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    /// Default record language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Default release rights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_rights: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_chunk_size() -> u64 {
    DEFAULT_CHUNK_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            chunk_size: default_chunk_size(),
            language: None,
            release_rights: None,
        }
    }
}

/// Effective connection settings after applying overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub credentials: Credentials,
    pub chunk_size: u64,
}

impl Config {
    /// Loads configuration from `path`, or creates a default if not found.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            anyhow::ensure!(
                config.chunk_size > 0,
                "chunk_size in {} must be positive",
                path.display()
            );
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;

        // The file may hold a bearer token: owner-only from creation on.
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path)?;

        // `mode` only applies to new files; tighten one that already existed.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(content.as_bytes())?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Applies overrides: flag, then environment, then this file.
    pub fn resolve(
        &self,
        base_url_flag: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Settings {
        let base_url = base_url_flag
            .map(str::to_string)
            .or_else(|| env(ENV_BASE_URL).filter(|v| !v.is_empty()))
            .unwrap_or_else(|| self.base_url.clone());
        let token = env(ENV_ACCESS_TOKEN)
            .filter(|v| !v.is_empty())
            .or_else(|| self.access_token.clone());

        Settings {
            base_url,
            credentials: Credentials::from_token(token),
            chunk_size: self.chunk_size,
        }
    }
}

/// Reads a variable from the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("corpus-uploader")
            .join("config.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata)
            .join("corpus-uploader")
            .join("config.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/corpus-uploader/config.toml"))
    }
}
