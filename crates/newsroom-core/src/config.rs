use std::path::{Path, PathBuf};

use newsroom_api::{ApiVersion, Credentials, PendingDeletions, PortalContext};
use serde::{Deserialize, Serialize};

/// Main configuration structure
///
/// Loaded from the config file; the CLI layers env vars and flags on top.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub undo: UndoConfig,
}

impl Config {
    /// Load config from default location, defaults if there is no file
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `<config dir>/newsroom/config.toml`
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("newsroom");

        Ok(config_dir.join("config.toml"))
    }

    /// Where pending deletions are kept between runs
    pub fn undo_store_path(&self) -> crate::Result<PathBuf> {
        if let Some(ref path) = self.undo.store_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find data directory".into()))?
            .join("newsroom");

        Ok(data_dir.join("pending_deletions.json"))
    }

    pub fn open_undo_store(&self) -> crate::Result<PendingDeletions> {
        Ok(PendingDeletions::load_from(self.undo_store_path()?)?)
    }

    /// The context every client gets handed
    pub fn portal_context(&self) -> PortalContext {
        let p = &self.portal;
        PortalContext {
            base_url: p.base_url.clone(),
            context: p.context.clone(),
            rest: p.rest.clone(),
            content_path: p.content_path.clone(),
            portal_name: p.portal_name.clone(),
            container_name: p.container_name.clone(),
            meta_portal_name: p.meta_portal_name.clone(),
            user_name: self
                .portal
                .user_name
                .clone()
                .or_else(|| self.auth.username.clone())
                .unwrap_or_default(),
            language: p.language.clone(),
            space_id: p.space_id.clone(),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.auth.username.clone(),
            password: self.auth.password.clone(),
            session_cookie: self.auth.session_cookie.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Scheme and host of the portal
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_context")]
    pub context: String,

    #[serde(default = "default_rest")]
    pub rest: String,

    #[serde(default = "default_content_path")]
    pub content_path: String,

    #[serde(default = "default_portal_name")]
    pub portal_name: String,

    #[serde(default = "default_container_name")]
    pub container_name: String,

    #[serde(default = "default_portal_name")]
    pub meta_portal_name: String,

    /// Defaults to the auth username
    pub user_name: Option<String>,

    pub language: Option<String>,

    pub space_id: Option<String>,

    /// `contents` on current portals, `v1_news` on older ones
    #[serde(default)]
    pub api_version: ApiVersion,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_context() -> String {
    "/portal".to_string()
}

fn default_rest() -> String {
    "rest".to_string()
}

fn default_content_path() -> String {
    "/content".to_string()
}

fn default_portal_name() -> String {
    "dw".to_string()
}

fn default_container_name() -> String {
    "portal".to_string()
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            context: default_context(),
            rest: default_rest(),
            content_path: default_content_path(),
            portal_name: default_portal_name(),
            container_name: default_container_name(),
            meta_portal_name: default_portal_name(),
            user_name: None,
            language: None,
            space_id: None,
            api_version: ApiVersion::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    /// e.g. `JSESSIONID=...` copied from a browser session
    pub session_cookie: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UndoConfig {
    /// Override for the pending deletions file
    pub store_path: Option<PathBuf>,
}
