//! Proxy server configuration: optional JSON file plus environment overrides.

use serde::Deserialize;
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const CONFIG_ENV: &str = "NLA_PROXY_CONFIG";
pub const TOKEN_ENV: &str = "VIDEO_INFO_API_TOKEN";
const CONFIG_FILE_NAME: &str = "nla-proxy.config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid listen_addr {0:?}")]
    InvalidAddr(String),
}

/// On-disk shape; every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyConfigFile {
    pub listen_addr: Option<String>,
    pub video_info_base_url: Option<String>,
    pub video_info_token: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProxyConfig {
    pub listen_addr: String,
    pub video_info_base_url: String,
    /// Bearer token for the video-info API; requests go out unauthenticated without one
    pub video_info_token: Option<String>,
    pub user_agent: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8787".to_string(),
            video_info_base_url: "https://api.tikhub.io".to_string(),
            video_info_token: None,
            user_agent: "Mozilla/5.0 (compatible; nla-proxy video fetcher)".to_string(),
        }
    }
}

impl ProxyConfig {
    /// `$NLA_PROXY_CONFIG`, else `./nla-proxy.config.json`, else built-in defaults.
    /// `$VIDEO_INFO_API_TOKEN` wins over a token in the file.
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = if let Ok(p) = std::env::var(CONFIG_ENV) {
            Self::load_from_path(Path::new(&p))?
        } else {
            let local = std::env::current_dir()
                .map(|cwd| cwd.join(CONFIG_FILE_NAME))
                .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE_NAME));
            if local.exists() {
                Self::load_from_path(&local)?
            } else {
                Self::default()
            }
        };
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                cfg.video_info_token = Some(token);
            }
        }
        Ok(cfg)
    }

    pub fn load_from_path(cfg_path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(cfg_path).map_err(|source| ConfigError::Io {
            path: cfg_path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| ConfigError::Parse {
            path: cfg_path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let file_cfg: ProxyConfigFile = serde_json::from_str(raw)?;
        let defaults = Self::default();
        Ok(Self {
            listen_addr: file_cfg.listen_addr.unwrap_or(defaults.listen_addr),
            video_info_base_url: file_cfg
                .video_info_base_url
                .unwrap_or(defaults.video_info_base_url),
            video_info_token: file_cfg.video_info_token.filter(|t| !t.trim().is_empty()),
            user_agent: file_cfg.user_agent.unwrap_or(defaults.user_agent),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(self.listen_addr.clone()))
    }
}
