//! Startup configuration.
//!
//! All values come from environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `API_ORIGIN` | required | Origin of the shop server, e.g. `https://larek-api.nomoreparties.co` |
//! | `LAREK_API_PATH` | `/api/weblarek` | Path of the JSON API under the origin |
//! | `LAREK_CDN_PATH` | `/content/weblarek` | Path of product images under the origin |
//! | `RUST_LOG` | `info` | Log filter |

use crate::error::ConfigError;

/// Default API path under the origin
pub const DEFAULT_API_PATH: &str = "/api/weblarek";
/// Default image path under the origin
pub const DEFAULT_CDN_PATH: &str = "/content/weblarek";
/// Default log filter
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Storefront configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Origin without a trailing slash
    pub api_origin: String,
    /// API path under the origin
    pub api_path: String,
    /// Image path under the origin
    pub cdn_path: String,
    /// `tracing` filter directive
    pub log_filter: String,
}

impl Config {
    /// Configuration for `origin` with default paths
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOrigin`] if `origin` is not an absolute http(s) URL.
    pub fn new(origin: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_origin: normalize_origin(origin.into())?,
            api_path: DEFAULT_API_PATH.to_string(),
            cdn_path: DEFAULT_CDN_PATH.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        })
    }

    /// Read configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if `API_ORIGIN` is unset, or
    /// [`ConfigError::InvalidOrigin`] if it is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let origin = lookup("API_ORIGIN")
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing("API_ORIGIN"))?;

        let mut config = Self::new(origin)?;
        if let Some(path) = lookup("LAREK_API_PATH") {
            config.api_path = path;
        }
        if let Some(path) = lookup("LAREK_CDN_PATH") {
            config.cdn_path = path;
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config.log_filter = filter;
        }
        Ok(config)
    }

    /// Base URL of the JSON API
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("{}{}", self.api_origin, self.api_path)
    }

    /// Prefix for product image paths
    #[must_use]
    pub fn cdn_url(&self) -> String {
        format!("{}{}", self.api_origin, self.cdn_path)
    }
}

fn normalize_origin(origin: String) -> Result<String, ConfigError> {
    let trimmed = origin.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed).map_err(|e| ConfigError::InvalidOrigin {
        origin: origin.clone(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidOrigin {
            reason: format!("unsupported scheme {}", url.scheme()),
            origin,
        });
    }

    Ok(trimmed.to_string())
}
