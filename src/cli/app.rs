//! Base for command-line clients of a single HTTP service
//!
//! A client binary parses its arguments, installs logging, then builds a
//! [`ClientApp`] which loads the configuration once. Each command asks the
//! app for a [`RequestContext`] and issues its requests through it.

use crate::cli::args::{AuthArgs, GlobalArgs};
use crate::cli::context::RequestContext;
use crate::cli::http_client::{auth_header, build_url, HttpClient};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use log::debug;
use reqwest::header::HeaderMap;
use std::path::{Path, PathBuf};

/// Conventional configuration path for `app_name`: `~/.<app_name>/client.ini`
pub fn default_config_path(app_name: &str) -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(format!(".{}", app_name)).join("client.ini"))
}

/// Pick the configuration file: explicit option first, then the app default
pub fn resolve_config_path(explicit: Option<&Path>, default: Option<PathBuf>) -> ClientResult<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or(default)
        .ok_or(ClientError::NoConfigPath)
}

/// Loaded configuration plus the HTTP client every command shares
#[derive(Debug, Clone)]
pub struct ClientApp {
    config: ClientConfig,
    http: HttpClient,
}

impl ClientApp {
    /// Load the configuration named by `args` (or `default_config`).
    pub fn initialize(args: &GlobalArgs, default_config: Option<PathBuf>) -> ClientResult<Self> {
        let path = resolve_config_path(args.config.as_deref(), default_config)?;
        debug!("Configuration file: {}", path.display());
        let config = ClientConfig::load(&path)?;
        Self::with_config(config)
    }

    /// Build an app around an already-loaded configuration
    pub fn with_config(config: ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            config,
            http: HttpClient::new()?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn server_url(&self) -> &str {
        self.config.server_url()
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// URL of `segments` under the configured server
    pub fn url<I, S>(&self, segments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        build_url(self.server_url(), segments)
    }

    /// Impersonation header for a command: `--as-user` first, then the configured user
    pub fn auth_header(&self, auth: &AuthArgs) -> ClientResult<HeaderMap> {
        auth_header(auth.as_user.as_deref(), self.config.user())
    }

    /// Request context for one command invocation
    pub fn context(&self, auth: &AuthArgs) -> ClientResult<RequestContext<'_>> {
        RequestContext::new(
            &self.http,
            self.server_url(),
            auth.as_user.as_deref(),
            self.config.user(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_config_path_prefers_explicit() {
        let path = resolve_config_path(
            Some(Path::new("/etc/explicit.ini")),
            Some(PathBuf::from("/home/u/.ats/client.ini")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/etc/explicit.ini"));
    }

    #[test]
    fn test_resolve_config_path_falls_back_to_default() {
        let path = resolve_config_path(None, Some(PathBuf::from("/home/u/.ats/client.ini"))).unwrap();
        assert_eq!(path, PathBuf::from("/home/u/.ats/client.ini"));
    }

    #[test]
    fn test_resolve_config_path_without_any() {
        assert!(matches!(
            resolve_config_path(None, None),
            Err(ClientError::NoConfigPath)
        ));
    }

    #[test]
    fn test_default_config_path_layout() {
        if let Some(path) = default_config_path("ats") {
            assert!(path.ends_with(".ats/client.ini"));
        }
    }
}
