//! Client configuration loading
//!
//! A client reads a single INI file at startup. The file must be private to
//! its owner, must contain a `[session]` section with `server_url`, and may
//! name a default `user` to impersonate. The loaded configuration never
//! changes for the rest of the process.

pub mod ini;
pub mod permissions;

use crate::error::{ClientError, ClientResult};
use ini::IniDocument;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Section holding the connection settings
pub const SESSION_SECTION: &str = "session";
/// Required key: base URL of the service
pub const SERVER_URL_KEY: &str = "server_url";
/// Optional key: user id sent when `--as-user` is not given
pub const USER_KEY: &str = "user";

/// Typed view of the `[session]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Base URL every request path is joined onto
    pub server_url: String,
    /// Default user to impersonate, if any
    pub user: Option<String>,
}

impl SessionConfig {
    fn from_document(doc: &IniDocument) -> ClientResult<Self> {
        let server_url = doc
            .get(SESSION_SECTION, SERVER_URL_KEY)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ClientError::missing_key(SESSION_SECTION, SERVER_URL_KEY))?
            .to_string();

        let user = doc
            .get(SESSION_SECTION, USER_KEY)
            .filter(|user| !user.is_empty())
            .map(str::to_string);

        Ok(Self { server_url, user })
    }
}

/// A validated client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Canonical path the configuration was read from
    pub path: PathBuf,
    /// Connection settings
    pub session: SessionConfig,
    document: IniDocument,
}

impl ClientConfig {
    /// Load and validate the configuration file at `path`.
    ///
    /// Fails with [`ClientError::NotFound`] when the file is missing,
    /// [`ClientError::Permission`] when group or world may read or write it,
    /// [`ClientError::Parse`] when it is not UTF-8 or not valid INI and
    /// [`ClientError::MissingKey`] when `session.server_url` is absent.
    pub fn load<P: AsRef<Path>>(path: P) -> ClientResult<Self> {
        let requested = path.as_ref();
        let path = fs::canonicalize(requested).map_err(|e| ClientError::from_io(requested, e))?;
        debug!("Configuration file: {}", path.display());

        let metadata = fs::metadata(&path).map_err(|e| ClientError::from_io(&path, e))?;
        if let Some(problem) = permissions::check_metadata(&metadata) {
            return Err(ClientError::Permission { path, problem });
        }

        let content = fs::read(&path).map_err(|e| ClientError::from_io(&path, e))?;
        let document = IniDocument::from_bytes(content).map_err(|e| ClientError::Parse {
            path: path.clone(),
            line: e.line,
            column: e.column,
            message: e.message,
        })?;

        let session = SessionConfig::from_document(&document)?;
        if session.user.is_none() {
            debug!("No default user set in {}", path.display());
        }

        Ok(Self {
            path,
            session,
            document,
        })
    }

    /// Base URL of the service
    pub fn server_url(&self) -> &str {
        &self.session.server_url
    }

    /// Default user to impersonate
    pub fn user(&self) -> Option<&str> {
        self.session.user.as_deref()
    }

    /// Raw lookup for settings outside `[session]`, with `[DEFAULT]` fallback
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.document.get(section, key)
    }

    /// The whole parsed file
    pub fn document(&self) -> &IniDocument {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_requires_server_url() {
        let doc = IniDocument::parse("[session]\nuser=alice\n").unwrap();
        let err = SessionConfig::from_document(&doc).unwrap_err();
        assert!(matches!(
            err,
            ClientError::MissingKey { ref section, ref key } if section == "session" && key == "server_url"
        ));
    }

    #[test]
    fn test_session_without_section() {
        let doc = IniDocument::parse("[other]\nserver_url=http://x\n").unwrap();
        assert!(SessionConfig::from_document(&doc).is_err());
    }

    #[test]
    fn test_empty_user_counts_as_absent() {
        let doc = IniDocument::parse("[session]\nserver_url=http://x\nuser=\n").unwrap();
        let session = SessionConfig::from_document(&doc).unwrap();
        assert_eq!(session.server_url, "http://x");
        assert_eq!(session.user, None);
    }
}
