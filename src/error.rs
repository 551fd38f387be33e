//! Error types shared by the configuration loader and the HTTP helpers.
//!
//! Every failure kind gets its own variant so that callers can tell a missing
//! config file from an unsafe one, or a malformed file from a missing key,
//! without string matching.

use reqwest::StatusCode;
use std::fmt;
use std::path::PathBuf;

/// The mode bit that made a configuration file unsafe to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionProblem {
    GroupReadable,
    GroupWritable,
    WorldReadable,
    WorldWritable,
}

impl fmt::Display for PermissionProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GroupReadable => write!(f, "group readable"),
            Self::GroupWritable => write!(f, "group writable"),
            Self::WorldReadable => write!(f, "world readable"),
            Self::WorldWritable => write!(f, "world writable"),
        }
    }
}

/// Errors raised while loading configuration or talking to the server
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The configuration file does not exist
    #[error("The configuration file {} was not found", .path.display())]
    NotFound { path: PathBuf },

    /// The configuration file is readable or writable by someone other than its owner
    #[error("The configuration file {} is {problem}", .path.display())]
    Permission {
        path: PathBuf,
        problem: PermissionProblem,
    },

    /// The configuration file is not valid INI
    #[error("Failed to parse {} at line {line}, column {column}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// A required configuration key is absent
    #[error("Missing required configuration key '{key}' in section [{section}]")]
    MissingKey { section: String, key: String },

    /// The server answered with a non-2xx status
    #[error("HTTP {status} for {url}: {body}")]
    Http {
        status: StatusCode,
        url: String,
        body: String,
    },

    /// The request never produced a response
    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A header value could not be encoded
    #[error("Invalid value for header {name}: {value:?}")]
    InvalidHeader { name: String, value: String },

    /// A response body was not the expected JSON shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Any other filesystem failure while reading the configuration
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither `--config`, the environment, nor the application supplied a path
    #[error("No configuration file given; pass --config or set ATS_CLIENT_CONFIG")]
    NoConfigPath,
}

impl ClientError {
    /// Create a missing-key error for `section.key`
    pub fn missing_key<S: Into<String>, K: Into<String>>(section: S, key: K) -> Self {
        Self::MissingKey {
            section: section.into(),
            key: key.into(),
        }
    }

    /// Map an IO error on `path`, turning `NotFound` into its own variant
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
