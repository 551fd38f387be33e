//! Core client functions for command-line tools that talk to a single HTTP service.
//!
//! A client loads an owner-only INI configuration naming the server, joins
//! request paths onto the server URL, optionally impersonates a user through
//! the `X-Auth-UserId` header, and reports failed requests together with the
//! body the server sent back. Lists of objects returned by the server can be
//! reshaped into tables for display.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use cli::app::{default_config_path, ClientApp};
pub use cli::args::{AuthArgs, GlobalArgs};
pub use cli::context::RequestContext;
pub use cli::http_client::{auth_header, build_url, HttpClient, RequestOptions, AUTH_USER_HEADER};
pub use cli::table::{list_to_table, render_table};
pub use config::{ClientConfig, SessionConfig};
pub use error::{ClientError, ClientResult, PermissionProblem};
