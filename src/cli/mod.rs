//! CLI building blocks: arguments, the application base, HTTP helpers and table output

pub mod app;
pub mod args;
pub mod context;
pub mod http_client;
pub mod table;
