//! HTTP client for CLI commands with verbose error reporting
//!
//! This module wraps a blocking `reqwest` client. Non-2xx responses are
//! turned into [`ClientError::Http`] carrying the response body, since that
//! body is usually where the server explains what went wrong. Requests are
//! never retried.

use crate::error::{ClientError, ClientResult};
use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;

/// Header carrying the user a request is made on behalf of
pub const AUTH_USER_HEADER: &str = "X-Auth-UserId";

/// Join a base URL and path segments with exactly one `/` between parts.
///
/// Leading and trailing slashes are trimmed from every part, and parts that
/// are empty after trimming are skipped, so joining is idempotent whether or
/// not the inputs already carry slashes.
pub fn build_url<I, S>(base_url: &str, segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut url = base_url.trim_matches('/').to_string();
    for segment in segments {
        let segment = segment.as_ref().trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        if !url.is_empty() {
            url.push('/');
        }
        url.push_str(segment);
    }
    url
}

/// The user to impersonate: the explicit override, else the configured default.
///
/// Empty strings count as unset.
pub fn impersonated_user<'a>(explicit: Option<&'a str>, default: Option<&'a str>) -> Option<&'a str> {
    explicit
        .filter(|user| !user.is_empty())
        .or_else(|| default.filter(|user| !user.is_empty()))
}

/// Build the impersonation header.
///
/// Returns an empty map when no user is known; anonymous requests are allowed.
pub fn auth_header(explicit: Option<&str>, default: Option<&str>) -> ClientResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    match impersonated_user(explicit, default) {
        Some(user) => {
            let value = HeaderValue::from_str(user).map_err(|_| ClientError::InvalidHeader {
                name: AUTH_USER_HEADER.to_string(),
                value: user.to_string(),
            })?;
            headers.insert(HeaderName::from_static("x-auth-userid"), value);
        }
        None => debug!("No user set"),
    }
    Ok(headers)
}

/// Body attached to a request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Text(String),
}

/// Per-request options passed through to the HTTP layer
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl RequestOptions {
    /// Options with no headers, query or body
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `body` serialized as JSON
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ClientResult<Self> {
        self.body = Some(RequestBody::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    /// Send `body` as plain text
    pub fn text<S: Into<String>>(mut self, body: S) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    /// Add a query string pair
    pub fn query<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a single header
    pub fn header(mut self, name: &str, value: &str) -> ClientResult<Self> {
        let invalid = || ClientError::InvalidHeader {
            name: name.to_string(),
            value: value.to_string(),
        };
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Merge a header map; entries already set on these options win
    pub fn with_default_headers(mut self, defaults: &HeaderMap) -> Self {
        let mut merged = defaults.clone();
        merged.extend(self.headers);
        self.headers = merged;
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }
}

/// Blocking HTTP client shared by every command of a CLI
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with transport defaults and no timeout override
    pub fn new() -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("ats-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Perform a request and fail on any non-2xx status.
    ///
    /// The error carries the status and the response body text.
    pub fn request(&self, method: Method, url: &str, options: RequestOptions) -> ClientResult<Response> {
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), url).headers(options.headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        request = match options.body {
            Some(RequestBody::Json(value)) => request.json(&value),
            Some(RequestBody::Text(text)) => request.body(text),
            None => request,
        };

        let response = request.send()?;
        raise_for_status_verbose(&method, response)
    }

    pub fn get(&self, url: &str, options: RequestOptions) -> ClientResult<Response> {
        self.request(Method::GET, url, options)
    }

    pub fn post(&self, url: &str, options: RequestOptions) -> ClientResult<Response> {
        self.request(Method::POST, url, options)
    }

    pub fn put(&self, url: &str, options: RequestOptions) -> ClientResult<Response> {
        self.request(Method::PUT, url, options)
    }

    pub fn delete(&self, url: &str, options: RequestOptions) -> ClientResult<Response> {
        self.request(Method::DELETE, url, options)
    }
}

fn raise_for_status_verbose(method: &Method, response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text()?;
    debug!("{} {} returned {}: {}", method, url, status, body);
    Err(ClientError::Http { status, url, body })
}
