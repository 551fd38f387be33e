//! Per-invocation request state.

use crate::cli::http_client::{auth_header, build_url, impersonated_user, HttpClient, RequestOptions};
use crate::error::ClientResult;
use reqwest::blocking::Response;
use reqwest::header::HeaderMap;
use reqwest::Method;

/// Base URL, impersonated user and derived headers for one command run.
///
/// Every request made through the context is sent to a URL under the base
/// and carries the context's headers unless the call overrides them.
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    client: &'a HttpClient,
    base_url: String,
    user: Option<String>,
    headers: HeaderMap,
}

impl<'a> RequestContext<'a> {
    pub fn new(
        client: &'a HttpClient,
        base_url: &str,
        explicit_user: Option<&str>,
        default_user: Option<&str>,
    ) -> ClientResult<Self> {
        let headers = auth_header(explicit_user, default_user)?;
        let user = impersonated_user(explicit_user, default_user).map(str::to_string);
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            user,
            headers,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The user requests are made on behalf of, if any
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// URL of `segments` under the base URL
    pub fn url<I, S>(&self, segments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        build_url(&self.base_url, segments)
    }

    pub fn request<I, S>(&self, method: Method, segments: I, options: RequestOptions) -> ClientResult<Response>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let url = self.url(segments);
        self.client.request(method, &url, options.with_default_headers(&self.headers))
    }

    pub fn get<I, S>(&self, segments: I, options: RequestOptions) -> ClientResult<Response>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.request(Method::GET, segments, options)
    }

    pub fn post<I, S>(&self, segments: I, options: RequestOptions) -> ClientResult<Response>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.request(Method::POST, segments, options)
    }

    pub fn put<I, S>(&self, segments: I, options: RequestOptions) -> ClientResult<Response>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.request(Method::PUT, segments, options)
    }

    pub fn delete<I, S>(&self, segments: I, options: RequestOptions) -> ClientResult<Response>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.request(Method::DELETE, segments, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::http_client::AUTH_USER_HEADER;

    #[test]
    fn test_context_derives_headers() {
        let client = HttpClient::new().unwrap();
        let ctx = RequestContext::new(&client, "http://host/", Some("bob"), Some("alice")).unwrap();
        assert_eq!(ctx.user(), Some("bob"));
        assert_eq!(ctx.headers().get(AUTH_USER_HEADER).unwrap(), "bob");
        assert_eq!(ctx.url(["users", "42"]), "http://host/users/42");
    }

    #[test]
    fn test_anonymous_context() {
        let client = HttpClient::new().unwrap();
        let ctx = RequestContext::new(&client, "http://host", None, None).unwrap();
        assert_eq!(ctx.user(), None);
        assert!(ctx.headers().is_empty());
    }
}
