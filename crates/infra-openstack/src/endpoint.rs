//! Service endpoint and authenticated HTTP client

use crate::error::{OpenStackError, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;
use url::Url;

/// Token auth header shared by Swift and Mistral
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Base URL of one OpenStack service plus the client used to reach it
#[derive(Debug, Clone)]
pub struct Endpoint {
    base: Url,
    client: reqwest::Client,
}

impl Endpoint {
    /// Build an endpoint
    ///
    /// # Arguments
    /// * `url` - Service base URL, e.g. `http://192.0.2.1:8080/v1/AUTH_admin`
    /// * `token` - Keystone token sent as `X-Auth-Token` on every request
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    /// Returns `OpenStackError` if the URL cannot carry path segments or the
    /// token is not a valid header value
    pub fn new(url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let base = Url::parse(url).map_err(|e| OpenStackError::InvalidUrl(format!("{}: {}", url, e)))?;
        if base.cannot_be_a_base() {
            return Err(OpenStackError::InvalidUrl(format!("{}: not a base URL", url)));
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(token)
                .map_err(|e| OpenStackError::InvalidToken(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTH_TOKEN_HEADER, value);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { base, client })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Base URL with `segments` appended, each percent-encoded
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
