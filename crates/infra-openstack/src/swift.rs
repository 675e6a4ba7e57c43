// Swift object store adapter
// reason: reqwest for the Swift v1 HTTP API

use crate::endpoint::Endpoint;
use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use tripleo_actions_core::port::object_store::{
    ContainerSummary, Headers, ObjectStore, ObjectStoreError, ObjectSummary,
};

/// Characters of an error body kept in the failure message
const ERROR_BODY_PREFIX: usize = 60;

/// Swift v1 client
pub struct SwiftClient {
    endpoint: Endpoint,
}

impl SwiftClient {
    /// Create a client for the account at `endpoint`
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    fn listing_url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.url(segments);
        url.query_pairs_mut().append_pair("format", "json");
        url
    }

    async fn send(
        &self,
        kind: &str,
        method: Method,
        url: Url,
        headers: &Headers,
    ) -> Result<Response, ObjectStoreError> {
        debug!(method = %method, url = %url, "Swift request");

        let mut request = self.endpoint.client().request(method.clone(), url.clone());
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ObjectStoreError::Transport(e.to_string()))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let prefix: String = body.chars().take(ERROR_BODY_PREFIX).collect();

        Err(ObjectStoreError::Client(
            format!("{} {} failed: {} {} {}", kind, method, url, status, prefix)
                .trim_end()
                .to_string(),
        ))
    }

    async fn listing<T: DeserializeOwned>(
        response: Response,
    ) -> Result<(Headers, Vec<T>), ObjectStoreError> {
        let headers = response_headers(&response);
        let body = response
            .bytes()
            .await
            .map_err(|e| ObjectStoreError::Transport(e.to_string()))?;

        // 204 No Content is an empty listing
        if body.is_empty() {
            return Ok((headers, Vec::new()));
        }

        let items = serde_json::from_slice(&body)
            .map_err(|e| ObjectStoreError::InvalidResponse(e.to_string()))?;
        Ok((headers, items))
    }
}

fn response_headers(response: &Response) -> Headers {
    response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
        })
        .collect()
}

#[async_trait]
impl ObjectStore for SwiftClient {
    async fn get_account(&self) -> Result<(Headers, Vec<ContainerSummary>), ObjectStoreError> {
        let response = self
            .send("Account", Method::GET, self.listing_url(&[]), &Headers::new())
            .await?;
        Self::listing(response).await
    }

    async fn get_container(
        &self,
        container: &str,
    ) -> Result<(Headers, Vec<ObjectSummary>), ObjectStoreError> {
        let response = self
            .send(
                "Container",
                Method::GET,
                self.listing_url(&[container]),
                &Headers::new(),
            )
            .await?;
        Self::listing(response).await
    }

    async fn put_container(
        &self,
        container: &str,
        headers: &Headers,
    ) -> Result<(), ObjectStoreError> {
        self.send(
            "Container",
            Method::PUT,
            self.endpoint.url(&[container]),
            headers,
        )
        .await?;
        Ok(())
    }

    async fn get_object(
        &self,
        container: &str,
        object: &str,
    ) -> Result<(Headers, Vec<u8>), ObjectStoreError> {
        let response = self
            .send(
                "Object",
                Method::GET,
                self.endpoint.url(&[container, object]),
                &Headers::new(),
            )
            .await?;

        let headers = response_headers(&response);
        let body = response
            .bytes()
            .await
            .map_err(|e| ObjectStoreError::Transport(e.to_string()))?;
        Ok((headers, body.to_vec()))
    }
}
