//! turbopuffer HTTP backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};

use super::VectorStore;
use crate::error::VectorStoreError;
use crate::models::{ApiKey, UpsertRequest, VectorStoreConfig};
use crate::utils::retry::{RetryConfig, with_retry};

const NAMESPACES_PATH: &str = "/v1/namespaces";

/// turbopuffer REST client.
#[derive(Debug, Clone)]
pub struct TurbopufferStore {
    client: Client,
    base_url: String,
    api_key: ApiKey,
    retry: RetryConfig,
}

impl TurbopufferStore {
    pub fn new(config: &VectorStoreConfig, api_key: ApiKey) -> Result<Self, VectorStoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key,
            retry: RetryConfig::new(3).with_initial_delay(Duration::from_millis(500)),
        })
    }

    fn namespace_url(&self, namespace: &str) -> String {
        format!("{}{}/{}", self.base_url, NAMESPACES_PATH, namespace)
    }

    fn request(&self, method: Method, namespace: &str) -> RequestBuilder {
        self.client
            .request(method, self.namespace_url(namespace))
            .bearer_auth(self.api_key.expose())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, VectorStoreError> {
        request
            .send()
            .await
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))
    }
}

async fn status_error(namespace: &str, response: Response) -> VectorStoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    VectorStoreError::RequestError {
        namespace: namespace.to_string(),
        status,
        body,
    }
}

#[async_trait]
impl VectorStore for TurbopufferStore {
    async fn exists(&self, namespace: &str) -> Result<bool, VectorStoreError> {
        with_retry(&self.retry, || async move {
            let response = self.send(self.request(Method::HEAD, namespace)).await?;
            match response.status() {
                StatusCode::NOT_FOUND => Ok(false),
                status if status.is_success() => Ok(true),
                _ => Err(status_error(namespace, response).await),
            }
        })
        .await
        .into_result()
    }

    async fn upsert(
        &self,
        namespace: &str,
        request: UpsertRequest,
    ) -> Result<(), VectorStoreError> {
        let request = &request;
        with_retry(&self.retry, || async move {
            let response = self
                .send(self.request(Method::POST, namespace).json(request))
                .await?;
            if !response.status().is_success() {
                return Err(status_error(namespace, response).await);
            }
            Ok(())
        })
        .await
        .into_result()
    }

    async fn delete_all(&self, namespace: &str) -> Result<(), VectorStoreError> {
        with_retry(&self.retry, || async move {
            let response = self.send(self.request(Method::DELETE, namespace)).await?;
            if !response.status().is_success() {
                return Err(status_error(namespace, response).await);
            }
            Ok(())
        })
        .await
        .into_result()
    }
}
