//! Transport seam between the extractor and the network

use crate::error::Result;
use crate::types::Method;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Sends one request and returns the parsed response body
///
/// Implementations make a single attempt. Errors are returned as they
/// occur; callers do not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `body` to `path` (relative to the transport's base URL)
    async fn send(&self, method: Method, path: &str, body: &Value) -> Result<Value>;

    /// `POST` a JSON body
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::POST, path, body).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, method: Method, path: &str, body: &Value) -> Result<Value> {
        (**self).send(method, path, body).await
    }
}
