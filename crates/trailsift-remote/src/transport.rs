//! Completion transports.
//!
//! [`CompletionTransport`] is the seam between the parser and the network.
//! [`HttpTransport`] talks to an Ollama-style `/api/generate` endpoint over
//! plain HTTP using the hyper client.

use crate::error::RemoteError;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Request, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use trailsift_core::config::RemoteConfig;

/// Sends a prompt and returns the completion text.
pub trait CompletionTransport: Send + Sync {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, RemoteError>> + Send;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Non-streaming JSON completion over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client<HttpConnector, Full<Bytes>>,
    endpoint: Uri,
    model: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Only `http://` endpoints are accepted.
    pub fn new(endpoint: &str, model: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let invalid = |reason: String| RemoteError::Endpoint {
            endpoint: endpoint.to_string(),
            reason,
        };
        let uri: Uri = endpoint.parse().map_err(|e: hyper::http::uri::InvalidUri| invalid(e.to_string()))?;
        match uri.scheme_str() {
            Some("http") => {}
            Some(other) => return Err(invalid(format!("unsupported scheme `{other}`"))),
            None => return Err(invalid("missing scheme".to_string())),
        }

        Ok(Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            endpoint: uri,
            model: model.into(),
            timeout,
        })
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self, RemoteError> {
        Self::new(
            &config.endpoint,
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    async fn exchange(&self, body: Vec<u8>) -> Result<(hyper::StatusCode, Bytes), RemoteError> {
        let request = Request::post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .map_err(RemoteError::transport)?;
        let response = self.client.request(request).await.map_err(RemoteError::transport)?;
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(RemoteError::transport)?
            .to_bytes();
        Ok((status, bytes))
    }
}

/// Serialize an outgoing body. Failures are transport errors; `Malformed`
/// only describes what the service sent back.
fn encode<T: Serialize>(body: &T) -> Result<Vec<u8>, RemoteError> {
    serde_json::to_vec(body).map_err(RemoteError::transport)
}

impl CompletionTransport for HttpTransport {
    async fn complete(&self, prompt: &str) -> Result<String, RemoteError> {
        let body = encode(&GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
        })?;

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "requesting completion");
        let (status, bytes) = tokio::time::timeout(self.timeout, self.exchange(body))
            .await
            .map_err(|_| RemoteError::Timeout(self.timeout))??;

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        let reply: GenerateResponse = serde_json::from_slice(&bytes)?;
        tracing::debug!(chars = reply.response.len(), "completion received");
        Ok(reply.response)
    }
}
