//! # Clinic Gateway
//!
//! reqwest implementation of [`clinic_core::Transport`].
//!
//! Requests are sent to the configured origin with the path appended verbatim. No timeout,
//! retry or caching is configured on the client.

use async_trait::async_trait;
use clinic_core::gateway::response_message;
use clinic_core::{ApiRequest, ClinicError, ClinicResult, CoreConfig, Method, Transport};
use reqwest::Client;
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// `base_url` is used as given; build it through [`CoreConfig`] to have it validated.
    pub fn new(base_url: impl Into<String>) -> ClinicResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClinicError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &CoreConfig) -> ClinicResult<Self> {
        Self::new(config.api_base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn transport_error(e: reqwest::Error) -> ClinicError {
    ClinicError::Transport(e.to_string())
}

/// An empty body decodes to `Null` so message-only routes stay representable.
fn decode_body(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ClinicResult<Value> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;
        let body = decode_body(&bytes);

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), %url, "gateway returned an error status");
            return Err(ClinicError::Http {
                status: status.as_u16(),
                message: body.ok().as_ref().and_then(response_message),
            });
        }

        Ok(body?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_body_is_null() {
        assert_eq!(decode_body(b"").unwrap(), Value::Null);
        assert_eq!(decode_body(b" \n").unwrap(), Value::Null);
        assert_eq!(decode_body(br#"{"ok":true}"#).unwrap()["ok"], true);
        assert!(decode_body(b"<html>").is_err());
    }
}
