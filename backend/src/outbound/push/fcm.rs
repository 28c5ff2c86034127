//! Reqwest-backed FCM push gateway.
//!
//! This adapter owns transport details only: request serialisation, timeout
//! and HTTP error mapping, and decoding the per-token result array. Tokens
//! the provider reports with a permanent registration error surface in
//! [`PushDispatch::invalid_tokens`] so the caller can prune them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{PushDispatch, PushGateway, PushGatewayError, PushMessage};

const DEFAULT_ENDPOINT: &str = "https://fcm.googleapis.com/fcm/send";

/// Registration error codes that mean the token will never work again.
const INVALID_TOKEN_ERRORS: &[&str] = &["NotRegistered", "InvalidRegistration", "invalid-argument"];

/// FCM gateway adapter performing HTTP POST requests against one endpoint.
pub struct FcmPushGateway {
    client: Client,
    endpoint: Url,
    server_key: String,
}

impl FcmPushGateway {
    /// Build an adapter against the production FCM endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`PushGatewayError::Configuration`] when the server key is
    /// blank or the HTTP client cannot be constructed.
    pub fn new(server_key: impl Into<String>, timeout: Duration) -> Result<Self, PushGatewayError> {
        let endpoint = Url::parse(DEFAULT_ENDPOINT)
            .map_err(|err| PushGatewayError::configuration(err.to_string()))?;
        Self::with_endpoint(endpoint, server_key, timeout)
    }

    /// Build an adapter against an explicit endpoint, for tests and proxies.
    ///
    /// # Errors
    ///
    /// Returns [`PushGatewayError::Configuration`] when the server key is
    /// blank or the HTTP client cannot be constructed.
    pub fn with_endpoint(
        endpoint: Url,
        server_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PushGatewayError> {
        let server_key = server_key.into();
        if server_key.trim().is_empty() {
            return Err(PushGatewayError::configuration("FCM server key is empty"));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PushGatewayError::configuration(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            server_key,
        })
    }
}

#[derive(Debug, Serialize)]
struct FcmRequest<'a> {
    registration_ids: &'a [String],
    notification: FcmNotification<'a>,
    data: &'a serde_json::Value,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    #[serde(default)]
    success: usize,
    #[serde(default)]
    failure: usize,
    #[serde(default)]
    results: Vec<FcmResult>,
}

#[derive(Debug, Deserialize)]
struct FcmResult {
    #[serde(default)]
    error: Option<String>,
}

fn map_transport_error(error: reqwest::Error) -> PushGatewayError {
    if error.is_timeout() {
        PushGatewayError::timeout(error.to_string())
    } else {
        PushGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode) -> PushGatewayError {
    let message = format!("status {}", status.as_u16());
    match status {
        StatusCode::TOO_MANY_REQUESTS => PushGatewayError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PushGatewayError::timeout(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PushGatewayError::configuration(
            format!("{message}: server key rejected"),
        ),
        _ if status.is_client_error() => PushGatewayError::invalid_request(message),
        _ => PushGatewayError::transport(message),
    }
}

fn dispatch_from_response(tokens: &[String], response: FcmResponse) -> PushDispatch {
    let invalid_tokens = response
        .results
        .iter()
        .zip(tokens)
        .filter_map(|(result, token)| {
            let error = result.error.as_deref()?;
            INVALID_TOKEN_ERRORS
                .contains(&error)
                .then(|| token.clone())
        })
        .collect();

    PushDispatch {
        attempted: tokens.len(),
        succeeded: response.success,
        failed: response.failure,
        invalid_tokens,
    }
}

#[async_trait]
impl PushGateway for FcmPushGateway {
    async fn send(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<PushDispatch, PushGatewayError> {
        if tokens.is_empty() {
            return Ok(PushDispatch::empty());
        }

        let request = FcmRequest {
            registration_ids: tokens,
            notification: FcmNotification {
                title: &message.title,
                body: &message.body,
            },
            data: &message.data,
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(
                reqwest::header::AUTHORIZATION,
                format!("key={}", self.server_key),
            )
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }

        let decoded: FcmResponse = response.json().await.map_err(|err| {
            PushGatewayError::transport(format!("invalid FCM response payload: {err}"))
        })?;
        Ok(dispatch_from_response(tokens, decoded))
    }
}
