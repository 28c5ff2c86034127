//! Reqwest-backed OneSignal push gateway.
//!
//! Interchangeable with the FCM adapter behind the same port. OneSignal
//! reports dead player ids in the `errors.invalid_player_ids` field of an
//! otherwise successful response.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::{PushDispatch, PushGateway, PushGatewayError, PushMessage};

const DEFAULT_ENDPOINT: &str = "https://onesignal.com/api/v1/notifications";

/// OneSignal gateway adapter performing HTTP POST requests.
pub struct OneSignalPushGateway {
    client: Client,
    endpoint: Url,
    app_id: String,
    api_key: String,
}

impl OneSignalPushGateway {
    /// Build an adapter against the production OneSignal endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`PushGatewayError::Configuration`] when credentials are
    /// blank or the HTTP client cannot be constructed.
    pub fn new(
        app_id: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PushGatewayError> {
        let endpoint = Url::parse(DEFAULT_ENDPOINT)
            .map_err(|err| PushGatewayError::configuration(err.to_string()))?;
        Self::with_endpoint(endpoint, app_id, api_key, timeout)
    }

    /// Build an adapter against an explicit endpoint, for tests and proxies.
    ///
    /// # Errors
    ///
    /// Returns [`PushGatewayError::Configuration`] when credentials are
    /// blank or the HTTP client cannot be constructed.
    pub fn with_endpoint(
        endpoint: Url,
        app_id: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PushGatewayError> {
        let app_id = app_id.into();
        let api_key = api_key.into();
        if app_id.trim().is_empty() || api_key.trim().is_empty() {
            return Err(PushGatewayError::configuration(
                "OneSignal app id and API key must both be set",
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PushGatewayError::configuration(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            app_id,
            api_key,
        })
    }
}

#[derive(Debug, Serialize)]
struct OneSignalRequest<'a> {
    app_id: &'a str,
    include_player_ids: &'a [String],
    headings: serde_json::Value,
    contents: serde_json::Value,
    data: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct OneSignalResponse {
    #[serde(default)]
    recipients: usize,
    #[serde(default)]
    errors: Option<OneSignalErrors>,
}

#[derive(Debug, Deserialize)]
struct OneSignalErrors {
    #[serde(default)]
    invalid_player_ids: Vec<String>,
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
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PushGatewayError::configuration(format!("{message}: API key rejected"))
        }
        _ if status.is_client_error() => PushGatewayError::invalid_request(message),
        _ => PushGatewayError::transport(message),
    }
}

fn dispatch_from_response(tokens: &[String], response: OneSignalResponse) -> PushDispatch {
    let invalid_tokens = response
        .errors
        .map(|errors| errors.invalid_player_ids)
        .unwrap_or_default();
    let succeeded = response.recipients;

    PushDispatch {
        attempted: tokens.len(),
        succeeded,
        failed: tokens.len().saturating_sub(succeeded),
        invalid_tokens,
    }
}

#[async_trait]
impl PushGateway for OneSignalPushGateway {
    async fn send(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<PushDispatch, PushGatewayError> {
        if tokens.is_empty() {
            return Ok(PushDispatch::empty());
        }

        let request = OneSignalRequest {
            app_id: &self.app_id,
            include_player_ids: tokens,
            headings: json!({ "en": message.title }),
            contents: json!({ "en": message.body }),
            data: &message.data,
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", self.api_key),
            )
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }

        let decoded: OneSignalResponse = response.json().await.map_err(|err| {
            PushGatewayError::transport(format!("invalid OneSignal response payload: {err}"))
        })?;
        Ok(dispatch_from_response(tokens, decoded))
    }
}
