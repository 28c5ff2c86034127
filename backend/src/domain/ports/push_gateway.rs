//! Port for mobile push delivery.
//!
//! Providers report per-token outcomes rather than a single pass/fail so
//! callers can both record that a delivery reached someone and prune tokens
//! the provider declared dead.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Errors raised by push gateway adapters.
    pub enum PushGatewayError {
        /// Gateway credentials are missing or malformed.
        Configuration { message: String } =>
            "push gateway misconfigured: {message}",
        /// The provider rejected the request as malformed.
        InvalidRequest { message: String } =>
            "push gateway rejected the request: {message}",
        /// The provider asked us to back off.
        RateLimited { message: String } =>
            "push gateway rate limited: {message}",
        /// The provider did not answer in time.
        Timeout { message: String } =>
            "push gateway timed out: {message}",
        /// The request could not reach the provider.
        Transport { message: String } =>
            "push gateway transport failed: {message}",
    }
}

/// A message fanned out to a set of endpoint tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    /// Opaque payload echoed back to the client application.
    pub data: Value,
}

/// Per-batch delivery outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PushDispatch {
    /// Tokens the request targeted.
    pub attempted: usize,
    /// Tokens the provider accepted.
    pub succeeded: usize,
    /// Tokens that failed for transient or unknown reasons.
    pub failed: usize,
    /// Tokens the provider reported as permanently dead.
    pub invalid_tokens: Vec<String>,
}

impl PushDispatch {
    /// Outcome of dispatching to an empty token set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the provider accepted the message for at least one token.
    pub fn delivered_any(&self) -> bool {
        self.succeeded > 0
    }
}

/// Port for dispatching one message to many device tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Deliver `message` to every token in `tokens`.
    ///
    /// An empty token slice succeeds without contacting the provider.
    async fn send(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<PushDispatch, PushGatewayError>;
}

/// Gateway used when push delivery is switched off.
///
/// Reports every token as failed so callers never mark a notification as
/// pushed, while still letting the rest of the fan-out proceed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPushGateway;

#[async_trait]
impl PushGateway for DisabledPushGateway {
    async fn send(
        &self,
        tokens: &[String],
        _message: &PushMessage,
    ) -> Result<PushDispatch, PushGatewayError> {
        Ok(PushDispatch {
            attempted: tokens.len(),
            succeeded: 0,
            failed: tokens.len(),
            invalid_tokens: Vec::new(),
        })
    }
}
