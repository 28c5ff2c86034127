//! Port for realtime event emission.
//!
//! Emission is fire-and-forget: a user with no live connections is not an
//! error, and adapters never block fan-out on slow consumers.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::UserId;

/// Port for pushing events to connected clients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RealtimeChannel: Send + Sync {
    /// Emit a named event to every live connection for `user_id`.
    async fn emit_to_user(&self, user_id: &UserId, event: &str, payload: Value);

    /// Emit a named event to every connected administrator.
    async fn emit_to_admins(&self, event: &str, payload: Value);
}

/// Channel that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpRealtimeChannel;

#[async_trait]
impl RealtimeChannel for NoOpRealtimeChannel {
    async fn emit_to_user(&self, _user_id: &UserId, _event: &str, _payload: Value) {}

    async fn emit_to_admins(&self, _event: &str, _payload: Value) {}
}
