//! Connection registry backing the realtime port.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::domain::UserId;
use crate::domain::ports::RealtimeChannel;

struct Subscriber {
    id: u64,
    sender: UnboundedSender<String>,
}

#[derive(Default)]
struct RegistryState {
    users: HashMap<UserId, Vec<Subscriber>>,
    admins: Vec<Subscriber>,
}

/// One live connection's view of the registry.
///
/// Dropping the subscription closes the receiver; the registry notices on
/// the next emit and discards the sender. Callers should still call
/// [`WsChannelRegistry::unsubscribe`] on disconnect to free the slot
/// promptly.
pub struct ChannelSubscription {
    /// Registry-assigned connection identifier, needed to unsubscribe.
    pub id: u64,
    /// Serialised events destined for this connection.
    pub receiver: UnboundedReceiver<String>,
}

/// Registry of live WebSocket connections implementing the realtime port.
///
/// A user may hold several connections at once (phone and browser); events
/// emitted to the user reach all of them. Admin connections additionally
/// join a shared admin audience for operational events.
#[derive(Default)]
pub struct WsChannelRegistry {
    state: RwLock<RegistryState>,
    next_id: AtomicU64,
}

impl WsChannelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a connection for `user_id`, optionally joining the admin
    /// audience as well.
    pub async fn subscribe(&self, user_id: UserId, admin: bool) -> ChannelSubscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();

        let mut state = self.state.write().await;
        state.users.entry(user_id).or_default().push(Subscriber {
            id,
            sender: sender.clone(),
        });
        if admin {
            state.admins.push(Subscriber { id, sender });
        }
        drop(state);

        ChannelSubscription { id, receiver }
    }

    /// Detach a connection previously returned by [`Self::subscribe`].
    pub async fn unsubscribe(&self, user_id: &UserId, subscription_id: u64) {
        let mut state = self.state.write().await;
        if let Some(subscribers) = state.users.get_mut(user_id) {
            subscribers.retain(|subscriber| subscriber.id != subscription_id);
            if subscribers.is_empty() {
                state.users.remove(user_id);
            }
        }
        state
            .admins
            .retain(|subscriber| subscriber.id != subscription_id);
    }

    /// Number of live connections for a user, for tests and diagnostics.
    pub async fn connection_count(&self, user_id: &UserId) -> usize {
        self.state
            .read()
            .await
            .users
            .get(user_id)
            .map_or(0, Vec::len)
    }

    fn envelope(event: &str, payload: Value) -> String {
        json!({ "event": event, "payload": payload }).to_string()
    }

    fn deliver(subscribers: &mut Vec<Subscriber>, frame: &str) {
        subscribers.retain(|subscriber| subscriber.sender.send(frame.to_owned()).is_ok());
    }
}

#[async_trait]
impl RealtimeChannel for WsChannelRegistry {
    async fn emit_to_user(&self, user_id: &UserId, event: &str, payload: Value) {
        let frame = Self::envelope(event, payload);
        let mut state = self.state.write().await;
        if let Some(subscribers) = state.users.get_mut(user_id) {
            Self::deliver(subscribers, &frame);
            if subscribers.is_empty() {
                state.users.remove(user_id);
            }
        }
    }

    async fn emit_to_admins(&self, event: &str, payload: Value) {
        let frame = Self::envelope(event, payload);
        let mut state = self.state.write().await;
        Self::deliver(&mut state.admins, &frame);
    }
}
