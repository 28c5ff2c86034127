//! Per-connection WebSocket session loop.
//!
//! Each connection forwards frames from its channel subscription to the
//! client and answers protocol pings. Clients do not send application
//! messages over this channel; inbound text frames only refresh the
//! heartbeat deadline.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Message, MessageStream, Session};
use futures_util::StreamExt;
use tokio::time::interval;
use tracing::{debug, warn};

use crate::domain::UserId;
use crate::outbound::realtime::{ChannelSubscription, WsChannelRegistry};

#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

/// Why the session loop ended.
#[derive(Debug)]
enum Shutdown {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    ChannelClosed,
}

impl Shutdown {
    /// Close frame to send back, if the socket is still writable.
    fn close_reason(&self) -> Option<CloseReason> {
        match self {
            Self::ClientClosed(_) | Self::StreamClosed => None,
            Self::HeartbeatTimeout => Some(CloseReason {
                code: CloseCode::Policy,
                description: Some("heartbeat timeout".into()),
            }),
            Self::ChannelClosed => Some(CloseReason {
                code: CloseCode::Away,
                description: None,
            }),
        }
    }
}

/// Drive a single connection until the client disconnects or times out.
pub(super) async fn run(
    registry: std::sync::Arc<WsChannelRegistry>,
    user_id: UserId,
    subscription: ChannelSubscription,
    session: Session,
    msg_stream: MessageStream,
) {
    let subscription_id = subscription.id;
    let shutdown = session_loop(subscription, session, msg_stream).await;
    registry.unsubscribe(&user_id, subscription_id).await;
    log_shutdown(&user_id, &shutdown);
}

fn log_shutdown(user_id: &UserId, shutdown: &Shutdown) {
    match shutdown {
        Shutdown::ClientClosed(reason) => {
            debug!(user_id = %user_id, ?reason, "client closed WebSocket");
        }
        Shutdown::StreamClosed => {
            debug!(user_id = %user_id, "WebSocket stream ended");
        }
        Shutdown::HeartbeatTimeout => {
            warn!(user_id = %user_id, "WebSocket heartbeat timed out");
        }
        Shutdown::ChannelClosed => {
            debug!(user_id = %user_id, "notification channel closed");
        }
    }
}

async fn session_loop(
    mut subscription: ChannelSubscription,
    mut session: Session,
    mut msg_stream: MessageStream,
) -> Shutdown {
    let mut heartbeat = interval(HEARTBEAT_INTERVAL);
    let mut last_seen = Instant::now();

    let shutdown = loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                if Instant::now().duration_since(last_seen) > CLIENT_TIMEOUT {
                    break Shutdown::HeartbeatTimeout;
                }
                if session.ping(b"").await.is_err() {
                    break Shutdown::StreamClosed;
                }
            }
            frame = subscription.receiver.recv() => {
                match frame {
                    Some(text) => {
                        if session.text(text).await.is_err() {
                            break Shutdown::StreamClosed;
                        }
                    }
                    None => break Shutdown::ChannelClosed,
                }
            }
            message = msg_stream.next() => {
                match message {
                    Some(Ok(Message::Ping(bytes))) => {
                        last_seen = Instant::now();
                        if session.pong(&bytes).await.is_err() {
                            break Shutdown::StreamClosed;
                        }
                    }
                    Some(Ok(Message::Pong(_) | Message::Text(_) | Message::Binary(_))) => {
                        last_seen = Instant::now();
                    }
                    Some(Ok(Message::Close(reason))) => {
                        break Shutdown::ClientClosed(reason);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        debug!(error = %error, "WebSocket protocol error");
                        break Shutdown::StreamClosed;
                    }
                    None => break Shutdown::StreamClosed,
                }
            }
        }
    };

    if let Some(reason) = shutdown.close_reason() {
        let _ = session.close(Some(reason)).await;
    }
    shutdown
}
