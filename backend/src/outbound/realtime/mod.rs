//! In-process realtime channel registry.
//!
//! Implements the realtime port over per-connection unbounded channels. The
//! WebSocket inbound adapter subscribes a connection, forwards whatever the
//! registry sends it, and unsubscribes on disconnect. Senders whose
//! receiving connection has gone away are dropped lazily on the next emit.

mod registry;

pub use registry::{ChannelSubscription, WsChannelRegistry};
