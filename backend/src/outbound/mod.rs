//! Outbound adapters: persistence, push providers, and the realtime
//! connection registry.

pub mod persistence;
pub mod push;
pub mod realtime;
