//! Eligibility-driven notification fan-out backend.
//!
//! The crate is organised hexagonally:
//! - [`domain`] holds entities, the eligibility evaluator, the fan-out
//!   engine, and the port traits the engine is written against;
//! - [`inbound`] adapts HTTP and WebSocket traffic onto driving ports;
//! - [`outbound`] adapts driven ports onto PostgreSQL, push providers, and
//!   the in-process realtime channel registry;
//! - [`server`] wires everything together for the actix-web runtime.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::Trace;
