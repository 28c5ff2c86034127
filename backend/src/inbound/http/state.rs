//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DeviceRegistration, ListingFanout, NotificationAccess, RealtimeChannel,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub notifications: Arc<dyn NotificationAccess>,
    pub devices: Arc<dyn DeviceRegistration>,
    pub fanout: Arc<dyn ListingFanout>,
    pub realtime: Arc<dyn RealtimeChannel>,
}

impl HttpState {
    /// Bundle the driving ports HTTP handlers depend on.
    pub fn new(
        notifications: Arc<dyn NotificationAccess>,
        devices: Arc<dyn DeviceRegistration>,
        fanout: Arc<dyn ListingFanout>,
        realtime: Arc<dyn RealtimeChannel>,
    ) -> Self {
        Self {
            notifications,
            devices,
            fanout,
            realtime,
        }
    }
}
