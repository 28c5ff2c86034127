//! Push provider adapters.
//!
//! Two interchangeable gateways implement the push port: FCM and OneSignal.
//! Deployment configuration selects one; `DisabledPushGateway` from the
//! domain ports covers installs that run without push credentials.

mod fcm;
mod onesignal;

pub use fcm::FcmPushGateway;
pub use onesignal::OneSignalPushGateway;
