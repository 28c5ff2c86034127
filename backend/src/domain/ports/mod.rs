//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod device_registration;
mod device_repository;
mod listing_fanout;
mod notification_access;
mod notification_repository;
mod preferences_repository;
mod push_gateway;
mod realtime_channel;
mod user_directory;

#[cfg(test)]
pub use device_registration::MockDeviceRegistration;
pub use device_registration::{DeviceRegistration, DeviceRegistrationRequest};
#[cfg(test)]
pub use device_repository::MockDeviceRepository;
pub use device_repository::{DeviceRepository, DeviceRepositoryError, FixtureDeviceRepository};
#[cfg(test)]
pub use listing_fanout::MockListingFanout;
pub use listing_fanout::{FanoutReport, ListingFanout};
#[cfg(test)]
pub use notification_access::MockNotificationAccess;
pub use notification_access::NotificationAccess;
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{
    FixtureNotificationRepository, NotificationRepository, NotificationRepositoryError,
};
#[cfg(test)]
pub use preferences_repository::MockPreferencesRepository;
pub use preferences_repository::{
    FixturePreferencesRepository, PreferencesRepository, PreferencesRepositoryError,
};
#[cfg(test)]
pub use push_gateway::MockPushGateway;
pub use push_gateway::{
    DisabledPushGateway, PushDispatch, PushGateway, PushGatewayError, PushMessage,
};
#[cfg(test)]
pub use realtime_channel::MockRealtimeChannel;
pub use realtime_channel::{NoOpRealtimeChannel, RealtimeChannel};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
