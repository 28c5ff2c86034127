//! Domain primitives, eligibility rules, and fan-out services.
//!
//! Purpose: define strongly typed entities for users, listings, devices,
//! and notifications, the eligibility rules that connect them, and the
//! services that drive notification fan-out. Types are immutable and each
//! documents its invariants and serde contract in its own Rustdoc.

pub mod device;
pub mod device_registry;
pub mod eligibility;
pub mod error;
pub mod fanout;
#[cfg(test)]
mod fanout_tests;
pub mod listing;
pub mod notification;
pub mod notification_store;
pub mod ports;
pub mod preferences;
pub mod user;

pub use self::device::{
    Device, DeviceId, ParsePlatformError, Platform, PushProvider,
};
pub use self::device_registry::DeviceRegistry;
pub use self::eligibility::{EligibilityVerdict, evaluate};
pub use self::error::{Error, ErrorCode};
pub use self::fanout::FanoutEngine;
pub use self::listing::{
    ALL_INDIA, AgeBand, Job, Listing, ListingId, ListingKind, ListingValidationError, Scheme,
    Scope,
};
pub use self::notification::{
    Notification, NotificationId, NotificationKind, Page, PageRequest, ParseNotificationKindError,
};
pub use self::notification_store::NotificationStore;
pub use self::preferences::{
    NotificationSettings, UserPreference, alert_allowed, push_allowed,
};
pub use self::user::{
    DomainPreference, DomainPreferenceError, Education, ParseEducationError, Role, User, UserId,
    UserProfile, age_on, current_age,
};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
