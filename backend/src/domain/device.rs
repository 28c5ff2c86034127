//! Registered push endpoints.
//!
//! A device row binds one opaque endpoint token to its owning user. Tokens
//! are globally unique: re-registering a token moves it to the calling
//! user instead of duplicating the row. The `provider` tag records which
//! vendor issued the token so both shapes can coexist during a cutover.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Stable device identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(Uuid);

impl DeviceId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`DeviceId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Mobile platform of a registered device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown platform string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePlatformError {
    /// The unrecognised input value.
    pub input: String,
}

impl fmt::Display for ParsePlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "platform must be android or ios, got: {}", self.input)
    }
}

impl std::error::Error for ParsePlatformError {}

impl std::str::FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            _ => Err(ParsePlatformError {
                input: s.to_owned(),
            }),
        }
    }
}

/// Vendor that issued an endpoint token.
///
/// The registry contract is identical for both shapes; the tag only exists
/// so a vendor cutover does not invalidate existing registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushProvider {
    Fcm,
    OneSignal,
}

impl PushProvider {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fcm => "fcm",
            Self::OneSignal => "onesignal",
        }
    }
}

/// A registered push endpoint.
///
/// ## Invariants
/// - `endpoint_token` is globally unique across all users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub user_id: UserId,
    pub endpoint_token: String,
    pub provider: PushProvider,
    pub platform: Platform,
    pub last_active_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::android("android", Platform::Android)]
    #[case::ios("ios", Platform::Ios)]
    fn platform_parses_enumerated_values(#[case] input: &str, #[case] expected: Platform) {
        let parsed: Platform = input.parse().expect("valid platform");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case::web("web")]
    #[case::capitalised("Android")]
    #[case::empty("")]
    fn platform_rejects_unknown_values(#[case] input: &str) {
        let result: Result<Platform, _> = input.parse();
        assert!(result.is_err());
    }

    #[rstest]
    fn platform_as_str_matches_parse() {
        for platform in [Platform::Android, Platform::Ios] {
            let parsed: Platform = platform.as_str().parse().expect("round-trip");
            assert_eq!(parsed, platform);
        }
    }
}
