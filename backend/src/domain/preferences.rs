//! User notification preferences and the preference gate.
//!
//! A preference record is one-to-one with a user and created lazily; the
//! gate therefore treats an absent record as all-defaults, which keeps a
//! missing document from silently suppressing alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::listing::ListingKind;
use super::user::UserId;

fn default_true() -> bool {
    true
}

/// Per-channel and per-category notification toggles.
///
/// Job/scheme/reminder alerts and push delivery default on; email and SMS
/// default off because those channels cost money per message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub job_alerts: bool,
    #[serde(default = "default_true")]
    pub scheme_alerts: bool,
    #[serde(default = "default_true")]
    pub reminders: bool,
    #[serde(default = "default_true")]
    pub push_notifications: bool,
    #[serde(default)]
    pub email_notifications: bool,
    #[serde(default)]
    pub sms_notifications: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            job_alerts: true,
            scheme_alerts: true,
            reminders: true,
            push_notifications: true,
            email_notifications: false,
            sms_notifications: false,
        }
    }
}

impl NotificationSettings {
    /// True when alerts for the given listing kind are enabled.
    pub fn allows_alert(&self, kind: ListingKind) -> bool {
        match kind {
            ListingKind::Job => self.job_alerts,
            ListingKind::Scheme => self.scheme_alerts,
        }
    }
}

/// Preference record for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    pub user_id: UserId,
    #[serde(default)]
    pub notification_settings: NotificationSettings,
    pub updated_at: DateTime<Utc>,
}

impl UserPreference {
    /// Lazily-created default record for a user.
    pub fn new_default(user_id: UserId) -> Self {
        Self {
            user_id,
            notification_settings: NotificationSettings::default(),
            updated_at: Utc::now(),
        }
    }
}

/// Preference gate for alert categories; missing records are permissive.
pub fn alert_allowed(preference: Option<&UserPreference>, kind: ListingKind) -> bool {
    preference.is_none_or(|p| p.notification_settings.allows_alert(kind))
}

/// Preference gate for push delivery; missing records are permissive.
pub fn push_allowed(preference: Option<&UserPreference>) -> bool {
    preference.is_none_or(|p| p.notification_settings.push_notifications)
}
