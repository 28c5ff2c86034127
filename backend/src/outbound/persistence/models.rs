//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{devices, notifications, user_preferences, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub role: String,
    pub is_active: bool,
    pub full_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub age: Option<i32>,
    pub education: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub preferred_domains: Vec<String>,
    #[expect(dead_code, reason = "schema field not surfaced in the domain model")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field not surfaced in the domain model")]
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the user_preferences table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_preferences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserPreferenceRow {
    pub user_id: Uuid,
    pub job_alerts: bool,
    pub scheme_alerts: bool,
    pub reminders: bool,
    pub push_notifications: bool,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub updated_at: DateTime<Utc>,
}

/// Upsert struct for writing user preference records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = user_preferences)]
pub(crate) struct UserPreferenceUpsert {
    pub user_id: Uuid,
    pub job_alerts: bool,
    pub scheme_alerts: bool,
    pub reminders: bool,
    pub push_notifications: bool,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the devices table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = devices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeviceRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub endpoint_token: String,
    pub provider: String,
    pub platform: String,
    pub last_active_at: DateTime<Utc>,
}

/// Insertable struct for registering devices.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = devices)]
pub(crate) struct NewDeviceRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub endpoint_token: &'a str,
    pub provider: &'a str,
    pub platform: &'a str,
    pub last_active_at: DateTime<Utc>,
}

/// Row struct for reading from the notifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
    pub read: bool,
    pub push_sent: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for storing notifications.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub data: &'a serde_json::Value,
    pub read: bool,
    pub push_sent: bool,
    pub created_at: DateTime<Utc>,
}
