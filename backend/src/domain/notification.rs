//! Persisted in-app notifications and their wire shapes.
//!
//! Notifications are immutable after creation except for the `read` flag
//! (flipped by explicit user action) and the best-effort `push_sent`
//! marker. Deletion/retention is an external concern.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::user::UserId;

/// Stable notification identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`NotificationId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Category of a persisted notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    JobAlert,
    SchemeAlert,
    JobReminder,
    SchemeReminder,
    AdminAnnouncement,
}

impl NotificationKind {
    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JobAlert => "JOB_ALERT",
            Self::SchemeAlert => "SCHEME_ALERT",
            Self::JobReminder => "JOB_REMINDER",
            Self::SchemeReminder => "SCHEME_REMINDER",
            Self::AdminAnnouncement => "ADMIN_ANNOUNCEMENT",
        }
    }
}

/// Error returned when parsing an unknown notification kind string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNotificationKindError {
    /// The unrecognised input value.
    pub input: String,
}

impl fmt::Display for ParseNotificationKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown notification kind: {}", self.input)
    }
}

impl std::error::Error for ParseNotificationKindError {}

impl std::str::FromStr for NotificationKind {
    type Err = ParseNotificationKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JOB_ALERT" => Ok(Self::JobAlert),
            "SCHEME_ALERT" => Ok(Self::SchemeAlert),
            "JOB_REMINDER" => Ok(Self::JobReminder),
            "SCHEME_REMINDER" => Ok(Self::SchemeReminder),
            "ADMIN_ANNOUNCEMENT" => Ok(Self::AdminAnnouncement),
            _ => Err(ParseNotificationKindError {
                input: s.to_owned(),
            }),
        }
    }
}

/// A persisted per-user notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    /// Opaque payload; carries the originating listing id for alerts.
    pub data: Value,
    pub read: bool,
    pub push_sent: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Public shape emitted over the realtime channel.
    pub fn wire_payload(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "type": self.kind,
            "title": self.title,
            "body": self.body,
            "data": self.data,
            "createdAt": self.created_at,
        })
    }
}

/// Page selector for notification listings.
///
/// Limits clamp to `1..=100` and pages to at least 1 so hostile query
/// strings cannot request unbounded result sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Maximum page size served by the listing endpoint.
    pub const MAX_LIMIT: u32 = 100;

    /// Build a selector, clamping out-of-range values.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Page size after clamping.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Row offset for SQL `OFFSET`.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 20)
    }
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Assemble a page from query results and the matching total count.
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        let offset = u64::from(request.page() - 1) * u64::from(request.limit());
        let has_next = offset + (items.len() as u64) < total;
        Self {
            items,
            page: request.page(),
            limit: request.limit(),
            total,
            has_next,
            has_prev: offset > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zeroes(0, 0, 1, 1)]
    #[case::oversized_limit(2, 500, 2, 100)]
    #[case::in_range(3, 20, 3, 20)]
    fn page_request_clamps_inputs(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::new(page, limit);
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[rstest]
    fn page_metadata_tracks_bounds() {
        let request = PageRequest::new(2, 10);
        let page = Page::new(vec![1, 2, 3], request, 23);
        assert!(page.has_prev);
        assert!(!page.has_next);

        let first = Page::new(vec![1; 10], PageRequest::new(1, 10), 23);
        assert!(!first.has_prev);
        assert!(first.has_next);
    }

    #[rstest]
    fn kind_as_str_matches_parse() {
        for kind in [
            NotificationKind::JobAlert,
            NotificationKind::SchemeAlert,
            NotificationKind::JobReminder,
            NotificationKind::SchemeReminder,
            NotificationKind::AdminAnnouncement,
        ] {
            let parsed: NotificationKind = kind.as_str().parse().expect("round-trip");
            assert_eq!(parsed, kind);
        }
    }

    #[rstest]
    fn wire_payload_matches_the_published_contract() {
        let notification = Notification {
            id: NotificationId::random(),
            user_id: UserId::random(),
            kind: NotificationKind::JobAlert,
            title: "New job match".to_owned(),
            body: "Police Constable Recruitment".to_owned(),
            data: serde_json::json!({ "listingId": "abc" }),
            read: false,
            push_sent: false,
            created_at: Utc::now(),
        };

        let payload = notification.wire_payload();
        let object = payload.as_object().expect("object payload");
        for key in ["id", "type", "title", "body", "data", "createdAt"] {
            assert!(object.contains_key(key), "payload must carry {key}");
        }
        assert_eq!(object.len(), 6);
        assert_eq!(payload["type"], "JOB_ALERT");
    }
}
