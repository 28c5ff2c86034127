//! Listing fan-out engine.
//!
//! Implements the [`ListingFanout`] driving port: given a freshly published
//! job or scheme, notify every eligible, opted-in active user. Snapshot
//! queries (candidates, preferences, devices) run once up front; everything
//! after that is per-user and a failure for one user never blocks the rest.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::domain::device_registry::DeviceRegistry;
use crate::domain::ports::{
    DeviceRepository, FanoutReport, ListingFanout, NotificationRepository, PreferencesRepository,
    PreferencesRepositoryError, PushGateway, PushMessage, RealtimeChannel, UserDirectory,
    UserDirectoryError,
};
use crate::domain::{
    Error, Listing, ListingKind, Notification, NotificationId, NotificationKind, User, UserId,
    UserPreference, alert_allowed, eligibility, push_allowed,
};

/// Event name emitted to a user's live connections when a notification
/// lands in their inbox.
pub const NOTIFICATION_EVENT: &str = "notification:new";

/// Fan-out engine implementing [`ListingFanout`].
pub struct FanoutEngine<U, P, D, N> {
    users: Arc<U>,
    preferences: Arc<P>,
    devices: DeviceRegistry<D>,
    notifications: Arc<N>,
    realtime: Arc<dyn RealtimeChannel>,
    push: Arc<dyn PushGateway>,
}

impl<U, P, D, N> FanoutEngine<U, P, D, N> {
    /// Assemble the engine from its collaborating ports.
    pub fn new(
        users: Arc<U>,
        preferences: Arc<P>,
        devices: Arc<D>,
        notifications: Arc<N>,
        realtime: Arc<dyn RealtimeChannel>,
        push: Arc<dyn PushGateway>,
    ) -> Self {
        Self {
            users,
            preferences,
            devices: DeviceRegistry::new(devices),
            notifications,
            realtime,
            push,
        }
    }
}

impl<U, P, D, N> FanoutEngine<U, P, D, N>
where
    U: UserDirectory,
    P: PreferencesRepository,
    D: DeviceRepository,
    N: NotificationRepository,
{
    fn map_directory_error(error: UserDirectoryError) -> Error {
        match error {
            UserDirectoryError::Connection { message } => {
                Error::service_unavailable(format!("user directory unavailable: {message}"))
            }
            UserDirectoryError::Query { message } => {
                Error::internal(format!("user directory error: {message}"))
            }
        }
    }

    fn map_preferences_error(error: PreferencesRepositoryError) -> Error {
        match error {
            PreferencesRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("preferences repository unavailable: {message}"))
            }
            PreferencesRepositoryError::Query { message } => {
                Error::internal(format!("preferences repository error: {message}"))
            }
        }
    }

    fn build_notification(user: &User, listing: &Listing, reasons: &[String]) -> Notification {
        let (kind, title, data) = match listing.kind() {
            ListingKind::Job => (
                NotificationKind::JobAlert,
                "New job match",
                json!({ "jobId": listing.id(), "reasons": reasons }),
            ),
            ListingKind::Scheme => (
                NotificationKind::SchemeAlert,
                "New scheme match",
                json!({ "schemeId": listing.id(), "reasons": reasons }),
            ),
        };
        Notification {
            id: NotificationId::random(),
            user_id: user.id,
            kind,
            title: title.to_owned(),
            body: listing.headline().to_owned(),
            data,
            read: false,
            push_sent: false,
            created_at: Utc::now(),
        }
    }

    fn profile_complete(user: &User, kind: ListingKind) -> bool {
        match kind {
            ListingKind::Job => user.profile.complete_for_jobs(),
            ListingKind::Scheme => user.profile.complete_for_schemes(),
        }
    }

    /// Deliver the stored notification over push, marking it sent and
    /// pruning dead tokens as the provider reports them.
    async fn dispatch_push(&self, notification: &Notification, tokens: &[String]) {
        if tokens.is_empty() {
            return;
        }
        let message = PushMessage {
            title: notification.title.clone(),
            body: notification.body.clone(),
            data: notification.wire_payload(),
        };
        let dispatch = match self.push.send(tokens, &message).await {
            Ok(dispatch) => dispatch,
            Err(error) => {
                tracing::warn!(
                    user_id = %notification.user_id,
                    error = %error,
                    "push dispatch failed"
                );
                return;
            }
        };
        if dispatch.delivered_any() {
            if let Err(error) = self.notifications.mark_push_sent(&notification.id).await {
                tracing::warn!(
                    notification_id = %notification.id,
                    error = %error,
                    "failed to record push delivery"
                );
            }
        }
        if !dispatch.invalid_tokens.is_empty() {
            if let Err(error) = self.devices.prune_invalid(&dispatch.invalid_tokens).await {
                tracing::warn!(error = %error, "failed to prune invalid push tokens");
            }
        }
    }

    async fn notify_user(
        &self,
        user: &User,
        listing: &Listing,
        preference: Option<&UserPreference>,
        tokens: &[String],
    ) -> Result<bool, Error> {
        if !Self::profile_complete(user, listing.kind()) {
            return Ok(false);
        }
        if !alert_allowed(preference, listing.kind()) {
            return Ok(false);
        }
        let verdict = eligibility::evaluate(&user.profile, listing);
        if !verdict.eligible {
            return Ok(false);
        }

        let notification = Self::build_notification(user, listing, &verdict.reasons);
        let stored = self
            .notifications
            .insert(&notification)
            .await
            .map_err(|error| Error::internal(format!("failed to store notification: {error}")))?;

        self.realtime
            .emit_to_user(&user.id, NOTIFICATION_EVENT, stored.wire_payload())
            .await;

        if push_allowed(preference) {
            self.dispatch_push(&stored, tokens).await;
        }
        Ok(true)
    }
}

#[async_trait]
impl<U, P, D, N> ListingFanout for FanoutEngine<U, P, D, N>
where
    U: UserDirectory,
    P: PreferencesRepository,
    D: DeviceRepository,
    N: NotificationRepository,
{
    async fn notify_eligible_users(&self, listing: &Listing) -> Result<FanoutReport, Error> {
        let users = self
            .users
            .active_users()
            .await
            .map_err(Self::map_directory_error)?;
        let user_ids: Vec<UserId> = users.iter().map(|user| user.id).collect();

        let preferences: HashMap<UserId, UserPreference> = self
            .preferences
            .find_by_user_ids(&user_ids)
            .await
            .map_err(Self::map_preferences_error)?
            .into_iter()
            .map(|preference| (preference.user_id, preference))
            .collect();

        // A device lookup failure degrades to in-app-only delivery.
        let mut tokens_by_user: HashMap<UserId, Vec<String>> = HashMap::new();
        match self.devices.tokens_for_users(&user_ids).await {
            Ok(devices) => {
                for device in devices {
                    tokens_by_user
                        .entry(device.user_id)
                        .or_default()
                        .push(device.endpoint_token);
                }
            }
            Err(error) => {
                tracing::warn!(error = %error, "device lookup failed; skipping push delivery");
            }
        }

        let mut report = FanoutReport {
            candidates: users.len(),
            created: 0,
        };
        for user in &users {
            let tokens = tokens_by_user
                .get(&user.id)
                .map_or(&[] as &[String], Vec::as_slice);
            match self
                .notify_user(user, listing, preferences.get(&user.id), tokens)
                .await
            {
                Ok(true) => report.created += 1,
                Ok(false) => {}
                Err(error) => {
                    tracing::warn!(
                        user_id = %user.id,
                        listing_id = %listing.id(),
                        error = %error,
                        "fan-out failed for user; continuing"
                    );
                }
            }
        }

        tracing::info!(
            listing_id = %listing.id(),
            candidates = report.candidates,
            created = report.created,
            "listing fan-out complete"
        );
        Ok(report)
    }
}
