//! Behavioural coverage for the listing fan-out engine.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::fanout::{FanoutEngine, NOTIFICATION_EVENT};
use crate::domain::ports::{
    DeviceRepositoryError, MockDeviceRepository, MockNotificationRepository, MockPushGateway,
    MockRealtimeChannel, MockUserDirectory, NotificationRepositoryError, PushDispatch,
    PushGatewayError,
};
use crate::domain::ports::{ListingFanout, MockPreferencesRepository};
use crate::domain::{
    AgeBand, Device, DeviceId, Education, Job, Listing, ListingId, NotificationSettings, Platform,
    PushProvider, Role, Scheme, Scope, User, UserId, UserPreference, UserProfile,
};

fn police_job() -> Listing {
    Listing::Job(Job {
        id: ListingId::random(),
        title: "Police Constable".into(),
        scope: Scope::State,
        domain: "Police".into(),
        state: "Bihar".into(),
        education: Education::Twelfth,
        age_band: AgeBand::new(18, 28).expect("valid band"),
        last_date: Utc::now() + Duration::days(30),
        is_active: true,
        is_featured: false,
    })
}

fn pension_scheme() -> Listing {
    Listing::Scheme(Scheme {
        id: ListingId::random(),
        name: "Old Age Pension".into(),
        scope: Scope::Central,
        target_audience: "Senior citizens".into(),
        benefit: "Monthly pension".into(),
        state: "All India".into(),
        age_band: None,
        is_active: true,
        is_featured: false,
    })
}

fn eligible_user() -> User {
    User {
        id: UserId::random(),
        role: Role::User,
        is_active: true,
        profile: UserProfile {
            full_name: Some("Ravi Kumar".into()),
            date_of_birth: None,
            age: Some(22),
            education: Some(Education::Graduate),
            state: Some("Bihar".into()),
            district: None,
            preferred_domains: crate::domain::DomainPreference::All,
        },
    }
}

fn preference_with(settings: NotificationSettings, user_id: UserId) -> UserPreference {
    UserPreference {
        user_id,
        notification_settings: settings,
        updated_at: Utc::now(),
    }
}

fn device_for(user_id: UserId, token: &str) -> Device {
    Device {
        id: DeviceId::random(),
        user_id,
        endpoint_token: token.to_owned(),
        provider: PushProvider::Fcm,
        platform: Platform::Android,
        last_active_at: Utc::now(),
    }
}

struct Harness {
    users: MockUserDirectory,
    preferences: MockPreferencesRepository,
    devices: MockDeviceRepository,
    notifications: MockNotificationRepository,
    realtime: MockRealtimeChannel,
    push: MockPushGateway,
}

impl Harness {
    fn with_users(users_list: Vec<User>) -> Self {
        let mut users = MockUserDirectory::new();
        users
            .expect_active_users()
            .return_once(move || Ok(users_list));
        let mut preferences = MockPreferencesRepository::new();
        preferences
            .expect_find_by_user_ids()
            .return_once(|_| Ok(Vec::new()));
        let mut devices = MockDeviceRepository::new();
        devices
            .expect_find_by_user_ids()
            .return_once(|_| Ok(Vec::new()));
        Self {
            users,
            preferences,
            devices,
            notifications: MockNotificationRepository::new(),
            realtime: MockRealtimeChannel::new(),
            push: MockPushGateway::new(),
        }
    }

    fn engine(
        self,
    ) -> FanoutEngine<
        MockUserDirectory,
        MockPreferencesRepository,
        MockDeviceRepository,
        MockNotificationRepository,
    > {
        FanoutEngine::new(
            Arc::new(self.users),
            Arc::new(self.preferences),
            Arc::new(self.devices),
            Arc::new(self.notifications),
            Arc::new(self.realtime),
            Arc::new(self.push),
        )
    }
}

#[tokio::test]
async fn eligible_user_gets_a_stored_notification_and_a_live_event() {
    let user = eligible_user();
    let user_id = user.id;
    let mut harness = Harness::with_users(vec![user]);

    harness
        .notifications
        .expect_insert()
        .withf(move |n| {
            n.user_id == user_id
                && n.title == "New job match"
                && n.body == "Police Constable"
                && !n.read
                && !n.push_sent
        })
        .return_once(|n| Ok(n.clone()));
    harness
        .realtime
        .expect_emit_to_user()
        .withf(move |uid, event, payload| {
            *uid == user_id
                && event == NOTIFICATION_EVENT
                && payload.get("title").and_then(|v| v.as_str()) == Some("New job match")
        })
        .return_once(|_, _, _| ());
    // No registered devices, so the gateway is never contacted.

    let report = harness.engine().notify_eligible_users(&police_job()).await.expect("run");
    assert_eq!(report.candidates, 1);
    assert_eq!(report.created, 1);
}

#[tokio::test]
async fn opted_out_users_are_skipped_before_anything_is_stored() {
    let user = eligible_user();
    let user_id = user.id;
    let mut harness = Harness::with_users(vec![user]);

    let settings = NotificationSettings {
        job_alerts: false,
        ..NotificationSettings::default()
    };
    harness.preferences = MockPreferencesRepository::new();
    harness
        .preferences
        .expect_find_by_user_ids()
        .return_once(move |_| Ok(vec![preference_with(settings, user_id)]));

    let report = harness.engine().notify_eligible_users(&police_job()).await.expect("run");
    assert_eq!(report.candidates, 1);
    assert_eq!(report.created, 0);
}

#[tokio::test]
async fn incomplete_profiles_are_skipped_for_job_listings() {
    let mut user = eligible_user();
    user.profile.education = None;
    let harness = Harness::with_users(vec![user]);

    let report = harness.engine().notify_eligible_users(&police_job()).await.expect("run");
    assert_eq!(report.created, 0);
}

#[tokio::test]
async fn ineligible_users_are_skipped_without_side_effects() {
    let mut user = eligible_user();
    user.profile.age = Some(40);
    let harness = Harness::with_users(vec![user]);

    let report = harness.engine().notify_eligible_users(&police_job()).await.expect("run");
    assert_eq!(report.candidates, 1);
    assert_eq!(report.created, 0);
}

#[tokio::test]
async fn successful_push_delivery_marks_the_notification_sent() {
    let user = eligible_user();
    let user_id = user.id;
    let mut harness = Harness::with_users(vec![user]);

    harness.devices = MockDeviceRepository::new();
    harness
        .devices
        .expect_find_by_user_ids()
        .return_once(move |_| Ok(vec![device_for(user_id, "tok-1")]));
    harness
        .notifications
        .expect_insert()
        .return_once(|n| Ok(n.clone()));
    harness
        .notifications
        .expect_mark_push_sent()
        .times(1)
        .return_once(|_| Ok(()));
    harness
        .realtime
        .expect_emit_to_user()
        .return_once(|_, _, _| ());
    harness
        .push
        .expect_send()
        .withf(|tokens, message| tokens == ["tok-1".to_owned()] && message.title == "New job match")
        .return_once(|tokens, _| {
            Ok(PushDispatch {
                attempted: tokens.len(),
                succeeded: tokens.len(),
                failed: 0,
                invalid_tokens: Vec::new(),
            })
        });

    let report = harness.engine().notify_eligible_users(&police_job()).await.expect("run");
    assert_eq!(report.created, 1);
}

#[tokio::test]
async fn provider_reported_dead_tokens_are_pruned() {
    let user = eligible_user();
    let user_id = user.id;
    let mut harness = Harness::with_users(vec![user]);

    harness.devices = MockDeviceRepository::new();
    harness.devices.expect_find_by_user_ids().return_once(move |_| {
        Ok(vec![
            device_for(user_id, "tok-live"),
            device_for(user_id, "tok-dead"),
        ])
    });
    harness
        .devices
        .expect_delete_by_tokens()
        .withf(|tokens| tokens == ["tok-dead".to_owned()])
        .times(1)
        .return_once(|_| Ok(1));
    harness
        .notifications
        .expect_insert()
        .return_once(|n| Ok(n.clone()));
    harness
        .notifications
        .expect_mark_push_sent()
        .return_once(|_| Ok(()));
    harness
        .realtime
        .expect_emit_to_user()
        .return_once(|_, _, _| ());
    harness.push.expect_send().return_once(|_, _| {
        Ok(PushDispatch {
            attempted: 2,
            succeeded: 1,
            failed: 1,
            invalid_tokens: vec!["tok-dead".to_owned()],
        })
    });

    harness.engine().notify_eligible_users(&police_job()).await.expect("run");
}

#[tokio::test]
async fn push_failures_leave_the_notification_stored_but_unmarked() {
    let user = eligible_user();
    let user_id = user.id;
    let mut harness = Harness::with_users(vec![user]);

    harness.devices = MockDeviceRepository::new();
    harness
        .devices
        .expect_find_by_user_ids()
        .return_once(move |_| Ok(vec![device_for(user_id, "tok-1")]));
    harness
        .notifications
        .expect_insert()
        .return_once(|n| Ok(n.clone()));
    harness
        .realtime
        .expect_emit_to_user()
        .return_once(|_, _, _| ());
    harness
        .push
        .expect_send()
        .return_once(|_, _| Err(PushGatewayError::timeout("deadline exceeded")));

    let report = harness.engine().notify_eligible_users(&police_job()).await.expect("run");
    assert_eq!(report.created, 1);
}

#[tokio::test]
async fn push_disabled_in_preferences_skips_the_gateway() {
    let user = eligible_user();
    let user_id = user.id;
    let mut harness = Harness::with_users(vec![user]);

    let settings = NotificationSettings {
        push_notifications: false,
        ..NotificationSettings::default()
    };
    harness.preferences = MockPreferencesRepository::new();
    harness
        .preferences
        .expect_find_by_user_ids()
        .return_once(move |_| Ok(vec![preference_with(settings, user_id)]));
    harness.devices = MockDeviceRepository::new();
    harness
        .devices
        .expect_find_by_user_ids()
        .return_once(move |_| Ok(vec![device_for(user_id, "tok-1")]));
    harness
        .notifications
        .expect_insert()
        .return_once(|n| Ok(n.clone()));
    harness
        .realtime
        .expect_emit_to_user()
        .return_once(|_, _, _| ());
    // MockPushGateway has no expectations; a send call would panic.

    let report = harness.engine().notify_eligible_users(&police_job()).await.expect("run");
    assert_eq!(report.created, 1);
}

#[tokio::test]
async fn one_failed_store_does_not_block_other_users() {
    let poisoned = eligible_user();
    let poisoned_id = poisoned.id;
    let healthy = eligible_user();
    let healthy_id = healthy.id;
    let mut harness = Harness::with_users(vec![poisoned, healthy]);

    harness
        .notifications
        .expect_insert()
        .times(2)
        .returning(move |n| {
            if n.user_id == poisoned_id {
                Err(NotificationRepositoryError::query("constraint violation"))
            } else {
                Ok(n.clone())
            }
        });
    harness
        .realtime
        .expect_emit_to_user()
        .withf(move |uid, _, _| *uid == healthy_id)
        .times(1)
        .return_once(|_, _, _| ());

    let report = harness.engine().notify_eligible_users(&police_job()).await.expect("run");
    assert_eq!(report.candidates, 2);
    assert_eq!(report.created, 1);
}

#[tokio::test]
async fn device_lookup_failure_degrades_to_in_app_only() {
    let user = eligible_user();
    let mut harness = Harness::with_users(vec![user]);

    harness.devices = MockDeviceRepository::new();
    harness
        .devices
        .expect_find_by_user_ids()
        .return_once(|_| Err(DeviceRepositoryError::connection("refused")));
    harness
        .notifications
        .expect_insert()
        .return_once(|n| Ok(n.clone()));
    harness
        .realtime
        .expect_emit_to_user()
        .return_once(|_, _, _| ());

    let report = harness.engine().notify_eligible_users(&police_job()).await.expect("run");
    assert_eq!(report.created, 1);
}

#[tokio::test]
async fn scheme_fanout_only_requires_a_name_on_the_profile() {
    let mut user = eligible_user();
    user.profile.education = None;
    user.profile.age = Some(70);
    let user_id = user.id;
    let mut harness = Harness::with_users(vec![user]);

    harness
        .notifications
        .expect_insert()
        .withf(move |n| {
            n.user_id == user_id && n.title == "New scheme match" && n.body == "Old Age Pension"
        })
        .return_once(|n| Ok(n.clone()));
    harness
        .realtime
        .expect_emit_to_user()
        .return_once(|_, _, _| ());

    let report = harness
        .engine()
        .notify_eligible_users(&pension_scheme())
        .await
        .expect("run");
    assert_eq!(report.created, 1);
}
