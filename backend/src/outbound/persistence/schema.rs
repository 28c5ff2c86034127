//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.
//! Regenerate with `diesel print-schema` when migrations change.

diesel::table! {
    /// User accounts with the profile fields eligibility reads.
    ///
    /// `preferred_domains` stores either the sentinel `["ALL"]` or a list of
    /// concrete domain tags; the application enforces that the sentinel is
    /// never mixed with other values.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Account role: `USER` or `ADMIN`.
        role -> Varchar,
        /// Deactivated accounts are excluded from fan-out and realtime auth.
        is_active -> Bool,
        full_name -> Nullable<Varchar>,
        date_of_birth -> Nullable<Date>,
        /// Whole years, recomputed from `date_of_birth` on profile save.
        age -> Nullable<Int4>,
        /// Highest completed education level, e.g. `12th` or `Graduate`.
        education -> Nullable<Varchar>,
        state -> Nullable<Varchar>,
        district -> Nullable<Varchar>,
        preferred_domains -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-user notification toggles, one row per user, created lazily.
    user_preferences (user_id) {
        /// Primary key and foreign key to `users.id`.
        user_id -> Uuid,
        job_alerts -> Bool,
        scheme_alerts -> Bool,
        reminders -> Bool,
        push_notifications -> Bool,
        email_notifications -> Bool,
        sms_notifications -> Bool,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered push endpoints.
    ///
    /// `endpoint_token` carries a UNIQUE constraint; registration upserts on
    /// it so a token always belongs to exactly one user.
    devices (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Foreign key to `users.id`.
        user_id -> Uuid,
        /// Provider-issued delivery token, globally unique.
        endpoint_token -> Varchar,
        /// Push provider tag: `fcm` or `onesignal`.
        provider -> Varchar,
        /// Client platform: `android` or `ios`.
        platform -> Varchar,
        last_active_at -> Timestamptz,
    }
}

diesel::table! {
    /// Persisted in-app notifications.
    notifications (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Foreign key to `users.id`; every read and update is scoped by it.
        user_id -> Uuid,
        /// Notification category, e.g. `JOB_ALERT`.
        kind -> Varchar,
        title -> Varchar,
        body -> Text,
        /// Category-specific payload echoed to clients.
        data -> Jsonb,
        read -> Bool,
        /// Set once a push provider accepts the message for any token.
        push_sent -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(user_preferences -> users (user_id));
diesel::joinable!(devices -> users (user_id));
diesel::joinable!(notifications -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, user_preferences, devices, notifications);
