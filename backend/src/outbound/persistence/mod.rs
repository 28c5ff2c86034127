//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via Diesel with async support through `diesel-async` and
//! `bb8` connection pooling. Adapters stay thin: they translate between
//! Diesel row structs and domain types and map driver errors to port
//! errors, nothing more. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) never leave this module.

mod diesel_device_repository;
mod diesel_error_mapping;
mod diesel_notification_repository;
mod diesel_preferences_repository;
mod diesel_user_directory;
mod models;
mod pool;
mod schema;

pub use diesel_device_repository::DieselDeviceRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_preferences_repository::DieselPreferencesRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use pool::{DbPool, PoolConfig, PoolError};
