//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod listings;
pub mod notifications;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

/// Notification inbox and device routes, mounted at `/notifications`.
///
/// `read-all` is registered ahead of `{id}/read` so it is not shadowed by
/// the id path parameter.
pub fn notification_scope() -> actix_web::Scope {
    web::scope("/notifications")
        .service(notifications::unread_count)
        .service(notifications::mark_all_read)
        .service(notifications::mark_read)
        .service(notifications::register_device)
        .service(notifications::unregister_device)
        .service(notifications::list)
}

/// Admin listing publication routes, mounted at `/admin/listings`.
pub fn admin_listing_scope() -> actix_web::Scope {
    web::scope("/admin/listings")
        .service(listings::publish_job)
        .service(listings::publish_scheme)
}
