//! Notification inbox and device registration HTTP handlers.
//!
//! ```text
//! GET   /api/v1/notifications
//! GET   /api/v1/notifications/unread-count
//! PATCH /api/v1/notifications/{id}/read
//! PATCH /api/v1/notifications/read-all
//! POST  /api/v1/notifications/register-device
//! POST  /api/v1/notifications/unregister-device
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::DeviceRegistrationRequest;
use crate::domain::{
    ApiResult, Error, NotificationId, PageRequest, Platform, PushProvider,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Query string accepted by the listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    /// `true` lists read, `false` unread, absent lists both.
    read: Option<bool>,
}

#[get("")]
pub async fn list(
    session: SessionContext,
    state: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let request = PageRequest::new(query.page.unwrap_or(1), query.limit.unwrap_or(20));
    let page = state
        .notifications
        .list(&user_id, request, query.read)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

#[get("/unread-count")]
pub async fn unread_count(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let count = state.notifications.unread_count(&user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "unreadCount": count })))
}

#[patch("/{id}/read")]
pub async fn mark_read(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let notification_id = NotificationId::from_uuid(path.into_inner());
    let notification = state
        .notifications
        .mark_read(&user_id, &notification_id)
        .await?;
    Ok(HttpResponse::Ok().json(notification))
}

#[patch("/read-all")]
pub async fn mark_all_read(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let updated = state.notifications.mark_all_read(&user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "updated": updated })))
}

/// Request payload for registering a push device.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceRequest {
    token: String,
    platform: String,
    /// Defaults to `fcm` when the client predates the provider field.
    provider: Option<String>,
}

fn parse_platform(value: &str) -> Result<Platform, Error> {
    value.parse::<Platform>().map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "platform",
            "value": value,
        }))
    })
}

fn parse_provider(value: Option<&str>) -> Result<PushProvider, Error> {
    match value {
        None | Some("fcm") => Ok(PushProvider::Fcm),
        Some("onesignal") => Ok(PushProvider::OneSignal),
        Some(other) => Err(
            Error::invalid_request("provider must be fcm or onesignal").with_details(json!({
                "field": "provider",
                "value": other,
            })),
        ),
    }
}

#[post("/register-device")]
pub async fn register_device(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<RegisterDeviceRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let payload = payload.into_inner();
    let request = DeviceRegistrationRequest {
        endpoint_token: payload.token,
        platform: parse_platform(&payload.platform)?,
        provider: parse_provider(payload.provider.as_deref())?,
    };
    let device = state.devices.register(&user_id, request).await?;
    Ok(HttpResponse::Created().json(device))
}

/// Request payload for unregistering a push device.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnregisterDeviceRequest {
    token: String,
}

#[post("/unregister-device")]
pub async fn unregister_device(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<UnregisterDeviceRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.devices.unregister(&user_id, &payload.token).await?;
    Ok(HttpResponse::NoContent().finish())
}
