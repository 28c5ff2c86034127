//! WebSocket inbound adapter delivering realtime notification events.
//!
//! Responsibilities:
//! - authenticate upgrade requests against the cookie session
//! - verify the account is still active before admitting the connection
//! - attach the connection to the channel registry (admins also join the
//!   shared admin audience)
//! - keep framing and heartbeats at the edge of the system

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, get, web};
use tracing::warn;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{Error, Role, UserId};
use crate::inbound::http::session::SessionContext;
use crate::outbound::realtime::WsChannelRegistry;

mod session;

/// Dependency bundle for the WebSocket entry point.
#[derive(Clone)]
pub struct WsState {
    pub directory: Arc<dyn UserDirectory>,
    pub registry: Arc<WsChannelRegistry>,
}

impl WsState {
    /// Bundle the ports the WebSocket adapter depends on.
    pub fn new(directory: Arc<dyn UserDirectory>, registry: Arc<WsChannelRegistry>) -> Self {
        Self {
            directory,
            registry,
        }
    }
}

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

/// Resolve the authenticated account and whether it joins the admin
/// audience. Deactivated or deleted accounts are rejected.
async fn admit(state: &WsState, session: &SessionContext) -> Result<(UserId, bool), Error> {
    let user_id = session.require_user_id()?;
    let user = state
        .directory
        .find_by_id(&user_id)
        .await
        .map_err(map_directory_error)?
        .ok_or_else(|| Error::unauthorized("account no longer exists"))?;
    if !user.is_active {
        return Err(Error::unauthorized("account is deactivated"));
    }
    Ok((user_id, user.role == Role::Admin))
}

/// Handle WebSocket upgrade for the `/ws` endpoint.
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<WsState>,
    session_ctx: SessionContext,
    req: HttpRequest,
    stream: web::Payload,
) -> Result<HttpResponse, Error> {
    let (user_id, admin) = admit(&state, &session_ctx).await?;

    let (response, ws_session, msg_stream) =
        actix_ws::handle(&req, stream).map_err(|error| {
            warn!(error = %error, "WebSocket upgrade failed");
            Error::internal("WebSocket upgrade failed")
        })?;

    let subscription = state.registry.subscribe(user_id, admin).await;
    actix_web::rt::spawn(session::run(
        Arc::clone(&state.registry),
        user_id,
        subscription,
        ws_session,
        msg_stream,
    ));

    Ok(response)
}
