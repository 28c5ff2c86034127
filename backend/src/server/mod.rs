//! Server construction and middleware wiring.

mod config;

pub use config::{AppConfig, PushConfig};

use std::sync::Arc;
use std::time::Duration;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::Trace;
use crate::domain::ports::{
    DeviceRepository, DisabledPushGateway, FixtureDeviceRepository, FixtureNotificationRepository,
    FixturePreferencesRepository, FixtureUserDirectory, ListingFanout, NotificationRepository,
    PreferencesRepository, PushGateway, RealtimeChannel, UserDirectory,
};
use crate::domain::{DeviceRegistry, FanoutEngine, NotificationStore};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{admin_listing_scope, notification_scope};
use crate::inbound::ws::{WsState, ws_entry};
use crate::outbound::persistence::{
    DbPool, DieselDeviceRepository, DieselNotificationRepository, DieselPreferencesRepository,
    DieselUserDirectory,
};
use crate::outbound::push::{FcmPushGateway, OneSignalPushGateway};
use crate::outbound::realtime::WsChannelRegistry;

/// Build the configured push gateway.
///
/// # Errors
///
/// Returns [`std::io::Error`] when provider credentials are rejected or the
/// HTTP client cannot be constructed.
fn build_push_gateway(
    push: &PushConfig,
    timeout: Duration,
) -> std::io::Result<Arc<dyn PushGateway>> {
    match push {
        PushConfig::Disabled => {
            info!("push delivery disabled; notifications stay in-app only");
            Ok(Arc::new(DisabledPushGateway))
        }
        PushConfig::Fcm { server_key } => FcmPushGateway::new(server_key.clone(), timeout)
            .map(|gateway| Arc::new(gateway) as Arc<dyn PushGateway>)
            .map_err(|err| std::io::Error::other(format!("FCM configuration: {err}"))),
        PushConfig::OneSignal { app_id, api_key } => {
            OneSignalPushGateway::new(app_id.clone(), api_key.clone(), timeout)
                .map(|gateway| Arc::new(gateway) as Arc<dyn PushGateway>)
                .map_err(|err| std::io::Error::other(format!("OneSignal configuration: {err}")))
        }
    }
}

/// Wire the fan-out engine, stores, and channel registry over one set of
/// repository adapters.
fn assemble_states<U, P, D, N>(
    users: Arc<U>,
    preferences: Arc<P>,
    devices: Arc<D>,
    notifications: Arc<N>,
    push: Arc<dyn PushGateway>,
) -> (web::Data<HttpState>, web::Data<WsState>)
where
    U: UserDirectory + 'static,
    P: PreferencesRepository + 'static,
    D: DeviceRepository + 'static,
    N: NotificationRepository + 'static,
{
    let registry = Arc::new(WsChannelRegistry::new());
    let realtime: Arc<dyn RealtimeChannel> = registry.clone();
    let fanout: Arc<dyn ListingFanout> = Arc::new(FanoutEngine::new(
        Arc::clone(&users),
        preferences,
        Arc::clone(&devices),
        Arc::clone(&notifications),
        Arc::clone(&realtime),
        push,
    ));
    let http = web::Data::new(HttpState::new(
        Arc::new(NotificationStore::new(notifications)),
        Arc::new(DeviceRegistry::new(devices)),
        fanout,
        realtime,
    ));
    let ws = web::Data::new(WsState::new(users, registry));
    (http, ws)
}

/// Build HTTP and WebSocket states, database-backed when a pool is
/// available and fixture-backed otherwise.
fn build_states(
    pool: Option<DbPool>,
    push: Arc<dyn PushGateway>,
) -> (web::Data<HttpState>, web::Data<WsState>) {
    match pool {
        Some(pool) => assemble_states(
            Arc::new(DieselUserDirectory::new(pool.clone())),
            Arc::new(DieselPreferencesRepository::new(pool.clone())),
            Arc::new(DieselDeviceRepository::new(pool.clone())),
            Arc::new(DieselNotificationRepository::new(pool)),
            push,
        ),
        None => assemble_states(
            Arc::new(FixtureUserDirectory),
            Arc::new(FixturePreferencesRepository),
            Arc::new(FixtureDeviceRepository),
            Arc::new(FixtureNotificationRepository),
            push,
        ),
    }
}

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
    key: Key,
    cookie_secure: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        ws_state,
        key,
        cookie_secure,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .service(notification_scope())
        .service(admin_listing_scope());

    // The WebSocket entry authenticates against the same cookie, so the
    // session middleware wraps the whole app rather than the API scope.
    App::new()
        .app_data(http_state)
        .app_data(ws_state)
        .wrap(session)
        .wrap(Trace)
        .service(api)
        .service(ws_entry)
}

/// Construct the HTTP server from application configuration and an
/// optional database pool.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when push configuration is invalid or the
/// listening socket cannot be bound.
pub fn create_server(config: AppConfig, pool: Option<DbPool>) -> std::io::Result<Server> {
    let push = build_push_gateway(&config.push, config.push_timeout)?;
    let (http_state, ws_state) = build_states(pool, push);
    let AppConfig {
        bind_addr,
        session_key,
        cookie_secure,
        ..
    } = config;

    info!(%bind_addr, "starting HTTP server");
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
            key: session_key.clone(),
            cookie_secure,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
