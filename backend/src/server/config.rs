//! Environment-derived application configuration.
//!
//! All settings are read once at startup. A missing `DATABASE_URL` leaves
//! the server running on fixture ports, which is only useful for local
//! smoke testing; production deployments set every variable explicitly.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::Key;
use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 10;

/// Which push provider the server dispatches through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushConfig {
    /// No provider configured; notifications stay in-app only.
    Disabled,
    Fcm {
        server_key: String,
    },
    OneSignal {
        app_id: String,
        api_key: String,
    },
}

/// Application settings assembled from environment variables.
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub session_key: Key,
    pub cookie_secure: bool,
    pub push: PushConfig,
    pub push_timeout: Duration,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] when a variable is present but invalid,
    /// or when the session key file is unreadable outside debug builds.
    pub fn from_env() -> std::io::Result<Self> {
        let bind_addr = parse_bind_addr(
            env::var("BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned())
                .as_str(),
        )?;
        let database_url = env::var("DATABASE_URL").ok();
        if database_url.is_none() {
            warn!("DATABASE_URL not set; falling back to fixture ports");
        }
        let session_key = load_session_key()?;
        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|value| value != "0")
            .unwrap_or(true);
        let push = parse_push_config(
            env::var("PUSH_PROVIDER").ok().as_deref(),
            env::var("FCM_SERVER_KEY").ok(),
            env::var("ONESIGNAL_APP_ID").ok(),
            env::var("ONESIGNAL_API_KEY").ok(),
        )?;
        let push_timeout = parse_push_timeout(env::var("PUSH_TIMEOUT_SECS").ok().as_deref())?;

        Ok(Self {
            bind_addr,
            database_url,
            session_key,
            cookie_secure,
            push,
            push_timeout,
        })
    }
}

fn parse_bind_addr(raw: &str) -> std::io::Result<SocketAddr> {
    raw.parse()
        .map_err(|err| std::io::Error::other(format!("invalid BIND_ADDR {raw:?}: {err}")))
}

/// Derive the session key from `SESSION_KEY_FILE`.
///
/// Debug builds (or `SESSION_ALLOW_EPHEMERAL=1`) fall back to a generated
/// key so a missing secret does not block local runs; sessions then reset
/// on every restart.
fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| DEFAULT_SESSION_KEY_FILE.to_owned());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(err) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %err, "using an ephemeral session key");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {err}"
                )))
            }
        }
    }
}

fn parse_push_config(
    provider: Option<&str>,
    fcm_server_key: Option<String>,
    onesignal_app_id: Option<String>,
    onesignal_api_key: Option<String>,
) -> std::io::Result<PushConfig> {
    match provider {
        None | Some("disabled") => Ok(PushConfig::Disabled),
        Some("fcm") => fcm_server_key
            .filter(|key| !key.trim().is_empty())
            .map(|server_key| PushConfig::Fcm { server_key })
            .ok_or_else(|| std::io::Error::other("PUSH_PROVIDER=fcm requires FCM_SERVER_KEY")),
        Some("onesignal") => match (onesignal_app_id, onesignal_api_key) {
            (Some(app_id), Some(api_key))
                if !app_id.trim().is_empty() && !api_key.trim().is_empty() =>
            {
                Ok(PushConfig::OneSignal { app_id, api_key })
            }
            _ => Err(std::io::Error::other(
                "PUSH_PROVIDER=onesignal requires ONESIGNAL_APP_ID and ONESIGNAL_API_KEY",
            )),
        },
        Some(other) => Err(std::io::Error::other(format!(
            "unknown PUSH_PROVIDER {other:?}; expected fcm, onesignal, or disabled"
        ))),
    }
}

fn parse_push_timeout(raw: Option<&str>) -> std::io::Result<Duration> {
    match raw {
        None => Ok(Duration::from_secs(DEFAULT_PUSH_TIMEOUT_SECS)),
        Some(value) => value
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|err| std::io::Error::other(format!("invalid PUSH_TIMEOUT_SECS: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn bind_addr_parses_host_and_port() {
        let addr = parse_bind_addr("127.0.0.1:9000").expect("valid address");
        assert_eq!(addr.port(), 9000);
    }

    #[rstest]
    #[case::missing_port("127.0.0.1")]
    #[case::not_an_address("eight-thousand")]
    fn bind_addr_rejects_malformed_input(#[case] raw: &str) {
        assert!(parse_bind_addr(raw).is_err());
    }

    #[rstest]
    fn push_defaults_to_disabled() {
        let config = parse_push_config(None, None, None, None).expect("valid config");
        assert_eq!(config, PushConfig::Disabled);
    }

    #[rstest]
    fn push_fcm_requires_server_key() {
        let config = parse_push_config(Some("fcm"), Some("key-1".into()), None, None)
            .expect("valid config");
        assert_eq!(
            config,
            PushConfig::Fcm {
                server_key: "key-1".into()
            }
        );
        assert!(parse_push_config(Some("fcm"), None, None, None).is_err());
        assert!(parse_push_config(Some("fcm"), Some("  ".into()), None, None).is_err());
    }

    #[rstest]
    fn push_onesignal_requires_both_credentials() {
        let config = parse_push_config(
            Some("onesignal"),
            None,
            Some("app-1".into()),
            Some("key-1".into()),
        )
        .expect("valid config");
        assert_eq!(
            config,
            PushConfig::OneSignal {
                app_id: "app-1".into(),
                api_key: "key-1".into()
            }
        );
        assert!(parse_push_config(Some("onesignal"), None, Some("app-1".into()), None).is_err());
    }

    #[rstest]
    fn push_rejects_unknown_provider() {
        assert!(parse_push_config(Some("apns"), None, None, None).is_err());
    }

    #[rstest]
    fn push_timeout_parses_seconds_with_default() {
        assert_eq!(
            parse_push_timeout(None).expect("default"),
            Duration::from_secs(DEFAULT_PUSH_TIMEOUT_SECS)
        );
        assert_eq!(
            parse_push_timeout(Some("3")).expect("explicit"),
            Duration::from_secs(3)
        );
        assert!(parse_push_timeout(Some("soon")).is_err());
    }
}
