//! Server settings read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `8080` |
//! | `AUTH_REALM` | `TFBS browser` |
//! | `SESSION_TTL_MINUTES` | `720` |
//!
//! Repository selection is configured separately, see [`crate::db::factory`].

use std::net::SocketAddr;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REALM: &str = "TFBS browser";
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 12 * 60;
/// Longest accepted session lifetime: one year.
pub const MAX_SESSION_TTL_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Realm sent in the `WWW-Authenticate` challenge.
    pub realm: String,
    pub session_ttl_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            realm: DEFAULT_REALM.to_string(),
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "PORT",
                value: value.clone(),
                reason: e.to_string(),
            })?,
            None => defaults.port,
        };

        let session_ttl_minutes = match lookup("SESSION_TTL_MINUTES") {
            Some(value) => match value.trim().parse::<i64>() {
                Ok(minutes) if (1..=MAX_SESSION_TTL_MINUTES).contains(&minutes) => minutes,
                Ok(_) => {
                    return Err(ConfigError::InvalidValue {
                        key: "SESSION_TTL_MINUTES",
                        value,
                        reason: format!("must be between 1 and {}", MAX_SESSION_TTL_MINUTES),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::InvalidValue {
                        key: "SESSION_TTL_MINUTES",
                        value: value.clone(),
                        reason: e.to_string(),
                    })
                }
            },
            None => defaults.session_ttl_minutes,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            realm: lookup("AUTH_REALM").unwrap_or(defaults.realm),
            session_ttl_minutes,
        })
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        let minutes = self.session_ttl_minutes.clamp(1, MAX_SESSION_TTL_MINUTES);
        chrono::Duration::try_minutes(minutes).unwrap_or(chrono::Duration::MAX)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
            key: "HOST",
            value: self.host.clone(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("AUTH_REALM", "Curators"),
            ("SESSION_TTL_MINUTES", "30"),
        ]))
        .unwrap();
        assert_eq!(config.realm, "Curators");
        assert_eq!(config.session_ttl(), chrono::Duration::minutes(30));
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_non_positive_ttl() {
        let err = ServerConfig::from_lookup(lookup(&[("SESSION_TTL_MINUTES", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "SESSION_TTL_MINUTES",
                ..
            }
        ));
    }

    #[test]
    fn test_ttl_above_one_year_is_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[("SESSION_TTL_MINUTES", "1000000000000")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "SESSION_TTL_MINUTES",
                ..
            }
        ));

        let limit = MAX_SESSION_TTL_MINUTES.to_string();
        let config =
            ServerConfig::from_lookup(lookup(&[("SESSION_TTL_MINUTES", limit.as_str())])).unwrap();
        assert_eq!(config.session_ttl(), chrono::Duration::days(365));
    }

    #[test]
    fn test_session_ttl_is_clamped_for_hand_built_config() {
        let config = ServerConfig {
            session_ttl_minutes: i64::MAX,
            ..ServerConfig::default()
        };
        assert_eq!(config.session_ttl(), chrono::Duration::days(365));
    }

    #[test]
    fn test_bad_host() {
        let config = ServerConfig::from_lookup(lookup(&[("HOST", "not a host")])).unwrap();
        assert!(config.socket_addr().is_err());
    }
}
