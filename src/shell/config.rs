// Startup configuration.
//
// Read once by the composition root and passed explicitly to everything that needs it.
// `DEFAULT_CONNECTION` and `SECRET_KEY` are required; everything else has a default.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONNECTION: &str = "DEFAULT_CONNECTION";
pub const SECRET_KEY: &str = "SECRET_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// Whether API operations without a declared policy are open to anonymous callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAccess {
    Open,
    Authenticated,
}

#[derive(Clone)]
pub struct Settings {
    pub environment: Environment,
    pub bind_addr: SocketAddr,
    pub default_connection: String,
    pub secret_key: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub enforce_https: bool,
    pub https_port: u16,
    /// Honour `X-Forwarded-Proto`. Only safe behind a TLS-terminating proxy that overwrites it.
    pub trust_forwarded_proto: bool,
    pub hsts_max_age: Duration,
    pub static_root: PathBuf,
    pub spa_root: PathBuf,
    pub spa_dev_server: String,
    pub default_access: DefaultAccess,
    pub graphql_metrics: bool,
    pub mail_sender: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("environment", &self.environment)
            .field("bind_addr", &self.bind_addr)
            .field("default_connection", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .field("enforce_https", &self.enforce_https)
            .field("https_port", &self.https_port)
            .field("trust_forwarded_proto", &self.trust_forwarded_proto)
            .field("hsts_max_age", &self.hsts_max_age)
            .field("static_root", &self.static_root)
            .field("spa_root", &self.spa_root)
            .field("spa_dev_server", &self.spa_dev_server)
            .field("default_access", &self.default_access)
            .field("graphql_metrics", &self.graphql_metrics)
            .field("mail_sender", &self.mail_sender)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let required = |key: &'static str| read(key).ok_or(ConfigError::Missing(key));

        fn parsed<T: FromStr>(
            key: &'static str,
            raw: Option<String>,
            default: T,
        ) -> Result<T, ConfigError>
        where
            T::Err: fmt::Display,
        {
            match raw {
                None => Ok(default),
                Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                    key,
                    value: value.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        let require_authenticated = parsed("REQUIRE_AUTHENTICATED", read("REQUIRE_AUTHENTICATED"), false)?;
        let hsts_secs: u64 = parsed("HSTS_MAX_AGE_SECS", read("HSTS_MAX_AGE_SECS"), 30 * 24 * 60 * 60)?;

        Ok(Self {
            environment: parsed("APP_ENV", read("APP_ENV"), Environment::Production)?,
            bind_addr: parsed(
                "BIND_ADDR",
                read("BIND_ADDR"),
                SocketAddr::from(([0, 0, 0, 0], 8080)),
            )?,
            default_connection: required(DEFAULT_CONNECTION)?,
            secret_key: required(SECRET_KEY)?,
            jwt_issuer: read("JWT_ISSUER").unwrap_or_else(|| "issuer".into()),
            jwt_audience: read("JWT_AUDIENCE").unwrap_or_else(|| "audience".into()),
            enforce_https: parsed("ENFORCE_HTTPS", read("ENFORCE_HTTPS"), true)?,
            https_port: parsed("HTTPS_PORT", read("HTTPS_PORT"), 443)?,
            trust_forwarded_proto: parsed(
                "TRUST_FORWARDED_PROTO",
                read("TRUST_FORWARDED_PROTO"),
                false,
            )?,
            hsts_max_age: Duration::from_secs(hsts_secs),
            static_root: read("STATIC_ROOT").map(PathBuf::from).unwrap_or_else(|| "wwwroot".into()),
            spa_root: read("SPA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| "ClientApp/build".into()),
            spa_dev_server: read("SPA_DEV_SERVER")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://localhost:3000".into()),
            default_access: if require_authenticated {
                DefaultAccess::Authenticated
            } else {
                DefaultAccess::Open
            },
            graphql_metrics: parsed("GRAPHQL_METRICS", read("GRAPHQL_METRICS"), true)?,
            mail_sender: read("MAIL_SENDER").unwrap_or_else(|| "no-reply@localhost".into()),
        })
    }
}
