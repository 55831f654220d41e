//! API server configuration.

use std::time::Duration;

use tastetrail_core::auth::jwt::resolve_jwt_secret;
use tastetrail_core::mode::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_CONNECTIONS, ModeOptions};

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Default display name of the bootstrap administrator.
pub const DEFAULT_ADMIN_NAME: &str = "Administrator";

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:5000").
    pub bind_addr: String,
    /// PostgreSQL connection URL. `None` means ephemeral mode.
    pub database_url: Option<String>,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Bound on the initial database connection.
    pub connect_timeout: Duration,
    pub max_connections: u32,
    /// Administrator ensured at startup, if configured.
    pub admin: Option<AdminBootstrap>,
}

/// Credentials of the administrator created or promoted at startup.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

impl AdminBootstrap {
    /// Both email and password must be non-blank; the name falls back to a default.
    pub fn from_parts(
        email: Option<String>,
        password: Option<String>,
        name: Option<String>,
    ) -> Option<Self> {
        let email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty())?;
        let password = password.filter(|p| !p.is_empty())?;
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string());
        Some(Self {
            email,
            password,
            name,
        })
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                  | Default                      |
    /// |---------------------------|------------------------------|
    /// | `BIND_ADDR`               | `127.0.0.1:5000`             |
    /// | `DATABASE_URL`            | unset (ephemeral mode)       |
    /// | `DB_CONNECT_TIMEOUT_SECS` | `5`                          |
    /// | `DB_MAX_CONNECTIONS`      | `5`                          |
    /// | `JWT_SECRET`              | development fallback secret  |
    /// | `ADMIN_EMAIL` / `ADMIN_PASSWORD` / `ADMIN_NAME` | unset  |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::from_env`], reading variables through `env`.
    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind_addr: env("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            database_url: env("DATABASE_URL").filter(|u| !u.trim().is_empty()),
            jwt_secret: resolve_jwt_secret(env("JWT_SECRET")),
            connect_timeout: env("DB_CONNECT_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            max_connections: env("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            admin: AdminBootstrap::from_parts(
                env("ADMIN_EMAIL"),
                env("ADMIN_PASSWORD"),
                env("ADMIN_NAME"),
            ),
        }
    }

    /// Connection settings handed to the mode selector.
    pub fn mode_options(&self) -> ModeOptions {
        ModeOptions {
            connect_timeout: self.connect_timeout,
            max_connections: self.max_connections,
        }
    }
}

#[cfg(test)]
mod tests {
    use tastetrail_core::auth::jwt::DEV_FALLBACK_SECRET;

    use super::*;

    #[test]
    fn admin_bootstrap_needs_email_and_password() {
        assert!(AdminBootstrap::from_parts(None, Some("pw".into()), None).is_none());
        assert!(AdminBootstrap::from_parts(Some("a@b.c".into()), None, None).is_none());
        assert!(AdminBootstrap::from_parts(Some("  ".into()), Some("pw".into()), None).is_none());

        let admin =
            AdminBootstrap::from_parts(Some(" a@b.c ".into()), Some("pw".into()), None).unwrap();
        assert_eq!(admin.email, "a@b.c");
        assert_eq!(admin.name, DEFAULT_ADMIN_NAME);
    }

    #[test]
    fn admin_password_is_not_debug_printed() {
        let admin = AdminBootstrap::from_parts(
            Some("a@b.c".into()),
            Some("s3cret".into()),
            Some("Root".into()),
        )
        .unwrap();
        let printed = format!("{admin:?}");
        assert!(!printed.contains("s3cret"));
        assert!(printed.contains("Root"));
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[]));
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert!(config.database_url.is_none());
        assert_eq!(config.jwt_secret, DEV_FALLBACK_SECRET);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(config.admin.is_none());
    }

    #[test]
    fn environment_values_are_read() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("DATABASE_URL", "postgres://db/tastetrail"),
            ("JWT_SECRET", "s3cret"),
            ("DB_CONNECT_TIMEOUT_SECS", "2"),
            ("DB_MAX_CONNECTIONS", "not-a-number"),
            ("ADMIN_EMAIL", "root@example.com"),
            ("ADMIN_PASSWORD", "pw"),
        ]));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.database_url.as_deref(), Some("postgres://db/tastetrail"));
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.admin.unwrap().email, "root@example.com");
    }

    #[test]
    fn blank_database_url_and_secret_are_ignored() {
        let config =
            ApiConfig::from_lookup(lookup(&[("DATABASE_URL", "  "), ("JWT_SECRET", " ")]));
        assert!(config.database_url.is_none());
        assert_eq!(config.jwt_secret, DEV_FALLBACK_SECRET);
    }
}
