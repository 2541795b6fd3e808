use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::env;

/// Environment variable that takes precedence over the configured token.
pub const TOKEN_ENV: &str = "IND_TOKEN";

/// Bearer credential for the API. Acquiring it is someone else's job, it is
/// used as-is for the whole run and never refreshed.
#[derive(Clone, Debug)]
pub struct Credentials {
    token: SecretString,
    expires_at: Option<DateTime<Utc>>,
}

impl Credentials {
    #[must_use]
    pub fn new(token: &SecretString, expires_at: Option<DateTime<Utc>>) -> Self {
        let token = env::var(TOKEN_ENV).map_or_else(|_| token.clone(), SecretString::from);
        Self { token, expires_at }
    }

    /// Get the bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }

    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns the expiry if the credential is already past it.
    #[must_use]
    pub fn expired(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.expires_at.filter(|at| *at <= now)
    }
}
