//! Authentication and authorization for the image catalog API.
//!
//! Registration and login live here, together with the password hasher, the
//! token issuer/verifier, the static authorization policy, and the
//! per-request principal resolution used by every guarded endpoint.

use secrecy::SecretString;

pub mod login;
pub mod password;
pub mod policy;
pub mod principal;
pub mod register;
pub mod reset;
pub(crate) mod storage;
pub mod token;
pub mod types;

pub use principal::Principal;

/// Signing configuration for access tokens.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    secret: SecretString,
    ttl_seconds: i64,
    issuer: String,
}

impl TokenConfig {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            ttl_seconds: 3600,
            issuer: "photarium".to_string(),
        }
    }

    #[must_use]
    pub fn with_ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds.max(1);
        self
    }

    #[must_use]
    pub fn with_issuer(mut self, issuer: String) -> Self {
        self.issuer = issuer;
        self
    }

    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.secret
    }

    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}

/// Shared auth state injected as an axum `Extension`.
#[derive(Debug, Clone)]
pub struct AuthState {
    token: TokenConfig,
}

impl AuthState {
    #[must_use]
    pub fn new(token: TokenConfig) -> Self {
        Self { token }
    }

    #[must_use]
    pub fn token(&self) -> &TokenConfig {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_config_defaults_and_builders() {
        let config = TokenConfig::new(SecretString::from("secret"));
        assert_eq!(config.ttl_seconds(), 3600);
        assert_eq!(config.issuer(), "photarium");

        let config = config.with_ttl_seconds(0).with_issuer("catalog".into());
        assert_eq!(config.ttl_seconds(), 1);
        assert_eq!(config.issuer(), "catalog");
    }
}
