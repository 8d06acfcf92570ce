//! HS256 access token issuing and verification.
//!
//! The token only proves possession; the email claim is always re-resolved
//! against the credential store before any authorization decision, so a stale
//! token never carries a stale role.

use crate::api::error::ApiError;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use super::TokenConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the identity email.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| i64::try_from(duration.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

/// Issue a signed access token for the given email.
///
/// # Errors
/// Returns an error if signing fails.
pub fn issue(config: &TokenConfig, email: &str) -> Result<String, ApiError> {
    let now = now_unix_seconds();
    let claims = Claims {
        sub: email.to_string(),
        iat: now,
        exp: now.saturating_add(config.ttl_seconds()),
        iss: config.issuer().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret().expose_secret().as_bytes()),
    )
    .map_err(|err| ApiError::Internal(anyhow::anyhow!("token signing failed: {err}")))
}

/// Verify a token and return its claims.
///
/// Rejects bad signatures, expired tokens, wrong issuer, and malformed input.
///
/// # Errors
/// Returns `ApiError::Authentication` on any verification failure.
pub fn verify(config: &TokenConfig, token: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer()]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret().expose_secret().as_bytes()),
        &validation,
    )
    .map_err(|_| ApiError::Authentication("Invalid or expired token"))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config() -> TokenConfig {
        TokenConfig::new(SecretString::from("test-secret")).with_ttl_seconds(60)
    }

    #[test]
    fn issue_and_verify_round_trip() {
        let config = config();
        let token = issue(&config, "user@example.com").unwrap();
        let claims = verify(&config, &token).unwrap();

        assert_eq!(claims.sub, "user@example.com");
        assert_eq!(claims.iss, "photarium");
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = issue(&config(), "user@example.com").unwrap();
        let other = TokenConfig::new(SecretString::from("other-secret"));
        assert!(verify(&other, &token).is_err());
    }

    #[test]
    fn verify_rejects_wrong_issuer() {
        let token = issue(&config(), "user@example.com").unwrap();
        let other = TokenConfig::new(SecretString::from("test-secret"))
            .with_issuer("someone-else".to_string());
        assert!(verify(&other, &token).is_err());
    }

    #[test]
    fn verify_rejects_tampered_token() {
        let config = config();
        let mut token = issue(&config, "user@example.com").unwrap();
        token.push('x');
        assert!(verify(&config, &token).is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(verify(&config(), "not.a.token").is_err());
    }
}
