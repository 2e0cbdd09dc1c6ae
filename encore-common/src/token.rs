//! Anti-forgery form tokens
//!
//! A token is `"{issued_ms}.{sha256(issued_ms ++ secret) hex}"`. The secret
//! is the random i64 persisted in the settings table (see
//! [`crate::db::settings`]). Tokens are minted when a form page is served
//! and must come back with the submission; a token older than one hour is
//! treated as a stale session, not a forgery.
//!
//! Pure functions only - no HTTP framework dependencies here.

use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Maximum accepted token age
const MAX_AGE_MS: i64 = 60 * 60 * 1000;

/// Maximum tolerated clock skew into the future
const MAX_FUTURE_MS: i64 = 1000;

/// Why a token failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Token absent or not in `issued_ms.hash` shape
    Malformed,
    /// Hash does not match the secret
    Forged,
    /// Token older than the acceptance window (expired session)
    Stale,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "Malformed form token"),
            TokenError::Forged => write!(f, "Form token does not verify"),
            TokenError::Stale => write!(f, "Form token expired"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Mint a token for a form page served now
pub fn mint_token(secret: i64) -> String {
    mint_token_at(secret, now_ms())
}

/// Mint a token with an explicit issue time (test support)
pub fn mint_token_at(secret: i64, issued_ms: i64) -> String {
    format!("{}.{}", issued_ms, token_hash(issued_ms, secret))
}

/// Validate a submitted token against the secret and the acceptance window
pub fn validate_token(token: &str, secret: i64) -> Result<(), TokenError> {
    validate_token_at(token, secret, now_ms())
}

/// Validate with an explicit "now" (test support)
pub fn validate_token_at(token: &str, secret: i64, now_ms: i64) -> Result<(), TokenError> {
    let (issued_str, hash) = token.split_once('.').ok_or(TokenError::Malformed)?;
    let issued_ms: i64 = issued_str.parse().map_err(|_| TokenError::Malformed)?;

    if token_hash(issued_ms, secret) != hash {
        return Err(TokenError::Forged);
    }

    let age = now_ms - issued_ms;
    if age > MAX_AGE_MS || age < -MAX_FUTURE_MS {
        return Err(TokenError::Stale);
    }

    Ok(())
}

fn token_hash(issued_ms: i64, secret: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}{}", issued_ms, secret).as_bytes());
    format!("{:x}", hasher.finalize())
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: i64 = 123_456_789;

    #[test]
    fn fresh_token_round_trips() {
        let token = mint_token(SECRET);
        assert!(validate_token(&token, SECRET).is_ok());
    }

    #[test]
    fn wrong_secret_is_forged() {
        let token = mint_token(SECRET);
        assert_eq!(validate_token(&token, SECRET + 1), Err(TokenError::Forged));
    }

    #[test]
    fn old_token_is_stale() {
        let now = 10_000_000_000;
        let token = mint_token_at(SECRET, now - MAX_AGE_MS - 1);
        assert_eq!(validate_token_at(&token, SECRET, now), Err(TokenError::Stale));
    }

    #[test]
    fn boundary_age_is_accepted() {
        let now = 10_000_000_000;
        let token = mint_token_at(SECRET, now - MAX_AGE_MS);
        assert!(validate_token_at(&token, SECRET, now).is_ok());
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(validate_token("", SECRET), Err(TokenError::Malformed));
        assert_eq!(validate_token("abc", SECRET), Err(TokenError::Malformed));
        assert_eq!(
            validate_token("notanumber.deadbeef", SECRET),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn tampered_timestamp_is_forged() {
        let token = mint_token_at(SECRET, 5_000);
        let (_, hash) = token.split_once('.').unwrap();
        let tampered = format!("{}.{}", 6_000, hash);
        assert_eq!(
            validate_token_at(&tampered, SECRET, 6_500),
            Err(TokenError::Forged)
        );
    }
}
