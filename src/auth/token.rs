use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::Token;

const ARGON2_MEMORY: u32 = 64 * 1024; // 64KB
const ARGON2_ITERATIONS: u32 = 1;
const ARGON2_PARALLELISM: u32 = 4;
const ARGON2_OUTPUT_LEN: usize = 32;

const TOKEN_PREFIX: &str = "stockroom";
const LOOKUP_LENGTH: usize = 8;
const SECRET_BYTES: usize = 12;
const SECRET_LENGTH: usize = SECRET_BYTES * 2;

/// Issues and verifies bearer tokens of the form `stockroom_<lookup>_<secret>`.
pub struct TokenGenerator {
    argon2: Argon2<'static>,
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenGenerator {
    #[must_use]
    pub fn new() -> Self {
        // Constant parameters within argon2's documented bounds.
        let params = Params::new(
            ARGON2_MEMORY,
            ARGON2_ITERATIONS,
            ARGON2_PARALLELISM,
            Some(ARGON2_OUTPUT_LEN),
        )
        .unwrap_or_default();

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Creates a token record for `user_id` and returns it with the raw secret.
    /// The raw string is never stored.
    pub fn issue(&self, user_id: i64, expires_in: Option<Duration>) -> Result<(Token, String)> {
        let lookup = generate_lookup();
        let raw_token = build_token(&lookup, &generate_secret());
        let now = Utc::now();

        let token = Token {
            id: Uuid::new_v4().to_string(),
            token_hash: self.hash(&raw_token)?,
            token_lookup: lookup,
            user_id,
            created_at: now,
            expires_at: expires_in.map(|d| now + d),
            last_used_at: None,
        };

        Ok((token, raw_token))
    }

    /// Hashes a raw token using Argon2id
    pub fn hash(&self, token: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(token.as_bytes(), &salt)
            .map_err(|e| Error::Config(format!("failed to hash token: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verifies a raw token against a stored hash
    pub fn verify(&self, token: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| Error::Config(format!("invalid hash format: {e}")))?;

        match self.argon2.verify_password(token.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::Config(format!("failed to verify token: {e}"))),
        }
    }
}

fn generate_lookup() -> String {
    Uuid::new_v4().simple().to_string()[..LOOKUP_LENGTH].to_string()
}

fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::thread_rng().fill(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn build_token(lookup: &str, secret: &str) -> String {
    format!("{TOKEN_PREFIX}_{lookup}_{secret}")
}

/// Splits a raw token into its (lookup, secret) parts.
pub fn parse_token(token: &str) -> Result<(String, String)> {
    let rest = token
        .strip_prefix(TOKEN_PREFIX)
        .and_then(|r| r.strip_prefix('_'))
        .ok_or(Error::InvalidTokenFormat)?;

    let (lookup, secret) = rest.split_once('_').ok_or(Error::InvalidTokenFormat)?;

    if lookup.len() != LOOKUP_LENGTH || secret.len() != SECRET_LENGTH || secret.contains('_') {
        return Err(Error::InvalidTokenFormat);
    }

    Ok((lookup.to_string(), secret.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_token_format() {
        let generator = TokenGenerator::new();
        let (token, raw) = generator.issue(111, None).unwrap();

        assert!(raw.starts_with("stockroom_"));
        assert_eq!(token.user_id, 111);
        assert_eq!(token.token_lookup.len(), 8);
        assert!(token.expires_at.is_none());

        let (lookup, secret) = parse_token(&raw).unwrap();
        assert_eq!(lookup, token.token_lookup);
        assert_eq!(secret.len(), 24);
    }

    #[test]
    fn test_issue_with_expiry() {
        let generator = TokenGenerator::new();
        let (token, _) = generator.issue(111, Some(Duration::days(7))).unwrap();

        let expires_at = token.expires_at.unwrap();
        assert!(expires_at > token.created_at);
    }

    #[test]
    fn test_token_verification() {
        let generator = TokenGenerator::new();
        let (token, raw) = generator.issue(111, None).unwrap();

        assert!(generator.verify(&raw, &token.token_hash).unwrap());

        let wrong = format!("{}00000", &raw[..raw.len() - 5]);
        assert!(!generator.verify(&wrong, &token.token_hash).unwrap());
    }

    #[test]
    fn test_parse_token_rejects_malformed() {
        assert!(parse_token("stockroom_12345678_123456789012345678901234").is_ok());
        assert!(parse_token("cutlery_12345678_123456789012345678901234").is_err());
        assert!(parse_token("stockroom_12345678").is_err());
        assert!(parse_token("stockroom_1234_123456789012345678901234").is_err());
    }

    #[test]
    fn test_hash_is_phc_format() {
        let generator = TokenGenerator::new();
        let (token, _) = generator.issue(1, None).unwrap();

        assert!(token.token_hash.starts_with("$argon2id$"));
    }
}
