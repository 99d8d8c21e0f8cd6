//! Signed access-token verification.
//!
//! `TokenParser::parse` is the only entry-point: it checks the JWS structure,
//! the algorithm named in the header, the signature, and the time claims, then
//! returns the typed `Claims`. No I/O happens here; the key is preloaded.

use std::str::FromStr;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;

use crate::services::auth::key_loader::PublicKey;

/// Claims carried by an access token.
///
/// Wire names follow the issuer: `sub`, `org`, `tenant`, `scopes`, `iss`, `iat`, `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub subject: String,
    #[serde(rename = "org")]
    pub organization: String,
    pub tenant: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(rename = "iss")]
    pub issuer: String,
    #[serde(rename = "iat", default, with = "chrono::serde::ts_seconds_option")]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("token is not a compact JWS")]
    MalformedToken,
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("signature verification failed")]
    InvalidSignature,
    #[error("malformed claims: {0}")]
    MalformedClaims(jsonwebtoken::errors::Error),
    #[error("token expired")]
    TokenExpired,
    #[error("unexpected issuer")]
    InvalidIssuer,
}

impl ParseError {
    fn from_jwt(err: jsonwebtoken::errors::Error, alg: &str) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            ErrorKind::InvalidAlgorithm => Self::UnsupportedAlgorithm(alg.to_string()),
            ErrorKind::InvalidIssuer => Self::InvalidIssuer,
            ErrorKind::InvalidToken => Self::MalformedToken,
            _ => Self::MalformedClaims(err),
        }
    }
}

/// Upper bound on the tolerated clock skew; larger values are clamped.
pub const MAX_LEEWAY_SECONDS: u64 = 3600;

#[derive(Deserialize)]
struct TokenHeader {
    alg: String,
}

/// Stateless verifier. Cheap to share behind `Arc`; safe to call from any thread.
#[derive(Clone)]
pub struct TokenParser {
    key: PublicKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenParser")
            .field("key", &self.key)
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenParser {
    /// - `expected_issuer`: when set, `iss` must match exactly.
    /// - `leeway_seconds`: clock skew tolerated on `exp`, at most `MAX_LEEWAY_SECONDS`.
    pub fn new(key: PublicKey, expected_issuer: Option<&str>, leeway_seconds: u64) -> Self {
        // jsonwebtoken subtracts the leeway from the current epoch second as u64
        let leeway_seconds = leeway_seconds.min(MAX_LEEWAY_SECONDS);
        let algorithms = key.family().algorithms();

        let mut validation = Validation::new(algorithms[0]);
        validation.algorithms = algorithms.to_vec();
        validation.leeway = leeway_seconds;
        validation.validate_exp = true;
        validation.validate_aud = false;

        match expected_issuer {
            Some(issuer) => {
                validation.set_issuer(&[issuer]);
                validation.set_required_spec_claims(&["exp", "iss"]);
            }
            None => validation.set_required_spec_claims(&["exp"]),
        }

        Self { key, validation }
    }

    pub fn parse(&self, token: &str) -> Result<Claims, ParseError> {
        let header = decode_header(token)?;

        let alg = Algorithm::from_str(&header.alg)
            .map_err(|_| ParseError::UnsupportedAlgorithm(header.alg.clone()))?;
        if !self.validation.algorithms.contains(&alg) {
            return Err(ParseError::UnsupportedAlgorithm(header.alg));
        }

        let data =
            jsonwebtoken::decode::<Claims>(token, self.key.decoding_key(), &self.validation)
                .map_err(|e| ParseError::from_jwt(e, &header.alg))?;

        // jsonwebtoken only rejects `exp < now - leeway`; a token is already dead at `exp == now`.
        let cutoff = Utc::now().timestamp() - self.validation.leeway as i64;
        if data.claims.expires_at.timestamp() <= cutoff {
            return Err(ParseError::TokenExpired);
        }

        Ok(data.claims)
    }
}

// Split into exactly three segments and read `alg` from the first one.
fn decode_header(token: &str) -> Result<TokenHeader, ParseError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(ParseError::MalformedToken);
    };

    let raw = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| ParseError::MalformedToken)?;
    serde_json::from_slice(&raw).map_err(|_| ParseError::MalformedToken)
}
