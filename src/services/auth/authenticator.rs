//! Request authentication: credential extraction → token parsing → claim assertion.
//!
//! Stages a request moves through:
//! `NoCredential → TokenFound → Verified → ContextEstablished`
//! A failure at any stage rejects the request; `AuthError::stage` tells where.
//!
//! This module is HTTP-framework agnostic apart from reading a `HeaderMap`;
//! the axum wiring lives in `middleware::auth::access`.

use axum::http::{HeaderMap, header};
use thiserror::Error;

use crate::services::auth::assertion::{AssertionError, AssertionPolicy};
use crate::services::auth::security_context::SecurityContext;
use crate::services::auth::token_parser::{ParseError, TokenParser};
use crate::services::cookies;

/// Cookie carrying the raw (optionally scheme-prefixed) token for browser clients.
pub const AUTHORIZATION_COOKIE: &str = "Authorization";

const BEARER_SCHEME: &str = "bearer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    NoCredential,
    TokenFound,
    Verified,
    ContextEstablished,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no credential in Authorization header or cookie")]
    MissingCredential,
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Assertion(#[from] AssertionError),
}

impl AuthError {
    /// Last stage reached before the rejection.
    pub fn stage(&self) -> AuthStage {
        match self {
            Self::MissingCredential => AuthStage::NoCredential,
            Self::Parse(_) => AuthStage::TokenFound,
            Self::Assertion(_) => AuthStage::Verified,
        }
    }
}

pub type AuthResult = Result<SecurityContext, AuthError>;

pub struct Authenticator {
    parser: TokenParser,
    policy: AssertionPolicy,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("parser", &self.parser)
            .field("policy", &self.policy)
            .finish()
    }
}

impl Authenticator {
    pub fn new(parser: TokenParser, policy: AssertionPolicy) -> Self {
        Self { parser, policy }
    }

    pub fn policy(&self) -> &AssertionPolicy {
        &self.policy
    }

    /// Authenticate a request from its headers.
    pub fn authenticate(&self, headers: &HeaderMap) -> AuthResult {
        let token = extract_token(headers).ok_or(AuthError::MissingCredential)?;
        self.authenticate_token(token)
    }

    /// Verify an already-extracted token and build the context.
    pub fn authenticate_token(&self, token: &str) -> AuthResult {
        let claims = self.parser.parse(token)?;
        self.policy.check(&claims)?;
        Ok(SecurityContext::from_claims(&claims))
    }
}

/// Find the candidate token: `Authorization` header first, then the `Authorization` cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(strip_scheme)
        .filter(|t| !t.is_empty())
        .or_else(|| {
            cookies::get(headers, AUTHORIZATION_COOKIE)
                .map(strip_scheme)
                .filter(|t| !t.is_empty())
        })
}

// Accepts `Bearer <t>` and the form-encoded `Bearer+<t>`; anything else is taken as the raw token.
fn strip_scheme(value: &str) -> &str {
    let value = value.trim();
    let Some(scheme) = value.get(..BEARER_SCHEME.len()) else {
        return value;
    };
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return value;
    }

    let rest = &value[BEARER_SCHEME.len()..];
    if rest.is_empty() {
        return rest;
    }
    rest.strip_prefix('+')
        .or_else(|| rest.strip_prefix(' '))
        .map(str::trim_start)
        .unwrap_or(value)
}
