//! CSRF double-submit protection.
//!
//! - Safe methods (GET/HEAD/OPTIONS/TRACE) always proceed. An authenticated request
//!   without an `XSRF-TOKEN` cookie gets a fresh token issued as a response cookie.
//! - Every other method must echo the cookie value in the `X-XSRF-TOKEN` header.
//!
//! Tokens are not single-use: the same cookie/header pair is accepted until the
//! browser drops the cookie.

use std::fmt;

use axum::http::{HeaderMap, HeaderValue, Method, header::InvalidHeaderValue};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::services::auth::SecurityContext;
use crate::services::cookies;

pub const CSRF_COOKIE: &str = "XSRF-TOKEN";
pub const CSRF_HEADER: &str = "x-xsrf-token";

// 32 bytes = 256 bits of entropy
const TOKEN_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum CsrfError {
    #[error("csrf token missing from header or cookie")]
    CsrfTokenMissing,
    #[error("csrf header does not match cookie")]
    CsrfTokenMismatch,
    #[error("random source unavailable: {0}")]
    RandomSource(getrandom::Error),
    #[error("csrf cookie is not a valid header value")]
    InvalidCookie(#[from] InvalidHeaderValue),
}

#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken(String);

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CsrfToken(..)")
    }
}

impl CsrfToken {
    pub fn generate() -> Result<Self, CsrfError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        getrandom::fill(&mut bytes).map_err(CsrfError::RandomSource)?;
        Ok(Self(URL_SAFE_NO_PAD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsrfOutcome {
    Proceed,
    IssueCookie(CsrfToken),
}

pub type CsrfResult = Result<CsrfOutcome, CsrfError>;

#[derive(Debug, Clone)]
pub struct CsrfProtection {
    secure_cookie: bool,
}

impl CsrfProtection {
    /// `secure_cookie` adds the `Secure` attribute (production over HTTPS).
    pub fn new(secure_cookie: bool) -> Self {
        Self { secure_cookie }
    }

    pub fn protect(
        &self,
        method: &Method,
        headers: &HeaderMap,
        ctx: &SecurityContext,
    ) -> CsrfResult {
        let cookie = cookies::get(headers, CSRF_COOKIE).filter(|v| !v.is_empty());

        if is_safe_method(method) {
            if ctx.is_authenticated() && cookie.is_none() {
                return CsrfToken::generate().map(CsrfOutcome::IssueCookie);
            }
            return Ok(CsrfOutcome::Proceed);
        }

        let header = headers
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(CsrfError::CsrfTokenMissing)?;
        let cookie = cookie.ok_or(CsrfError::CsrfTokenMissing)?;

        if bool::from(header.as_bytes().ct_eq(cookie.as_bytes())) {
            Ok(CsrfOutcome::Proceed)
        } else {
            Err(CsrfError::CsrfTokenMismatch)
        }
    }

    /// `Set-Cookie` value for a freshly issued token.
    ///
    /// Not `HttpOnly`: browser script has to read it to echo the header.
    pub fn set_cookie(&self, token: &CsrfToken) -> Result<HeaderValue, CsrfError> {
        let mut cookie = format!("{CSRF_COOKIE}={}; Path=/; SameSite=Lax", token.as_str());
        if self.secure_cookie {
            cookie.push_str("; Secure");
        }
        Ok(HeaderValue::from_str(&cookie)?)
    }
}

fn is_safe_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}
