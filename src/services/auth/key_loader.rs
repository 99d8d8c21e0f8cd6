//! Public key loading for access-token verification.
//!
//! The verifier key is read once at startup and shared read-only afterwards.
//! Accepted encodings:
//! - DER `SubjectPublicKeyInfo` (what `openssl pkey -pubout -outform DER` writes)
//! - PEM `-----BEGIN PUBLIC KEY-----`
//!
//! The key family (RSA / EC / Ed25519) is detected from the encoding and decides
//! which JWS algorithms the token parser will accept.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use jsonwebtoken::{Algorithm, DecodingKey};
use thiserror::Error;

const PEM_PREFIX: &[u8] = b"-----BEGIN";

#[derive(Debug, Error)]
pub enum KeyLoadError {
    #[error("failed to read public key file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unsupported or malformed public key in {}", path.display())]
    InvalidKey { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    Rsa,
    Ec,
    Ed25519,
}

impl KeyFamily {
    /// Signing algorithms a key of this family can verify.
    pub fn algorithms(self) -> &'static [Algorithm] {
        match self {
            Self::Rsa => &[
                Algorithm::RS256,
                Algorithm::RS384,
                Algorithm::RS512,
                Algorithm::PS256,
                Algorithm::PS384,
                Algorithm::PS512,
            ],
            Self::Ec => &[Algorithm::ES256, Algorithm::ES384],
            Self::Ed25519 => &[Algorithm::EdDSA],
        }
    }
}

/// Verifier key handle.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct PublicKey {
    decoding_key: DecodingKey,
    family: KeyFamily,
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl PublicKey {
    /// Parse a DER-encoded `SubjectPublicKeyInfo`.
    pub fn from_der(der: &[u8]) -> Option<Self> {
        if der.is_empty() {
            return None;
        }
        Self::from_pem(der_to_pem(der).as_bytes())
    }

    /// Parse a PEM `PUBLIC KEY` block, trying each supported family in turn.
    pub fn from_pem(pem: &[u8]) -> Option<Self> {
        if let Ok(decoding_key) = DecodingKey::from_rsa_pem(pem) {
            return Some(Self::new(decoding_key, KeyFamily::Rsa));
        }
        if let Ok(decoding_key) = DecodingKey::from_ec_pem(pem) {
            return Some(Self::new(decoding_key, KeyFamily::Ec));
        }
        if let Ok(decoding_key) = DecodingKey::from_ed_pem(pem) {
            return Some(Self::new(decoding_key, KeyFamily::Ed25519));
        }
        None
    }

    fn new(decoding_key: DecodingKey, family: KeyFamily) -> Self {
        Self {
            decoding_key,
            family,
        }
    }

    pub fn family(&self) -> KeyFamily {
        self.family
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

/// Load the verifier key from `path`. Called once during startup; failure is fatal.
pub fn load_public_key(path: impl AsRef<Path>) -> Result<PublicKey, KeyLoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| KeyLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let key = if bytes.trim_ascii_start().starts_with(PEM_PREFIX) {
        PublicKey::from_pem(&bytes)
    } else {
        PublicKey::from_der(&bytes)
    };

    let key = key.ok_or_else(|| KeyLoadError::InvalidKey {
        path: path.to_path_buf(),
    })?;

    tracing::info!(path = %path.display(), family = ?key.family(), "loaded token verification key");
    Ok(key)
}

fn der_to_pem(der: &[u8]) -> String {
    let body = STANDARD.encode(der);
    let mut pem = String::with_capacity(body.len() + body.len() / 64 + 64);
    pem.push_str("-----BEGIN PUBLIC KEY-----\n");
    // base64 output is ASCII, so byte chunks are valid str slices
    for line in body.as_bytes().chunks(64) {
        pem.push_str(std::str::from_utf8(line).unwrap_or_default());
        pem.push('\n');
    }
    pem.push_str("-----END PUBLIC KEY-----\n");
    pem
}
