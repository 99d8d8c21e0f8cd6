//! Token minting helpers shared by the unit tests.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

use crate::services::auth::key_loader::{PublicKey, load_public_key};
use crate::services::auth::token_parser::TokenParser;

pub const PRIVATE_KEY_PEM: &[u8] = include_bytes!("../../../tests/fixtures/private_key.pem");
pub const OTHER_PRIVATE_KEY_PEM: &[u8] =
    include_bytes!("../../../tests/fixtures/other_private_key.pem");

pub fn rsa_public_key() -> PublicKey {
    load_public_key(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/public_key.der"
    ))
    .unwrap()
}

pub fn rsa_parser() -> TokenParser {
    TokenParser::new(rsa_public_key(), None, 0)
}

pub fn chumbok_claims() -> Value {
    let now = Utc::now().timestamp();
    json!({
        "sub": "admin",
        "org": "Chumbok",
        "tenant": "Chumbok",
        "scopes": ["ROLE_SUPERADMIN"],
        "iss": "Chumbok",
        "iat": now,
        "exp": now + 3600,
    })
}

pub fn mint(claims: &Value) -> String {
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM).unwrap();
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), claims, &key).unwrap()
}

/// Flip one byte in the middle of the signature, keeping the segment valid base64url.
pub fn tamper_signature(token: &str) -> String {
    let (signed, signature) = token.rsplit_once('.').unwrap();
    let mut raw = URL_SAFE_NO_PAD.decode(signature).unwrap();
    let mid = raw.len() / 2;
    raw[mid] ^= 0x01;
    format!("{signed}.{}", URL_SAFE_NO_PAD.encode(raw))
}
