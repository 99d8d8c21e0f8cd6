#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::Response,
};
use chrono::Utc;
use chumbok_security::{
    app,
    config::{AppEnv, Config},
};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

pub const PRIVATE_KEY_PEM: &[u8] = include_bytes!("../fixtures/private_key.pem");
pub const OTHER_PRIVATE_KEY_PEM: &[u8] = include_bytes!("../fixtures/other_private_key.pem");

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Same settings the Chumbok deployment uses: org and tenant both pinned.
pub fn chumbok_config() -> Config {
    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        app_env: AppEnv::Development,
        cors_allowed_origins: Vec::new(),
        security_enable: true,
        assert_org_with: Some("Chumbok".to_string()),
        assert_tenant: true,
        assert_tenant_with: Some("Chumbok".to_string()),
        public_key_path: fixture("public_key.der"),
        auth_issuer: None,
        access_token_leeway_seconds: 0,
    }
}

pub fn router(config: &Config) -> Router {
    let state = app::build_state(config).expect("fixture key loads");
    app::build_router(state, config)
}

pub fn claims() -> Value {
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

pub fn sign_with(claims: &Value, private_key_pem: &[u8]) -> String {
    let key = EncodingKey::from_rsa_pem(private_key_pem).unwrap();
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), claims, &key).unwrap()
}

pub fn sign(claims: &Value) -> String {
    sign_with(claims, PRIVATE_KEY_PEM)
}

pub fn valid_token() -> String {
    sign(&claims())
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Value of the `XSRF-TOKEN` cookie set on the response, if any.
pub fn xsrf_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| v.strip_prefix("XSRF-TOKEN="))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
}
