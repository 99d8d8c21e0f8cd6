/*
 * Responsibility
 * - 認証が必要な route の URL 構造を定義
 * - /health は認証の外側 (app.rs) で登録する
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::handlers::{
    authentication::authentication,
    root::{ping, post_something},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(ping).post(post_something))
        .route("/authentication", get(authentication))
}
