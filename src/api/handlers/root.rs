/*
 * Responsibility
 * - GET / , POST / : 認証済みであれば何もせず 200
 * - filter chain (auth → csrf) の疎通確認用
 */
use axum::http::StatusCode;

pub async fn ping() -> StatusCode {
    StatusCode::OK
}

pub async fn post_something() -> StatusCode {
    StatusCode::OK
}
