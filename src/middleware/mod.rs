/*
 * Responsibility
 * - middleware の公開インターフェース
 * - 実行順: http → cors → security_headers → auth::access → csrf → handler
 */
pub mod auth;
pub mod cors;
pub mod csrf;
pub mod http;
pub mod security_headers;
