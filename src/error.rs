/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - 認証・CSRF の内部エラーは client に出さない (ログにのみ残す)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::csrf::CsrfError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("forbidden")]
    Forbidden,
    #[error("csrf token mismatch")]
    CsrfTokenMismatch,
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN_REQUEST",
                "Permission denied for the resource.",
            ),
            AppError::CsrfTokenMismatch => (
                StatusCode::FORBIDDEN,
                "CSRF_TOKEN_MISMATCH",
                "Invalid or missing CSRF token.",
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "Internal server error.",
            ),
        };

        (status, Json(ErrorResponse { code, message })).into_response()
    }
}

// Every authentication failure looks the same to the client.
impl From<AuthError> for AppError {
    fn from(_: AuthError) -> Self {
        AppError::Forbidden
    }
}

impl From<CsrfError> for AppError {
    fn from(e: CsrfError) -> Self {
        match e {
            CsrfError::CsrfTokenMissing | CsrfError::CsrfTokenMismatch => {
                AppError::CsrfTokenMismatch
            }
            CsrfError::RandomSource(_) | CsrfError::InvalidCookie(_) => AppError::Internal,
        }
    }
}
