/*
 * Responsibility
 * - GET /authentication : 現在の SecurityContext を JSON で返す
 */
use axum::Json;

use crate::api::dto::authentication::AuthenticationResponse;
use crate::api::extractors::SecurityContextExtractor;

pub async fn authentication(
    SecurityContextExtractor(ctx): SecurityContextExtractor,
) -> Json<AuthenticationResponse> {
    Json(AuthenticationResponse::from(&ctx))
}
