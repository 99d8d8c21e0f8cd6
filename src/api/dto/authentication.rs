/*
 * Responsibility
 * - GET /authentication の response DTO
 */
use serde::Serialize;

use crate::services::auth::SecurityContext;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    pub principal: String,
    pub is_authenticated: bool,
    pub authorities: Vec<String>,
}

impl From<&SecurityContext> for AuthenticationResponse {
    fn from(ctx: &SecurityContext) -> Self {
        Self {
            principal: ctx.principal().to_string(),
            is_authenticated: ctx.is_authenticated(),
            authorities: ctx.authorities().to_vec(),
        }
    }
}
