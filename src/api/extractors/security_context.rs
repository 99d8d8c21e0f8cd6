use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::services::auth::SecurityContext;

/// Handler で SecurityContext を受け取るための extractor
///
/// auth middleware が insert 済みであれば、それを返す。
/// 見つからない場合 (middleware の外側の route など) は anonymous を返す。
/// どの route が anonymous を許すかの判断は handler 側の責務。
pub struct SecurityContextExtractor(pub SecurityContext);

impl<S> FromRequestParts<S> for SecurityContextExtractor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(SecurityContextExtractor(
            parts
                .extensions
                .get::<SecurityContext>()
                .cloned()
                .unwrap_or_default(),
        ))
    }
}
