//! Authentication filter: token 検証 → SecurityContext を extensions に入れる
//!
//! - `Authorization` header (`Bearer+<jwt>` / `Bearer <jwt>`) または `Authorization` cookie から token を取得
//! - 署名検証 + exp、org/tenant の assertion は `Authenticator` 側で実施
//! - 失敗時は 403 `FORBIDDEN_REQUEST`。失敗理由はログにのみ出し、client には返さない
//!
//! `SECURITY_ENABLE=false` の場合は permissive mode:
//! token が無い/不正でも anonymous の SecurityContext で次へ進む。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{AuthStage, SecurityContext};
use crate::state::AppState;

/// Router 全体に認証を掛けるための middleware を適用する。
///
/// CSRF layer より外側 (先に実行される側) に置くこと：
/// ```ignore
/// let router = middleware::csrf::apply(router, state.clone());
/// let router = middleware::auth::access::apply(router, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = match state.auth.authenticate(req.headers()) {
        Ok(ctx) => ctx,
        Err(err) if !state.auth.policy().enabled => {
            tracing::debug!(
                error = %err,
                stage = ?err.stage(),
                "security disabled, continuing as anonymous"
            );
            SecurityContext::anonymous()
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                stage = ?err.stage(),
                method = %req.method(),
                path = %req.uri().path(),
                "authentication rejected"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(
        principal = %ctx.principal(),
        authenticated = ctx.is_authenticated(),
        stage = ?AuthStage::ContextEstablished,
        "security context established"
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
