//! CSRF filter (double-submit cookie).
//!
//! Runs after the authentication filter: it reads the `SecurityContext` from the
//! request extensions to decide whether a safe request should be handed a new
//! `XSRF-TOKEN` cookie.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::SecurityContext;
use crate::services::csrf::CsrfOutcome;
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, csrf_middleware))
}

async fn csrf_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let anonymous = SecurityContext::anonymous();
    let ctx = req
        .extensions()
        .get::<SecurityContext>()
        .unwrap_or(&anonymous);

    let outcome = state
        .csrf
        .protect(req.method(), req.headers(), ctx)
        .map_err(|err| {
            tracing::warn!(
                error = %err,
                method = %req.method(),
                path = %req.uri().path(),
                "csrf check failed"
            );
            AppError::from(err)
        })?;

    // Encoded before the handler runs; nothing can fail once it has produced a response.
    let cookie = match &outcome {
        CsrfOutcome::IssueCookie(token) => Some(state.csrf.set_cookie(token)?),
        CsrfOutcome::Proceed => None,
    };

    let mut response = next.run(req).await;

    if let Some(cookie) = cookie {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    Ok(response)
}
