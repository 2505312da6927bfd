//! Bearer token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::api::AppState;
use crate::errors::AppError;

/// Authenticates the request's `Authorization` header and injects the
/// resulting context into the request extensions. No store access happens
/// here; the context resolves its user lazily if a handler asks for it.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let context = state.auth_facade.authenticate_bearer_header(header).await?;

    request.extensions_mut().insert(Arc::new(context));

    Ok(next.run(request).await)
}
