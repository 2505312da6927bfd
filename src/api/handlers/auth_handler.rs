//! Authentication endpoints.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::TOKEN_TYPE_BEARER;
use crate::errors::AppResult;

/// Login request payload.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Issued token envelope.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Authentication routes.
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/", post(login))
}

/// POST /auth - exchange credentials for a bearer token.
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let context = state
        .auth_facade
        .authenticate(&payload.email, &payload.password)
        .await?;

    let access_token = state.auth_facade.generate_token(&context)?;

    tracing::info!(user_id = context.user_id(), "user logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: TOKEN_TYPE_BEARER,
        expires_in: state.auth_facade.token_ttl_seconds(),
    }))
}
