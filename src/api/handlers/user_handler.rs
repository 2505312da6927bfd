//! User endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::auth_middleware;
use crate::api::AppState;
use crate::domain::{CreateUser, UpdateUser, UserResponse};
use crate::errors::AppResult;
use crate::services::auth::{AuthenticationContext, AuthorizationCheck, IsSelf};
use crate::types::{PaginatedResponse, PaginationParams};

/// User routes. Registration is public; everything else sits behind the
/// bearer middleware.
pub fn user_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(list_users))
        .route(
            "/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route_layer(axum::middleware::from_fn_with_state(state, auth_middleware));

    Router::new().route("/", post(create_user)).merge(protected)
}

/// POST /users - register a user.
async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUser>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.user_service.create(&payload).await?;

    tracing::info!(user_id = user.id, "user registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /users - one page of users.
async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PaginatedResponse<UserResponse>>> {
    let page = params.page_number();
    let per_page = params.page_size();

    let users = state.user_service.list_page(per_page, page).await?;
    let total = state.user_service.count().await?;

    Ok(Json(PaginatedResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
        page,
        per_page,
        total,
    }))
}

/// GET /users/:id
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// PATCH /users/:id - callers may only patch themselves.
async fn update_user(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthenticationContext>>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    IsSelf { user_id: id }.check(&context).await?;

    let user = state.user_service.update(id, &payload).await?;
    Ok(Json(UserResponse::from(user)))
}

/// DELETE /users/:id - callers may only delete themselves.
async fn delete_user(
    State(state): State<AppState>,
    Extension(context): Extension<Arc<AuthenticationContext>>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserResponse>> {
    IsSelf { user_id: id }.check(&context).await?;

    let user = state.user_service.delete(id).await?;

    tracing::info!(user_id = id, "user deleted");

    Ok(Json(UserResponse::from(user)))
}
