use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    application::dto::{
        CreateUserRequest, HealthResponse, SearchUsersQuery, SearchUsersResponse, UserResponse,
    },
    interface::http::problem::{ApiProblem, ApiResult},
    state::AppState,
};

pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Owns the unit of work around the create use case: begin before the call,
/// commit on success, rollback on any use-case error. A rollback failure
/// supersedes the original error in the response; a commit failure surfaces
/// as an internal error even though the use case itself succeeded.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let mut tx = state
        .session
        .begin()
        .await
        .map_err(ApiProblem::from_domain)?;

    match state.user_service.create_user(&mut tx, request).await {
        Ok(created) => {
            state
                .session
                .commit(tx)
                .await
                .map_err(ApiProblem::from_domain)?;
            Ok((StatusCode::CREATED, Json(created)))
        }
        Err(err) => {
            state
                .session
                .rollback(tx)
                .await
                .map_err(ApiProblem::from_domain)?;
            Err(ApiProblem::from_domain(err))
        }
    }
}

pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchUsersQuery>,
) -> ApiResult<Json<SearchUsersResponse>> {
    let found = state
        .user_service
        .search_users(query)
        .await
        .map_err(ApiProblem::from_domain)?;

    Ok(Json(found))
}
