//! JSON API mirroring the dashboard operations.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use roster_core::{NewUser, User, UserId};
use tracing::instrument;

use super::dashboard::SearchQuery;
use crate::error::{AppError, Result};
use crate::state::{AppState, LoadStatus};

/// Search users.
///
/// GET /api/users?q=
///
/// Returns 503 while the store has never been loaded successfully.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<User>>> {
    match state.status().await {
        LoadStatus::Ready => {}
        LoadStatus::Loading => {
            return Err(AppError::Unavailable("Users are still loading".to_string()));
        }
        LoadStatus::Failed(message) => return Err(AppError::Unavailable(message)),
    }

    let users = state
        .search(&query.q)
        .await
        .into_iter()
        .map(|listed| listed.user)
        .collect();
    Ok(Json(users))
}

/// Look up one user (store first, then the remote source).
///
/// GET /api/users/{id}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<UserId>) -> Result<Json<User>> {
    let lookup = state.find(id).await?;
    Ok(Json(lookup.into_user()))
}

/// Add a user.
///
/// POST /api/users
#[instrument(skip(state, candidate), fields(username = %candidate.username))]
pub async fn create(
    State(state): State<AppState>,
    Json(candidate): Json<NewUser>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state.add(&candidate).await.map_err(AppError::Validation)?;
    Ok((StatusCode::CREATED, Json(user)))
}
