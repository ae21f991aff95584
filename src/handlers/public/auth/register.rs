// handlers/public/auth/register.rs - POST /auth/register handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::RegisterInput;
use crate::state::AppState;

/// Create a company together with its admin user. Answers 201 with the user.
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> ApiResult<User> {
    let Json(input) = payload?;
    let user = state.accounts.register(input).await?;
    Ok(ApiResponse::created(user))
}
