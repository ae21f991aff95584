// handlers/public/auth/login.rs - POST /auth/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AuthSession, LoginInput};
use crate::state::AppState;

/// Exchange email and password for a bearer token.
///
/// Unknown email and wrong password both answer 401 "invalid email or password".
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> ApiResult<AuthSession> {
    let Json(input) = payload?;
    let session = state.accounts.login(input).await?;
    Ok(ApiResponse::success(session))
}
