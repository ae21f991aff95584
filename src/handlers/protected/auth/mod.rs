use axum::Extension;

use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/auth/whoami - identity carried by the caller's token
pub async fn whoami_get(Extension(principal): Extension<Principal>) -> ApiResult<Principal> {
    Ok(ApiResponse::success(principal))
}
