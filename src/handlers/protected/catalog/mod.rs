// handlers/protected/catalog/mod.rs - CRUD for tenant-scoped catalog entities
//
// One generic handler set serves categories, add-ons, order types and outlets.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::Principal;
use crate::database::models::{TenantScoped, TenantWritable};
use crate::error::ApiError;
use crate::filter::{PageMeta, PageQuery, PageRequest};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: Uuid,
    pub deleted: bool,
}

/// GET /api/<entity> - one page, newest first unless `sort_by`/`sort_order` say otherwise
pub async fn list<T: TenantScoped>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Vec<T>> {
    let company_id = principal.company_id()?;
    let Query(raw) = query?;
    let request = PageRequest::from(raw);

    let page = state.repository::<T>().list_paged(company_id, &request).await?;
    let meta = PageMeta::new(page.total, &request);
    Ok(ApiResponse::paginated(page.items, meta))
}

/// GET /api/<entity>/:id
pub async fn show<T: TenantScoped>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<T> {
    let company_id = principal.company_id()?;
    let id = parse_id(&id)?;
    let item = state.repository::<T>().find(company_id, id).await?;
    Ok(ApiResponse::success(item))
}

/// POST /api/<entity>
pub async fn create<T: TenantWritable>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<T::Input>, JsonRejection>,
) -> ApiResult<T> {
    let company_id = principal.company_id()?;
    let Json(input) = payload?;
    T::validate(&input)?;

    let item = state.repository::<T>().create(company_id, &input).await?;
    info!("Created {} row for company {}", T::TABLE, company_id);
    Ok(ApiResponse::created(item))
}

/// PUT /api/<entity>/:id - full replace
pub async fn update<T: TenantWritable>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Result<Json<T::Input>, JsonRejection>,
) -> ApiResult<T> {
    let company_id = principal.company_id()?;
    let id = parse_id(&id)?;
    let Json(input) = payload?;
    T::validate(&input)?;

    let item = state.repository::<T>().update(company_id, id, &input).await?;
    Ok(ApiResponse::success(item))
}

/// DELETE /api/<entity>/:id
pub async fn destroy<T: TenantScoped>(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    let company_id = principal.company_id()?;
    let id = parse_id(&id)?;
    state.repository::<T>().delete(company_id, id).await?;
    info!("Deleted {} row {} for company {}", T::TABLE, id, company_id);
    Ok(ApiResponse::success(Deleted { id, deleted: true }))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("invalid UUID"))
}
