use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, types::DashboardDto};
use crate::clients::tmdb::{TmdbDetails, TmdbSearchItem};
use crate::db::{AdSettings, VALID_STATUSES};
use crate::models::content::{Content, ContentKind};
use crate::services::ContentPayload;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BulkDeletePayload {
    #[serde(default)]
    pub ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestStatusPayload {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbSearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbDetailsQuery {
    pub id: String,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LiveSearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// "tv" is accepted as an alias so TMDB search results can be fed straight
/// back into the details endpoints.
fn parse_kind(raw: Option<&str>) -> ContentKind {
    match raw {
        Some("tv" | "series") => ContentKind::Series,
        _ => ContentKind::Movie,
    }
}

/// A non-numeric id segment is indistinguishable from an absent record.
fn parse_id(raw: &str, resource: &str) -> Result<i32, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(resource, raw))
}

/// Everything the content manager screen needs in one payload.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DashboardDto>>, ApiError> {
    let stats = state.store.catalog_stats().await?;
    let content = state
        .store
        .find_content(&crate::db::ContentFilter::default(), 0, u64::from(u32::MAX))
        .await?;
    let requests = state.store.list_requests().await?;
    let categories = state.store.list_categories().await?;
    let ads = state.store.get_ad_settings().await?;

    Ok(Json(ApiResponse::success(DashboardDto {
        stats,
        content,
        requests,
        categories,
        ads,
    })))
}

pub async fn create_content(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ContentPayload>,
) -> Result<Json<ApiResponse<Content>>, ApiError> {
    let created = state.admin.create(&payload).await?;
    tracing::info!("Content created: {} (id {})", created.title, created.id);
    Ok(Json(ApiResponse::success(created)))
}

pub async fn update_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<ContentPayload>,
) -> Result<Json<ApiResponse<Content>>, ApiError> {
    let id = parse_id(&id, "Content")?;

    let updated = state.admin.update(id, &payload).await?;
    Ok(Json(ApiResponse::success(updated)))
}

pub async fn delete_content(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id, "Content")?;
    state.admin.delete(id).await?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn bulk_delete_content(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BulkDeletePayload>,
) -> Result<Json<ApiResponse<u64>>, ApiError> {
    let removed = state.admin.bulk_delete(&payload.ids).await?;
    tracing::info!("Bulk delete removed {} records", removed);
    Ok(Json(ApiResponse::success(removed)))
}

pub async fn add_category(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Category name must not be empty"));
    }

    state.store.upsert_category(name).await?;
    Ok(Json(ApiResponse::success(())))
}

/// Removes the category itself. References from content records are left in
/// place and simply stop matching.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id, "Category")?;
    if !state.store.remove_category(id).await? {
        return Err(ApiError::not_found("Category", id));
    }
    Ok(Json(ApiResponse::success(())))
}

pub async fn update_ads(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<AdSettings>,
) -> Result<Json<ApiResponse<AdSettings>>, ApiError> {
    state.store.update_ad_settings(&settings).await?;
    Ok(Json(ApiResponse::success(settings)))
}

pub async fn update_request_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<RequestStatusPayload>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id, "Request")?;
    if !VALID_STATUSES.contains(&payload.status.as_str()) {
        return Err(ApiError::validation(format!(
            "Invalid status '{}'",
            payload.status
        )));
    }

    if !state.store.set_request_status(id, &payload.status).await? {
        return Err(ApiError::not_found("Request", id));
    }
    Ok(Json(ApiResponse::success(())))
}

pub async fn delete_request(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_id(&id, "Request")?;
    if !state.store.remove_request(id).await? {
        return Err(ApiError::not_found("Request", id));
    }
    Ok(Json(ApiResponse::success(())))
}

/// Proxied TMDB multi-search for the content form's lookup box.
pub async fn tmdb_search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TmdbSearchQuery>,
) -> Result<Json<ApiResponse<Vec<TmdbSearchItem>>>, ApiError> {
    let q = query.query.trim();
    if q.is_empty() {
        return Ok(Json(ApiResponse::success(Vec::new())));
    }

    let items = state
        .tmdb
        .search_multi(q)
        .await
        .map_err(|err| ApiError::tmdb_error(err.to_string()))?;

    Ok(Json(ApiResponse::success(items)))
}

/// Full detail fetch used to prefill the content form from a TMDB pick.
pub async fn tmdb_details(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TmdbDetailsQuery>,
) -> Result<Json<ApiResponse<TmdbDetails>>, ApiError> {
    let kind = parse_kind(query.media_type.as_deref());

    let details = state
        .tmdb
        .details(&query.id, kind)
        .await
        .map_err(|err| ApiError::tmdb_error(err.to_string()))?
        .ok_or_else(|| ApiError::not_found("TMDB record", &query.id))?;

    Ok(Json(ApiResponse::success(details)))
}

/// Re-fetches metadata for an already-linked record; the client decides
/// which fields to apply.
pub async fn tmdb_resync(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TmdbDetailsQuery>,
) -> Result<Json<ApiResponse<TmdbDetails>>, ApiError> {
    let kind = parse_kind(query.media_type.as_deref());

    let details = state
        .admin
        .resync(&query.id, kind)
        .await?
        .ok_or_else(|| ApiError::not_found("TMDB record", &query.id))?;

    Ok(Json(ApiResponse::success(details)))
}

/// Compact local-catalog search for the admin content picker.
pub async fn live_search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LiveSearchQuery>,
) -> Result<Json<ApiResponse<Vec<super::types::LiveSearchItemDto>>>, ApiError> {
    let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return Ok(Json(ApiResponse::success(Vec::new())));
    };

    let items = state
        .catalog
        .quick_search(q)
        .await?
        .into_iter()
        .map(|c| super::types::LiveSearchItemDto {
            id: c.id,
            kind: c.kind().to_string(),
            title: c.title,
        })
        .collect();

    Ok(Json(ApiResponse::success(items)))
}
