use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{
    ApiError, ApiResponse,
    types::{DetailDto, HomeDto, PageDto, QuickSearchItemDto, WaitDto},
};
use crate::models::content::ContentKind;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub page: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WaitQuery {
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RequestPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub info: String,
}

fn cleaned(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Home feed, or a paginated search result page when `?q=` is present.
pub async fn home(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<ApiResponse<HomeDto>>, ApiError> {
    if let Some(q) = cleaned(query.q.as_deref()) {
        let (items, pagination) = state.catalog.search(q, query.page.unwrap_or(1)).await?;
        return Ok(Json(ApiResponse::success(HomeDto::SearchResults(
            PageDto { items, pagination },
        ))));
    }

    let feed = state.catalog.home_feed().await?;
    Ok(Json(ApiResponse::success(HomeDto::Feed(feed))))
}

/// Detail view. Serves both movies and series; the id segment must be
/// numeric, anything else is a plain 404.
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DetailDto>>, ApiError> {
    let id: i32 = id
        .parse()
        .map_err(|_| ApiError::NotFound("Content not found".to_string()))?;

    let (content, related) = state.catalog.detail(id).await?;
    Ok(Json(ApiResponse::success(DetailDto { content, related })))
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<PageDto>>, ApiError> {
    list_kind(&state, ContentKind::Movie, query.page).await
}

pub async fn list_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<PageDto>>, ApiError> {
    list_kind(&state, ContentKind::Series, query.page).await
}

async fn list_kind(
    state: &AppState,
    kind: ContentKind,
    page: Option<u64>,
) -> Result<Json<ApiResponse<PageDto>>, ApiError> {
    let (items, pagination) = state
        .catalog
        .list(
            &crate::db::ContentFilter::by_kind(kind),
            page.unwrap_or(1),
            crate::constants::limits::ITEMS_PER_PAGE,
        )
        .await?;

    Ok(Json(ApiResponse::success(PageDto { items, pagination })))
}

pub async fn by_category(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<ApiResponse<PageDto>>, ApiError> {
    let name = cleaned(query.name.as_deref())
        .ok_or_else(|| ApiError::validation("Missing category name"))?;

    let (items, pagination) = state
        .catalog
        .by_category(name, query.page.unwrap_or(1))
        .await?;

    Ok(Json(ApiResponse::success(PageDto { items, pagination })))
}

/// Visitor content request intake.
pub async fn submit_request(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RequestPayload>,
) -> Result<Json<ApiResponse<i32>>, ApiError> {
    let name = cleaned(Some(&payload.name))
        .ok_or_else(|| ApiError::validation("Request name must not be empty"))?;

    let id = state.store.add_request(name, payload.info.trim()).await?;
    tracing::info!("Content request received: {}", name);

    Ok(Json(ApiResponse::success(id)))
}

/// Pre-download interstitial target resolution. The target arrives
/// percent-encoded a second time, so one more decode pass is applied here.
pub async fn wait(
    Query(query): Query<WaitQuery>,
) -> Result<Json<ApiResponse<WaitDto>>, ApiError> {
    let target = cleaned(query.target.as_deref())
        .ok_or_else(|| ApiError::validation("Missing target URL"))?;

    let target_url = urlencoding::decode(target)
        .map_err(|_| ApiError::validation("Malformed target URL"))?
        .into_owned();

    url::Url::parse(&target_url).map_err(|_| ApiError::validation("Malformed target URL"))?;

    Ok(Json(ApiResponse::success(WaitDto { target_url })))
}

/// Public autocomplete: up to ten compact matches by title.
pub async fn quick_search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<QuickSearchItemDto>>>, ApiError> {
    let Some(q) = cleaned(query.q.as_deref()) else {
        return Ok(Json(ApiResponse::success(Vec::new())));
    };

    let items = state
        .catalog
        .quick_search(q)
        .await?
        .into_iter()
        .map(|c| QuickSearchItemDto {
            id: c.id,
            title: c.title,
            poster: c.poster,
        })
        .collect();

    Ok(Json(ApiResponse::success(items)))
}
