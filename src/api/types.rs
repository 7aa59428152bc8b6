use serde::Serialize;

use crate::db::{AdSettings, CatalogStats};
use crate::entities::{categories, content_requests};
use crate::models::content::Content;
use crate::services::{HomeFeed, Pagination};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageDto {
    pub items: Vec<Content>,
    pub pagination: Pagination,
}

/// Home route payload: the feed, or a search result page when `?q=` is set.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum HomeDto {
    Feed(HomeFeed),
    SearchResults(PageDto),
}

#[derive(Debug, Serialize)]
pub struct DetailDto {
    pub content: Content,
    pub related: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct WaitDto {
    pub target_url: String,
}

/// Compact projection for the public autocomplete endpoint.
#[derive(Debug, Serialize)]
pub struct QuickSearchItemDto {
    pub id: i32,
    pub title: String,
    pub poster: String,
}

/// Compact projection for the admin content picker.
#[derive(Debug, Serialize)]
pub struct LiveSearchItemDto {
    pub id: i32,
    pub title: String,
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardDto {
    pub stats: CatalogStats,
    pub content: Vec<Content>,
    pub requests: Vec<content_requests::Model>,
    pub categories: Vec<categories::Model>,
    pub ads: AdSettings,
}
