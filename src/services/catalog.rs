use serde::Serialize;
use thiserror::Error;

use crate::constants::{LATEST_MOVIES, LATEST_SERIES, TRENDING_CATEGORY, limits};
use crate::db::{ContentFilter, Store};
use crate::models::content::{Content, ContentKind};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Content not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// 1-based pagination metadata. An out-of-range page is not an error; it
/// produces an empty item list with this metadata intact.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
    pub total_count: u64,
    pub total_pages: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(page: u64, per_page: u64, total_count: u64) -> Self {
        Self {
            page,
            per_page,
            total_count,
            total_pages: total_count.div_ceil(per_page),
        }
    }

    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[derive(Debug, Serialize)]
pub struct CategorySection {
    pub name: String,
    pub items: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct HomeFeed {
    /// Most-recently-updated records overall; doubles as hero slider and
    /// "Recently Added".
    pub recent: Vec<Content>,
    /// Per-category sections, alphabetical except "Trending" first.
    /// Categories with no matching records are omitted.
    pub sections: Vec<CategorySection>,
}

/// Read-side queries over the content store: listings, search, the home
/// feed, and detail views with their view-count side effect.
#[derive(Clone)]
pub struct CatalogService {
    store: Store,
}

impl CatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list(
        &self,
        filter: &ContentFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<Content>, Pagination), CatalogError> {
        let page = page.max(1);
        let offset = page.saturating_sub(1).saturating_mul(page_size);

        let total_count = self.store.count_content(filter).await?;
        let pagination = Pagination::new(page, page_size, total_count);

        // Out of range is an empty page, never a query with an absurd offset.
        if offset >= total_count {
            return Ok((Vec::new(), pagination));
        }

        let items = self.store.find_content(filter, offset, page_size).await?;
        Ok((items, pagination))
    }

    pub async fn search(
        &self,
        query: &str,
        page: u64,
    ) -> Result<(Vec<Content>, Pagination), CatalogError> {
        self.list(&ContentFilter::by_title(query), page, limits::ITEMS_PER_PAGE)
            .await
    }

    /// Category listing. The two reserved pseudo-categories filter by kind
    /// instead of category membership.
    pub async fn by_category(
        &self,
        name: &str,
        page: u64,
    ) -> Result<(Vec<Content>, Pagination), CatalogError> {
        let filter = match name {
            LATEST_MOVIES => ContentFilter::by_kind(ContentKind::Movie),
            LATEST_SERIES => ContentFilter::by_kind(ContentKind::Series),
            other => ContentFilter::by_category(other),
        };

        self.list(&filter, page, limits::ITEMS_PER_PAGE).await
    }

    pub async fn home_feed(&self) -> Result<HomeFeed, CatalogError> {
        let recent = self
            .store
            .find_content(&ContentFilter::default(), 0, limits::HOME_SECTION_SIZE)
            .await?;

        let mut names: Vec<String> = self
            .store
            .list_categories()
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect();

        // Already alphabetical from the store; surface Trending first.
        if let Some(pos) = names.iter().position(|n| n == TRENDING_CATEGORY) {
            let trending = names.remove(pos);
            names.insert(0, trending);
        }

        let mut sections = Vec::new();
        for name in names {
            let items = self
                .store
                .find_content(
                    &ContentFilter::by_category(&name),
                    0,
                    limits::HOME_SECTION_SIZE,
                )
                .await?;

            if !items.is_empty() {
                sections.push(CategorySection { name, items });
            }
        }

        Ok(HomeFeed { recent, sections })
    }

    /// Fetches a record, atomically bumping its view count, plus up to ten
    /// related records of the same kind.
    pub async fn detail(&self, id: i32) -> Result<(Content, Vec<Content>), CatalogError> {
        let content = self
            .store
            .increment_views_and_get(id)
            .await?
            .ok_or(CatalogError::NotFound)?;

        let mut related = self
            .store
            .find_content(
                &ContentFilter::by_kind(content.kind()),
                0,
                limits::RELATED_CONTENT_SIZE + 1,
            )
            .await?;
        related.retain(|c| c.id != content.id);
        related.truncate(limits::RELATED_CONTENT_SIZE as usize);

        Ok((content, related))
    }

    /// Lightweight title search for the public autocomplete endpoint.
    pub async fn quick_search(&self, query: &str) -> Result<Vec<Content>, CatalogError> {
        let items = self
            .store
            .find_content(
                &ContentFilter::by_title(query),
                0,
                limits::MAX_SEARCH_RESULTS,
            )
            .await?;
        Ok(items)
    }
}
