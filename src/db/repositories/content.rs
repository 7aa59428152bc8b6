use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::entities::{content, prelude::Content as ContentEntity};
use crate::models::content::{Content, ContentKind, ContentLinks};

/// Filter over the content collection. All predicates are optional and
/// combine with AND.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    pub kind: Option<ContentKind>,
    /// Category membership (exact name).
    pub category: Option<String>,
    /// Case-insensitive title substring.
    pub title_contains: Option<String>,
}

impl ContentFilter {
    #[must_use]
    pub fn by_kind(kind: ContentKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn by_category(name: impl Into<String>) -> Self {
        Self {
            category: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn by_title(query: impl Into<String>) -> Self {
        Self {
            title_contains: Some(query.into()),
            ..Self::default()
        }
    }
}

pub struct ContentRepository {
    conn: DatabaseConnection,
}

fn encode_list<T: Serialize>(items: &[T]) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        serde_json::to_string(items).ok()
    }
}

fn decode_list<T: DeserializeOwned>(raw: Option<&String>) -> Vec<T> {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

impl ContentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: content::Model) -> Content {
        let links = match ContentKind::parse(&model.kind) {
            Some(ContentKind::Series) => ContentLinks::Series {
                episodes: decode_list(model.episodes.as_ref()),
                season_packs: decode_list(model.season_packs.as_ref()),
            },
            _ => ContentLinks::Movie {
                links: decode_list(model.links.as_ref()),
            },
        };

        Content {
            id: model.id,
            title: model.title,
            poster: model.poster,
            backdrop: model.backdrop,
            overview: model.overview,
            screenshots: decode_list(model.screenshots.as_ref()),
            language: model.language,
            genres: decode_list(model.genres.as_ref()),
            categories: decode_list(model.categories.as_ref()),
            links,
            manual_links: decode_list(model.manual_links.as_ref()),
            view_count: model.view_count,
            is_completed: model.is_completed,
            tmdb_id: model.tmdb_id,
            release_date: model.release_date,
            rating: model.rating,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }

    /// Link-shape columns for the active variant; the inactive shape maps to
    /// NULL so a kind switch never leaves stale data behind.
    fn shape_columns(
        links: &ContentLinks,
    ) -> (Option<String>, Option<String>, Option<String>) {
        match links {
            ContentLinks::Movie { links } => (encode_list(links), None, None),
            ContentLinks::Series {
                episodes,
                season_packs,
            } => (None, encode_list(episodes), encode_list(season_packs)),
        }
    }

    fn apply_filter(
        mut query: Select<ContentEntity>,
        filter: &ContentFilter,
    ) -> Select<ContentEntity> {
        if let Some(kind) = filter.kind {
            query = query.filter(content::Column::Kind.eq(kind.as_str()));
        }

        if let Some(category) = &filter.category {
            // Categories persist as a JSON array of strings; membership is a
            // substring match on the quoted name.
            query = query.filter(content::Column::Categories.contains(format!("\"{category}\"")));
        }

        if let Some(title) = &filter.title_contains {
            query = query.filter(content::Column::Title.contains(title));
        }

        query
    }

    pub async fn insert(&self, record: &Content) -> anyhow::Result<i32> {
        let (links, episodes, season_packs) = Self::shape_columns(&record.links);

        let active_model = content::ActiveModel {
            id: NotSet,
            kind: Set(record.kind().as_str().to_string()),
            title: Set(record.title.clone()),
            poster: Set(record.poster.clone()),
            backdrop: Set(record.backdrop.clone()),
            overview: Set(record.overview.clone()),
            screenshots: Set(encode_list(&record.screenshots)),
            language: Set(record.language.clone()),
            genres: Set(encode_list(&record.genres)),
            categories: Set(encode_list(&record.categories)),
            links: Set(links),
            episodes: Set(episodes),
            season_packs: Set(season_packs),
            manual_links: Set(encode_list(&record.manual_links)),
            view_count: Set(0),
            is_completed: Set(record.is_completed),
            tmdb_id: Set(record.tmdb_id.clone()),
            release_date: Set(record.release_date.clone()),
            rating: Set(record.rating),
            created_at: Set(record.created_at.clone()),
            updated_at: Set(record.updated_at.clone()),
        };

        let result = ContentEntity::insert(active_model).exec(&self.conn).await?;

        info!("Added content: {} ({})", record.title, record.kind());
        Ok(result.last_insert_id)
    }

    pub async fn get(&self, id: i32) -> anyhow::Result<Option<Content>> {
        let model = ContentEntity::find_by_id(id).one(&self.conn).await?;
        Ok(model.map(Self::map_model))
    }

    /// Filtered page, most-recently-updated first.
    pub async fn find(
        &self,
        filter: &ContentFilter,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<Vec<Content>> {
        let rows = Self::apply_filter(ContentEntity::find(), filter)
            .order_by_desc(content::Column::UpdatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn count(&self, filter: &ContentFilter) -> anyhow::Result<u64> {
        let total = Self::apply_filter(ContentEntity::find(), filter)
            .count(&self.conn)
            .await?;
        Ok(total)
    }

    /// Replaces the mutable fields of an existing record. `created_at` and
    /// `view_count` are left untouched. Returns `None` when the id is absent.
    pub async fn update(&self, id: i32, record: &Content) -> anyhow::Result<Option<Content>> {
        let (links, episodes, season_packs) = Self::shape_columns(&record.links);

        let active_model = content::ActiveModel {
            id: Set(id),
            kind: Set(record.kind().as_str().to_string()),
            title: Set(record.title.clone()),
            poster: Set(record.poster.clone()),
            backdrop: Set(record.backdrop.clone()),
            overview: Set(record.overview.clone()),
            screenshots: Set(encode_list(&record.screenshots)),
            language: Set(record.language.clone()),
            genres: Set(encode_list(&record.genres)),
            categories: Set(encode_list(&record.categories)),
            links: Set(links),
            episodes: Set(episodes),
            season_packs: Set(season_packs),
            manual_links: Set(encode_list(&record.manual_links)),
            view_count: NotSet,
            is_completed: Set(record.is_completed),
            tmdb_id: Set(record.tmdb_id.clone()),
            release_date: Set(record.release_date.clone()),
            rating: Set(record.rating),
            created_at: NotSet,
            updated_at: Set(record.updated_at.clone()),
        };

        match active_model.update(&self.conn).await {
            Ok(model) => Ok(Some(Self::map_model(model))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn remove(&self, id: i32) -> anyhow::Result<bool> {
        let result = ContentEntity::delete_by_id(id).exec(&self.conn).await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed content with ID: {}", id);
        }
        Ok(removed)
    }

    pub async fn remove_many(&self, ids: &[i32]) -> anyhow::Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = ContentEntity::delete_many()
            .filter(content::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.conn)
            .await?;

        info!("Bulk-removed {} content records", result.rows_affected);
        Ok(result.rows_affected)
    }

    /// Atomically bumps the view odometer and returns the fresh record.
    /// The increment is a single SQL UPDATE, never read-modify-write.
    pub async fn increment_views_and_get(&self, id: i32) -> anyhow::Result<Option<Content>> {
        let result = ContentEntity::update_many()
            .col_expr(
                content::Column::ViewCount,
                Expr::col(content::Column::ViewCount).add(1),
            )
            .filter(content::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get(id).await
    }
}
