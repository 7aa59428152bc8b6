use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{categories, content_requests};
use crate::models::content::Content;

pub mod migrator;
pub mod repositories;

pub use repositories::content::ContentFilter;
pub use repositories::request::{STATUS_FULFILLED, STATUS_PENDING, STATUS_REJECTED, VALID_STATUSES};
pub use repositories::settings::AdSettings;

/// Dashboard counters shown on the admin overview.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct CatalogStats {
    pub total_content: u64,
    pub total_movies: u64,
    pub total_series: u64,
    pub pending_requests: u64,
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn content_repo(&self) -> repositories::content::ContentRepository {
        repositories::content::ContentRepository::new(self.conn.clone())
    }

    fn category_repo(&self) -> repositories::category::CategoryRepository {
        repositories::category::CategoryRepository::new(self.conn.clone())
    }

    fn settings_repo(&self) -> repositories::settings::SettingsRepository {
        repositories::settings::SettingsRepository::new(self.conn.clone())
    }

    fn request_repo(&self) -> repositories::request::RequestRepository {
        repositories::request::RequestRepository::new(self.conn.clone())
    }

    // ========== Content ==========

    pub async fn add_content(&self, record: &Content) -> Result<i32> {
        self.content_repo().insert(record).await
    }

    pub async fn get_content(&self, id: i32) -> Result<Option<Content>> {
        self.content_repo().get(id).await
    }

    pub async fn find_content(
        &self,
        filter: &ContentFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Content>> {
        self.content_repo().find(filter, offset, limit).await
    }

    pub async fn count_content(&self, filter: &ContentFilter) -> Result<u64> {
        self.content_repo().count(filter).await
    }

    pub async fn update_content(&self, id: i32, record: &Content) -> Result<Option<Content>> {
        self.content_repo().update(id, record).await
    }

    pub async fn remove_content(&self, id: i32) -> Result<bool> {
        self.content_repo().remove(id).await
    }

    pub async fn remove_content_bulk(&self, ids: &[i32]) -> Result<u64> {
        self.content_repo().remove_many(ids).await
    }

    pub async fn increment_views_and_get(&self, id: i32) -> Result<Option<Content>> {
        self.content_repo().increment_views_and_get(id).await
    }

    // ========== Categories ==========

    pub async fn upsert_category(&self, name: &str) -> Result<()> {
        self.category_repo().upsert(name).await
    }

    pub async fn list_categories(&self) -> Result<Vec<categories::Model>> {
        self.category_repo().list().await
    }

    pub async fn remove_category(&self, id: i32) -> Result<bool> {
        self.category_repo().remove(id).await
    }

    pub async fn seed_default_categories(&self) -> Result<()> {
        self.category_repo().seed_defaults().await
    }

    // ========== Site settings ==========

    pub async fn get_ad_settings(&self) -> Result<AdSettings> {
        self.settings_repo().get().await
    }

    pub async fn update_ad_settings(&self, settings: &AdSettings) -> Result<()> {
        self.settings_repo().upsert(settings).await
    }

    // ========== Content requests ==========

    pub async fn add_request(&self, name: &str, info: &str) -> Result<i32> {
        self.request_repo().add(name, info).await
    }

    pub async fn list_requests(&self) -> Result<Vec<content_requests::Model>> {
        self.request_repo().list().await
    }

    pub async fn set_request_status(&self, id: i32, status: &str) -> Result<bool> {
        self.request_repo().set_status(id, status).await
    }

    pub async fn remove_request(&self, id: i32) -> Result<bool> {
        self.request_repo().remove(id).await
    }

    // ========== Stats ==========

    pub async fn catalog_stats(&self) -> Result<CatalogStats> {
        use crate::models::content::ContentKind;

        let total_content = self.count_content(&ContentFilter::default()).await?;
        let total_movies = self
            .count_content(&ContentFilter::by_kind(ContentKind::Movie))
            .await?;
        let total_series = self
            .count_content(&ContentFilter::by_kind(ContentKind::Series))
            .await?;
        let pending_requests = self.request_repo().count_pending().await?;

        Ok(CatalogStats {
            total_content,
            total_movies,
            total_series,
            pending_requests,
        })
    }
}
