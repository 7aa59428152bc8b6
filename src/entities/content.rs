use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "content")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// "movie" or "series"; decides which link-shape column is active.
    pub kind: String,
    pub title: String,
    pub poster: String,
    pub backdrop: Option<String>,
    pub overview: String,
    /// JSON array of screenshot URLs, in display order.
    pub screenshots: Option<String>,
    pub language: Option<String>,
    /// JSON array of genre names.
    pub genres: Option<String>,
    /// JSON array of category names. Soft references: deleting a category
    /// leaves these entries in place.
    pub categories: Option<String>,
    /// JSON array of quality link objects. Populated only for movies.
    pub links: Option<String>,
    /// JSON array of episode objects. Populated only for series.
    pub episodes: Option<String>,
    /// JSON array of season pack objects. Populated only for series.
    pub season_packs: Option<String>,
    /// JSON array of free-form extra link buttons.
    pub manual_links: Option<String>,
    pub view_count: i64,
    pub is_completed: bool,
    pub tmdb_id: Option<String>,
    pub release_date: Option<String>,
    pub rating: Option<f32>,
    pub created_at: String,
    /// Sole recency sort key, refreshed on every create and update.
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
