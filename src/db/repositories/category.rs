use sea_orm::{
    ActiveValue::NotSet, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use tracing::info;

use crate::constants::DEFAULT_CATEGORIES;
use crate::entities::{categories, prelude::Categories};

pub struct CategoryRepository {
    conn: DatabaseConnection,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a category name. A duplicate name upserts instead of erroring,
    /// relying on the unique index.
    pub async fn upsert(&self, name: &str) -> anyhow::Result<()> {
        let active_model = categories::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
        };

        Categories::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(categories::Column::Name)
                    .update_column(categories::Column::Name)
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    /// All categories in alphabetical name order.
    pub async fn list(&self) -> anyhow::Result<Vec<categories::Model>> {
        let rows = Categories::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    /// Removes a category by id. Content records referencing the name keep
    /// their dangling entry.
    pub async fn remove(&self, id: i32) -> anyhow::Result<bool> {
        let result = Categories::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Seeds the default category list when the table is empty.
    pub async fn seed_defaults(&self) -> anyhow::Result<()> {
        let existing = Categories::find().count(&self.conn).await?;
        if existing > 0 {
            return Ok(());
        }

        let models = DEFAULT_CATEGORIES.iter().map(|name| categories::ActiveModel {
            id: NotSet,
            name: Set((*name).to_string()),
        });

        Categories::insert_many(models).exec(&self.conn).await?;
        info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());
        Ok(())
    }
}
