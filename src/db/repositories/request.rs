use chrono::Utc;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{content_requests, prelude::ContentRequests};

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_FULFILLED: &str = "Fulfilled";
pub const STATUS_REJECTED: &str = "Rejected";

pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_FULFILLED, STATUS_REJECTED];

pub struct RequestRepository {
    conn: DatabaseConnection,
}

impl RequestRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, name: &str, info: &str) -> anyhow::Result<i32> {
        let active_model = content_requests::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            info: Set(info.to_string()),
            status: Set(STATUS_PENDING.to_string()),
            created_at: Set(Utc::now().to_rfc3339()),
        };

        let result = ContentRequests::insert(active_model).exec(&self.conn).await?;
        Ok(result.last_insert_id)
    }

    pub async fn list(&self) -> anyhow::Result<Vec<content_requests::Model>> {
        let rows = ContentRequests::find()
            .order_by_desc(content_requests::Column::CreatedAt)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    pub async fn set_status(&self, id: i32, status: &str) -> anyhow::Result<bool> {
        let result = ContentRequests::update_many()
            .col_expr(
                content_requests::Column::Status,
                sea_orm::sea_query::Expr::value(status),
            )
            .filter(content_requests::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn remove(&self, id: i32) -> anyhow::Result<bool> {
        let result = ContentRequests::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count_pending(&self) -> anyhow::Result<u64> {
        let total = ContentRequests::find()
            .filter(content_requests::Column::Status.eq(STATUS_PENDING))
            .count(&self.conn)
            .await?;
        Ok(total)
    }
}
