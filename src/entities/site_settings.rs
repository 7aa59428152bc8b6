use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Singleton row (id = 1) of ad-injection HTML slots.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "site_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub ad_header: Option<String>,
    pub ad_body_top: Option<String>,
    pub ad_footer: Option<String>,
    pub ad_list_page: Option<String>,
    pub ad_detail_page: Option<String>,
    pub ad_wait_page: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
