use sea_orm::{DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};

use crate::entities::{prelude::SiteSettings, site_settings};

/// Ad-injection HTML slots held by the settings singleton.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdSettings {
    pub ad_header: Option<String>,
    pub ad_body_top: Option<String>,
    pub ad_footer: Option<String>,
    pub ad_list_page: Option<String>,
    pub ad_detail_page: Option<String>,
    pub ad_wait_page: Option<String>,
}

const SINGLETON_ID: i32 = 1;

pub struct SettingsRepository {
    conn: DatabaseConnection,
}

impl SettingsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self) -> anyhow::Result<AdSettings> {
        let row = SiteSettings::find_by_id(SINGLETON_ID).one(&self.conn).await?;

        Ok(row.map_or_else(AdSettings::default, |model| AdSettings {
            ad_header: model.ad_header,
            ad_body_top: model.ad_body_top,
            ad_footer: model.ad_footer,
            ad_list_page: model.ad_list_page,
            ad_detail_page: model.ad_detail_page,
            ad_wait_page: model.ad_wait_page,
        }))
    }

    pub async fn upsert(&self, settings: &AdSettings) -> anyhow::Result<()> {
        let active_model = site_settings::ActiveModel {
            id: Set(SINGLETON_ID),
            ad_header: Set(settings.ad_header.clone()),
            ad_body_top: Set(settings.ad_body_top.clone()),
            ad_footer: Set(settings.ad_footer.clone()),
            ad_list_page: Set(settings.ad_list_page.clone()),
            ad_detail_page: Set(settings.ad_detail_page.clone()),
            ad_wait_page: Set(settings.ad_wait_page.clone()),
        };

        SiteSettings::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(site_settings::Column::Id)
                    .update_columns([
                        site_settings::Column::AdHeader,
                        site_settings::Column::AdBodyTop,
                        site_settings::Column::AdFooter,
                        site_settings::Column::AdListPage,
                        site_settings::Column::AdDetailPage,
                        site_settings::Column::AdWaitPage,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }
}
