use std::sync::Arc;

use crate::clients::telegram::TelegramNotifier;
use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{CatalogService, ContentAdminService};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,

    pub store: Store,

    pub catalog: CatalogService,

    pub admin: ContentAdminService,

    pub tmdb: Arc<TmdbClient>,

    pub notifier: Arc<TelegramNotifier>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let store = Store::with_pool_options(
            &config.database_url,
            config.server.max_db_connections,
            config.server.min_db_connections,
        )
        .await?;

        store.seed_default_categories().await?;

        let tmdb = Arc::new(TmdbClient::new(&config.tmdb)?);
        let notifier = Arc::new(TelegramNotifier::new(config.telegram.clone())?);

        let catalog = CatalogService::new(store.clone());
        let admin = ContentAdminService::new(store.clone(), tmdb.clone(), notifier.clone());

        Ok(Arc::new(Self {
            config,
            store,
            catalog,
            admin,
            tmdb,
            notifier,
        }))
    }
}
