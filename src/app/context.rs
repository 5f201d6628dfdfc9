use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{InletError, Result};
use crate::config::Config;
use crate::discovery::FeedDiscovery;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::normalizer::slugify;
use crate::refresh::Refresher;
use crate::registry;
use crate::settings::Settings;
use crate::store::sqlite::SqliteStore;
use crate::store::Store;
use crate::summarizer::Summarizer;
use crate::sync::SyncClient;

/// Shared wiring for the CLI and the background daemon.
pub struct AppContext {
    pub config: Config,
    pub settings: Settings,
    pub store: Arc<SqliteStore>,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub refresher: Refresher,
    pub discovery: FeedDiscovery,
    pub sync: Option<SyncClient>,
    pub summarizer: Summarizer,
}

impl AppContext {
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let config = Config::load()?;
        let settings = Settings::load(&Settings::default_path()?);
        let db_path = match db_path.or_else(|| config.db_path.clone()) {
            Some(p) => p,
            None => Self::default_db_path()?,
        };
        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::wire(config, settings, store)
    }

    pub fn in_memory() -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::wire(Config::default(), Settings::default(), store)
    }

    fn wire(config: Config, settings: Settings, store: Arc<SqliteStore>) -> Result<Self> {
        registry::seed(store.as_ref())?;
        Self::seed_custom_sources(&settings, store.as_ref())?;

        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new());
        let refresher = Refresher::with_workers(fetcher.clone(), config.refresh.workers);
        let discovery = FeedDiscovery::new(fetcher.clone());
        let sync = config.sync.endpoint.clone().map(SyncClient::new);
        let summarizer = Summarizer::new(
            config.summarizer.endpoint.clone(),
            config.summarizer.model.clone(),
        );

        Ok(Self {
            config,
            settings,
            store,
            fetcher,
            refresher,
            discovery,
            sync,
            summarizer,
        })
    }

    /// User-added feeds from device settings become ordinary sources,
    /// skipping ids that already exist in the database.
    fn seed_custom_sources(settings: &Settings, store: &SqliteStore) -> Result<()> {
        for custom in &settings.custom_sources {
            let id = slugify(&custom.name);
            if store.get_source(&id)?.is_some() {
                continue;
            }
            let mut source = crate::domain::Source::new(id, custom.name.clone(), custom.url.clone());
            if let Some(c) = &custom.category {
                source.category = crate::domain::Category::parse(c);
            }
            store.upsert_source(&source)?;
        }
        Ok(())
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| InletError::Config("Could not find data directory".into()))?;
        let inlet_dir = data_dir.join("inlet");
        std::fs::create_dir_all(&inlet_dir)?;
        Ok(inlet_dir.join("inlet.db"))
    }
}
