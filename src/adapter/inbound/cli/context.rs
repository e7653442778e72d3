//! Wiring of configuration, store and market data for CLI handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::paths;
use crate::adapter::outbound::polygon::Polygon;
use crate::adapter::outbound::sqlite::SqliteTradeStore;
use crate::application::{Analytics, PriceResolver, TradeJournal};
use crate::domain::OwnerId;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::{NoPrices, PriceSource, TradeStore};

/// Load the config named on the command line, or the default file when it
/// exists. A path given explicitly must exist.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, PathBuf)> {
    match explicit {
        Some(path) => Ok((Config::load(path)?, path.to_path_buf())),
        None => {
            let path = paths::default_config();
            Ok((Config::load_or_default(&path)?, path))
        }
    }
}

/// Price source selected by the market data settings.
pub fn price_source(config: &Config) -> Result<Arc<dyn PriceSource>> {
    if config.market_data.is_active() {
        Ok(Arc::new(Polygon::from_config(&config.market_data)?))
    } else {
        debug!(
            enabled = config.market_data.enabled,
            "Market data inactive, live prices unavailable"
        );
        Ok(Arc::new(NoPrices))
    }
}

/// Services and identity for one CLI invocation.
pub struct Context {
    pub config: Config,
    pub journal: TradeJournal,
    pub analytics: Analytics,
    pub prices: PriceResolver,
    pub owner: OwnerId,
    pub owner_name: String,
}

impl Context {
    /// Open the database and build every service.
    pub fn build(
        config: Config,
        db: Option<&Path>,
        owner: &str,
        owner_name: Option<&str>,
    ) -> Result<Self> {
        let database = db
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| config.database.clone());
        debug!(database = %database, "Opening trade store");
        let store: Arc<dyn TradeStore> = Arc::new(SqliteTradeStore::open(&database)?);

        let journal = TradeJournal::new(Arc::clone(&store))
            .with_history_limit(config.journal.history_limit);
        let analytics = Analytics::new(store);
        let prices = PriceResolver::new(price_source(&config)?);

        Ok(Self {
            config,
            journal,
            analytics,
            prices,
            owner: OwnerId::from(owner),
            owner_name: owner_name.unwrap_or(owner).to_string(),
        })
    }
}
