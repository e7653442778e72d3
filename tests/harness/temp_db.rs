use std::sync::Arc;

use tempfile::TempDir;
use tradelog::adapter::outbound::sqlite::SqliteTradeStore;
use tradelog::port::TradeStore;

/// Temporary on-disk SQLite journal for integration tests.
///
/// The directory and database file are removed on drop.
pub struct TempDb {
    dir: TempDir,
    url: String,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix(&format!("tradelog-{name}-"))
            .tempdir()
            .expect("create temp dir");
        let url = dir.path().join("journal.db").to_string_lossy().into_owned();
        Self { dir, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Open a store over this database, running migrations.
    pub fn store(&self) -> Arc<dyn TradeStore> {
        Arc::new(SqliteTradeStore::open(&self.url).expect("open sqlite store"))
    }
}
