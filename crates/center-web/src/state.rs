//! Server-side state: loaded configuration and the cached, normalized table.
//! Initialized once at startup; server functions read it through `app_state()`.

#[cfg(feature = "ssr")]
mod ssr {
    use anyhow::{Context, Result};
    use center_ledger::config::{Config, DashboardConfig};
    use center_ledger::dashboard::load_table;
    use center_ledger::sheets::GoogleSheetsSource;
    use center_ledger::source::TableSource;
    use center_ledger::table::Normalized;
    use std::path::PathBuf;
    use std::sync::{Arc, OnceLock};
    use std::time::{Duration, Instant};
    use tokio::sync::Mutex;
    use tracing::{debug, info};

    static APP_STATE: OnceLock<AppState> = OnceLock::new();

    struct CacheEntry {
        table: Arc<Normalized>,
        expires_at: Instant,
    }

    /// In-memory table with a TTL. One fetch at a time; concurrent callers
    /// wait for it and share the result.
    pub struct TableCache<S> {
        source: S,
        ttl: Duration,
        entry: Mutex<Option<CacheEntry>>,
    }

    impl<S: TableSource + Sync> TableCache<S> {
        pub fn new(source: S, ttl: Duration) -> Self {
            Self {
                source,
                ttl,
                entry: Mutex::new(None),
            }
        }

        /// Cached table, refetched when stale or when `reload` is set.
        pub async fn get(&self, reload: bool) -> Result<Arc<Normalized>> {
            let mut guard = self.entry.lock().await;

            if !reload
                && let Some(entry) = guard.as_ref().filter(|e| e.expires_at > Instant::now())
            {
                debug!("table cache hit");
                return Ok(Arc::clone(&entry.table));
            }

            let table = Arc::new(load_table(&self.source).await?);
            *guard = Some(CacheEntry {
                table: Arc::clone(&table),
                expires_at: Instant::now() + self.ttl,
            });
            info!(reload, ttl_secs = self.ttl.as_secs(), "table cache refreshed");
            Ok(table)
        }
    }

    pub struct AppState {
        pub dashboard: DashboardConfig,
        pub tables: TableCache<GoogleSheetsSource>,
    }

    /// `$SECRETS_PATH`, else `$DATA_DIR/secrets.toml`.
    pub fn secrets_path() -> PathBuf {
        if let Ok(path) = std::env::var("SECRETS_PATH") {
            return PathBuf::from(path);
        }
        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string());
        PathBuf::from(data_dir).join("secrets.toml")
    }

    /// Load secrets and build the shared state.
    /// Must be called once at startup before any request is served.
    pub fn init_state() -> Result<&'static AppState> {
        let path = secrets_path();
        let config = Config::load(&path)?;
        let source = GoogleSheetsSource::from_config(&config)?;
        let ttl = Duration::from_secs(config.dashboard.cache_ttl_secs);

        let state = AppState {
            dashboard: config.dashboard,
            tables: TableCache::new(source, ttl),
        };
        APP_STATE
            .set(state)
            .map_err(|_| anyhow::anyhow!("App state already initialized"))?;

        info!(secrets = %path.display(), ttl_secs = ttl.as_secs(), "dashboard state initialized");
        app_state()
    }

    pub fn app_state() -> Result<&'static AppState> {
        APP_STATE.get().context("App state not initialized")
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use anyhow::Result;
        use center_ledger::source::{Grid, StaticSource};
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct CountingSource {
            inner: StaticSource,
            reads: AtomicUsize,
        }

        impl TableSource for CountingSource {
            fn describe(&self) -> String {
                "counting".to_string()
            }

            async fn read_all(&self) -> Result<Grid> {
                self.reads.fetch_add(1, Ordering::SeqCst);
                self.inner.read_all().await
            }
        }

        fn source() -> CountingSource {
            CountingSource {
                inner: StaticSource::from_rows(&[&["date", "center_1", "center_2"], &["2024-01-05", "10000", "0"]]),
                reads: AtomicUsize::new(0),
            }
        }

        #[tokio::test]
        async fn test_cache_reuses_table_within_ttl() {
            let cache = TableCache::new(source(), Duration::from_secs(300));
            let first = cache.get(false).await.unwrap();
            let second = cache.get(false).await.unwrap();

            assert!(Arc::ptr_eq(&first, &second));
            assert_eq!(cache.source.reads.load(Ordering::SeqCst), 1);
            assert_eq!(first.table.len(), 1);
        }

        #[tokio::test]
        async fn test_reload_forces_refetch() {
            let cache = TableCache::new(source(), Duration::from_secs(300));
            cache.get(false).await.unwrap();
            cache.get(true).await.unwrap();
            assert_eq!(cache.source.reads.load(Ordering::SeqCst), 2);
        }

        #[tokio::test]
        async fn test_expired_entry_is_refetched() {
            let cache = TableCache::new(source(), Duration::ZERO);
            cache.get(false).await.unwrap();
            cache.get(false).await.unwrap();
            assert_eq!(cache.source.reads.load(Ordering::SeqCst), 2);
        }
    }
}

#[cfg(feature = "ssr")]
pub use ssr::*;
