use std::sync::{Arc, OnceLock};
use std::time::Duration;

use cuas_core::{Catalog, Product};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use crate::error::KnowledgeError;
use crate::source::KnowledgeSource;

/// Load progress of the knowledge base.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Unloaded,
    Loaded,
    Failed,
}

/// Read-mostly product catalog shared by every conversation.
///
/// The catalog is written at most once. `load` publishes the outcome on a
/// watch channel; readers await it with [`KnowledgeStore::wait_ready`].
/// Until the load succeeds every read sees an empty catalog.
pub struct KnowledgeStore {
    source: Option<KnowledgeSource>,
    fetch_timeout: Duration,
    catalog: OnceLock<Catalog>,
    state: watch::Sender<LoadState>,
    attempted: Mutex<bool>,
}

impl KnowledgeStore {
    /// Create an unloaded store backed by `source`.
    pub fn new(source: KnowledgeSource, fetch_timeout: Duration) -> Self {
        let (state, _) = watch::channel(LoadState::Unloaded);
        Self {
            source: Some(source),
            fetch_timeout,
            catalog: OnceLock::new(),
            state,
            attempted: Mutex::new(false),
        }
    }

    /// Create a store that is already loaded with `catalog`.
    pub fn from_catalog(catalog: Catalog) -> Self {
        let (state, _) = watch::channel(LoadState::Loaded);
        Self {
            source: None,
            fetch_timeout: Duration::ZERO,
            catalog: OnceLock::from(catalog),
            state,
            attempted: Mutex::new(true),
        }
    }

    /// Load the catalog from the configured source.
    ///
    /// Only the first call does any work; later calls return the settled
    /// state. On failure the store stays empty and moves to `Failed`.
    pub async fn load(&self) -> Result<LoadState, KnowledgeError> {
        let mut attempted = self.attempted.lock().await;
        if *attempted {
            debug!(state = ?self.state(), "Knowledge base load already attempted");
            return Ok(self.state());
        }
        *attempted = true;

        let Some(source) = &self.source else {
            return Ok(self.state());
        };

        match source.fetch(self.fetch_timeout).await {
            Ok(catalog) => {
                let count = catalog.len();
                if self.catalog.set(catalog).is_err() {
                    warn!("Knowledge catalog was already set");
                }
                self.state.send_replace(LoadState::Loaded);
                info!(source = %source, products = count, "Knowledge base loaded");
                Ok(LoadState::Loaded)
            }
            Err(e) => {
                self.state.send_replace(LoadState::Failed);
                error!(source = %source, error = %e, "Failed to load knowledge base");
                Err(e)
            }
        }
    }

    /// Run [`load`](Self::load) on a background task.
    pub fn spawn_load(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            // Failure is already logged and reflected in the load state.
            let _ = store.load().await;
        })
    }

    /// Wait until the store leaves `Unloaded`, up to `timeout`.
    pub async fn wait_ready(&self, timeout: Duration) -> Result<LoadState, KnowledgeError> {
        let mut rx = self.state.subscribe();
        let result = match tokio::time::timeout(timeout, rx.wait_for(|s| *s != LoadState::Unloaded)).await {
            Ok(Ok(state)) => Ok(*state),
            Ok(Err(_)) => Err(KnowledgeError::NotReady(timeout)),
            Err(_) => {
                warn!(timeout_ms = timeout.as_millis() as u64, "Knowledge base not ready");
                Err(KnowledgeError::NotReady(timeout))
            }
        };
        result
    }

    pub fn state(&self) -> LoadState {
        *self.state.borrow()
    }

    pub fn is_loaded(&self) -> bool {
        self.state() == LoadState::Loaded
    }

    /// Loaded product names in document order; empty until loaded.
    pub fn product_names(&self) -> Vec<String> {
        self.catalog.get().map(Catalog::names).unwrap_or_default()
    }

    /// Resolve a free-text product reference.
    ///
    /// Matching is case-insensitive containment in either direction, so
    /// "Roadrunner" finds "Roadrunner-M" and "Roadrunner-M Block 2" finds it
    /// too. The first match in document order wins.
    pub fn lookup(&self, name: &str) -> Option<(String, Product)> {
        let query = name.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.catalog.get()?.iter().find_map(|(key, product)| {
            let key_lower = key.to_lowercase();
            (key_lower.contains(&query) || query.contains(&key_lower))
                .then(|| (key.to_string(), product.clone()))
        })
    }

    /// Full catalog as pretty JSON; an empty document when not loaded.
    pub fn snapshot_json(&self) -> String {
        let empty = Catalog::new();
        let catalog = self.catalog.get().unwrap_or(&empty);
        catalog
            .to_json_pretty()
            .unwrap_or_else(|_| "{\"products\": {}}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn product(category: &str) -> Product {
        Product {
            manufacturer: "X".to_string(),
            category: category.to_string(),
            description: "D".to_string(),
            ..Product::default()
        }
    }

    fn sample_store() -> KnowledgeStore {
        let mut catalog = Catalog::new();
        catalog.insert("Roadrunner-M", product("Interceptor"));
        catalog.insert("DroneBuster", product("Handheld Jammer"));
        catalog.insert("Roadrunner Trainer", product("Training"));
        KnowledgeStore::from_catalog(catalog)
    }

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // ---- Lookup ----

    #[test]
    fn test_lookup_partial_query_matches_longer_key() {
        let store = sample_store();
        let (name, p) = store.lookup("Roadrunner").unwrap();
        assert_eq!(name, "Roadrunner-M");
        assert_eq!(p.category, "Interceptor");
    }

    #[test]
    fn test_lookup_longer_query_matches_shorter_key() {
        let store = sample_store();
        let (name, _) = store.lookup("the DroneBuster handheld").unwrap();
        assert_eq!(name, "DroneBuster");
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let store = sample_store();
        assert_eq!(store.lookup("DRONEBUSTER").unwrap().0, "DroneBuster");
        assert_eq!(store.lookup("roadrunner-m").unwrap().0, "Roadrunner-M");
    }

    #[test]
    fn test_lookup_every_substring_resolves() {
        let store = sample_store();
        let name = "DroneBuster";
        for start in 0..name.len() {
            for end in start + 1..=name.len() {
                let sub = &name[start..end];
                let resolved = store.lookup(sub).map(|(n, _)| n);
                // Short substrings may also hit an earlier key; the match must
                // still be a key containing the substring.
                let resolved = resolved.unwrap();
                assert!(resolved.to_lowercase().contains(&sub.to_lowercase()));
            }
        }
        assert_eq!(store.lookup("Buster").unwrap().0, "DroneBuster");
    }

    #[test]
    fn test_lookup_first_match_in_document_order() {
        let store = sample_store();
        // Both Roadrunner-M and Roadrunner Trainer contain "road".
        assert_eq!(store.lookup("road").unwrap().0, "Roadrunner-M");
    }

    #[test]
    fn test_lookup_not_found() {
        let store = sample_store();
        assert!(store.lookup("Coyote").is_none());
        assert!(store.lookup("").is_none());
        assert!(store.lookup("   ").is_none());
    }

    // ---- Load ----

    #[tokio::test]
    async fn test_unloaded_store_reads_empty() {
        let store = KnowledgeStore::new(
            KnowledgeSource::File(PathBuf::from("/nonexistent")),
            Duration::from_secs(1),
        );
        assert_eq!(store.state(), LoadState::Unloaded);
        assert!(store.product_names().is_empty());
        assert!(store.lookup("anything").is_none());
        assert!(store.snapshot_json().contains("products"));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let file = write_temp(
            r#"{"products": {"Beast+": {"manufacturer": "A"}, "Titan": {"manufacturer": "B"}}}"#,
        );
        let store = KnowledgeStore::new(
            KnowledgeSource::File(file.path().to_path_buf()),
            Duration::from_secs(1),
        );
        assert_eq!(store.load().await.unwrap(), LoadState::Loaded);
        assert!(store.is_loaded());
        assert_eq!(store.product_names(), vec!["Beast+", "Titan"]);
    }

    #[tokio::test]
    async fn test_load_failure_leaves_store_failed_and_empty() {
        let file = write_temp("{ not json");
        let store = KnowledgeStore::new(
            KnowledgeSource::File(file.path().to_path_buf()),
            Duration::from_secs(1),
        );
        assert!(store.load().await.is_err());
        assert_eq!(store.state(), LoadState::Failed);
        assert!(store.product_names().is_empty());
        assert!(store.lookup("Beast").is_none());
    }

    #[tokio::test]
    async fn test_load_runs_at_most_once() {
        let file = write_temp(r#"{"products": {"Beast+": {}}}"#);
        let store = KnowledgeStore::new(
            KnowledgeSource::File(file.path().to_path_buf()),
            Duration::from_secs(1),
        );
        store.load().await.unwrap();

        // Rewriting the file has no effect on a second load.
        std::fs::write(file.path(), r#"{"products": {"Other": {}}}"#).unwrap();
        assert_eq!(store.load().await.unwrap(), LoadState::Loaded);
        assert_eq!(store.product_names(), vec!["Beast+"]);
    }

    #[tokio::test]
    async fn test_second_load_after_failure_reports_failed() {
        let store = KnowledgeStore::new(
            KnowledgeSource::File(PathBuf::from("/nonexistent/kb.json")),
            Duration::from_secs(1),
        );
        assert!(store.load().await.is_err());
        assert_eq!(store.load().await.unwrap(), LoadState::Failed);
    }

    // ---- Readiness ----

    #[tokio::test]
    async fn test_wait_ready_on_loaded_store_is_immediate() {
        let store = sample_store();
        let state = store.wait_ready(Duration::from_millis(10)).await.unwrap();
        assert_eq!(state, LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_wait_ready_times_out_while_unloaded() {
        let store = KnowledgeStore::new(
            KnowledgeSource::File(PathBuf::from("/nonexistent")),
            Duration::from_secs(1),
        );
        let err = store.wait_ready(Duration::from_millis(50)).await.unwrap_err();
        assert!(matches!(err, KnowledgeError::NotReady(_)));
        assert_eq!(store.state(), LoadState::Unloaded);
    }

    #[tokio::test]
    async fn test_wait_ready_resolves_when_background_load_finishes() {
        let file = write_temp(r#"{"products": {"Beast+": {}}}"#);
        let store = Arc::new(KnowledgeStore::new(
            KnowledgeSource::File(file.path().to_path_buf()),
            Duration::from_secs(1),
        ));
        let waiter = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.wait_ready(Duration::from_secs(5)).await })
        };
        store.spawn_load().await.unwrap();
        assert_eq!(waiter.await.unwrap().unwrap(), LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_wait_ready_reports_failed_state() {
        let store = Arc::new(KnowledgeStore::new(
            KnowledgeSource::File(PathBuf::from("/nonexistent/kb.json")),
            Duration::from_secs(1),
        ));
        store.spawn_load().await.unwrap();
        let state = store.wait_ready(Duration::from_secs(1)).await.unwrap();
        assert_eq!(state, LoadState::Failed);
    }

    #[test]
    fn test_snapshot_json_contains_all_products() {
        let store = sample_store();
        let json = store.snapshot_json();
        assert!(json.contains("Roadrunner-M"));
        assert!(json.contains("DroneBuster"));
        assert!(json.contains("Handheld Jammer"));
    }
}
