//! Command catalogue service backed by the bot's generated `help.json`.
//!
//! The bot writes `help.json` whenever its command set changes. This module loads
//! the file, checks its metadata, and keeps the parsed document in memory for 24
//! hours. A failed load is answered with an error document carrying zeroed metadata
//! and is not cached, so the next request tries the file again.

use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

use crate::server::error::command::CommandCatalogError;

/// Time-to-live for a loaded catalogue in seconds.
const COMMAND_CACHE_TTL_SECONDS: u64 = 24 * 60 * 60;

/// Loaded catalogue with expiration timestamp.
struct CachedCommands {
    document: Value,
    expires_at: Instant,
}

impl CachedCommands {
    fn new(document: Value) -> Self {
        Self {
            document,
            expires_at: Instant::now() + Duration::from_secs(COMMAND_CACHE_TTL_SECONDS),
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Process-wide cache of the command catalogue.
///
/// Clones share the same cache.
#[derive(Clone)]
pub struct CommandCatalog {
    /// Location of `help.json`.
    path: PathBuf,
    /// The currently cached document, if any.
    cached: Arc<RwLock<Option<CachedCommands>>>,
}

impl CommandCatalog {
    /// Creates a catalogue reading from `path`. Nothing is loaded until the first
    /// call to [`commands`](Self::commands).
    ///
    /// # Arguments
    /// - `path` - Path to the bot's `help.json`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the command catalogue, from cache while it is fresh.
    ///
    /// # Returns
    /// - The parsed `help.json` document on success
    /// - `{"error": "Failed to load command data", "metadata": {"totalCommands": 0, "categories": 0}}`
    ///   when the file is missing, unreadable, not JSON, or has invalid metadata
    pub async fn commands(&self) -> Value {
        if let Some(cached) = self.cached.read().await.as_ref() {
            if !cached.is_expired() {
                return cached.document.clone();
            }
        }

        let mut cached = self.cached.write().await;

        // Another request may have reloaded while we waited for the lock.
        if let Some(current) = cached.as_ref() {
            if !current.is_expired() {
                return current.document.clone();
            }
        }

        match self.load().await {
            Ok(document) => {
                *cached = Some(CachedCommands::new(document.clone()));
                document
            }
            Err(e) => {
                tracing::error!("{}", e);
                *cached = None;
                error_document()
            }
        }
    }

    /// Loads the catalogue once so the first visitor doesn't wait on the file.
    pub async fn warm(&self) {
        tracing::info!("Loading command catalogue from {}", self.path.display());
        self.commands().await;
    }

    /// Drops the cached document.
    #[cfg(test)]
    pub async fn clear(&self) {
        *self.cached.write().await = None;
    }

    async fn load(&self) -> Result<Value, CommandCatalogError> {
        let path = self.path.display().to_string();

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CommandCatalogError::Read {
                path: path.clone(),
                source,
            })?;

        let document: Value =
            serde_json::from_str(&contents).map_err(|source| CommandCatalogError::Parse {
                path: path.clone(),
                source,
            })?;

        let metadata = &document["metadata"];
        let (Some(total), Some(categories)) = (
            metadata["totalCommands"].as_f64(),
            metadata["categories"].as_f64(),
        ) else {
            return Err(CommandCatalogError::InvalidMetadata { path });
        };

        tracing::info!(
            "Command data loaded: {} commands in {} categories",
            total,
            categories
        );

        Ok(document)
    }
}

fn error_document() -> Value {
    json!({
        "error": "Failed to load command data",
        "metadata": {
            "totalCommands": 0,
            "categories": 0,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static FILE_COUNTER: AtomicU32 = AtomicU32::new(0);

    /// Unique path under the system temp dir, removed when dropped.
    struct TempHelpFile(PathBuf);

    impl TempHelpFile {
        fn new() -> Self {
            let n = FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
            Self(std::env::temp_dir().join(format!(
                "swgohbot-web-help-{}-{}.json",
                std::process::id(),
                n
            )))
        }

        fn write(&self, contents: &Value) {
            std::fs::write(&self.0, contents.to_string()).unwrap();
        }
    }

    impl Drop for TempHelpFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn help(total: u32) -> Value {
        json!({
            "metadata": { "totalCommands": total, "categories": 2 },
            "Admin": [{ "name": "setconf" }],
        })
    }

    #[tokio::test(start_paused = true)]
    async fn serves_cached_document_until_ttl() {
        let file = TempHelpFile::new();
        file.write(&help(10));
        let catalog = CommandCatalog::new(&file.0);

        assert_eq!(catalog.commands().await, help(10));

        file.write(&help(11));
        tokio::time::advance(Duration::from_secs(COMMAND_CACHE_TTL_SECONDS - 1)).await;
        assert_eq!(catalog.commands().await, help(10));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(catalog.commands().await, help(11));
    }

    #[tokio::test]
    async fn missing_file_returns_error_document_without_caching() {
        let file = TempHelpFile::new();
        let catalog = CommandCatalog::new(&file.0);

        let document = catalog.commands().await;
        assert_eq!(document["error"], "Failed to load command data");
        assert_eq!(document["metadata"]["totalCommands"], 0);
        assert_eq!(document["metadata"]["categories"], 0);

        file.write(&help(3));
        assert_eq!(catalog.commands().await, help(3));
    }

    #[tokio::test]
    async fn invalid_metadata_is_rejected() {
        let file = TempHelpFile::new();
        file.write(&json!({ "metadata": { "totalCommands": "ten", "categories": 2 } }));
        let catalog = CommandCatalog::new(&file.0);

        assert_eq!(catalog.commands().await, error_document());
    }

    #[tokio::test]
    async fn invalid_json_is_rejected() {
        let file = TempHelpFile::new();
        std::fs::write(&file.0, "{ not json").unwrap();
        let catalog = CommandCatalog::new(&file.0);

        assert_eq!(catalog.commands().await, error_document());
    }

    #[tokio::test]
    async fn clones_share_the_cache() {
        let file = TempHelpFile::new();
        file.write(&help(5));
        let catalog = CommandCatalog::new(&file.0);
        catalog.warm().await;

        std::fs::remove_file(&file.0).unwrap();

        assert_eq!(catalog.clone().commands().await, help(5));

        catalog.clear().await;
        assert_eq!(catalog.commands().await, error_document());
    }
}
