//! CLI subcommand implementations.

pub mod init;
pub mod packs;
pub mod query;
pub mod show;
pub mod validate;

use packloom_config::AppConfig;
use packloom_core::DocumentStore;
use packloom_store::FileStore;
use std::sync::Arc;

/// Open the document store named in the configuration.
pub(crate) async fn open_store(
    config: &AppConfig,
) -> Result<Arc<dyn DocumentStore>, Box<dyn std::error::Error>> {
    match config.store.backend.as_str() {
        "file" => {
            let store = FileStore::open(&config.store.corpus_dir, &config.packing.separator)?;
            for warning in store.warnings() {
                tracing::warn!("{warning}");
            }
            Ok(Arc::new(store))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let path = config
                .store
                .sqlite_path
                .clone()
                .unwrap_or_else(|| AppConfig::config_dir().join("packloom.sqlite"));
            let store = packloom_store::SqliteStore::new(&path.to_string_lossy()).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => Err("sqlite backend requires the `sqlite` feature".into()),
        other => Err(format!(
            "Unknown store backend '{other}' — expected \"file\" or \"sqlite\""
        )
        .into()),
    }
}
