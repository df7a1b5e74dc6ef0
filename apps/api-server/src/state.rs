//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::Services;
use quill_core::ports::Repositories;
use quill_infra::{DatabaseConfig, InMemoryStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Which backend the repositories run on, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Connect the configured store and wire every service to it.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        let (repos, storage) = repositories(db_config).await;
        tracing::info!(storage, "Application state initialized");
        Self::from_repositories(&repos, storage)
    }

    pub fn from_repositories(repos: &Repositories, storage: &'static str) -> Self {
        Self {
            services: Services::new(repos),
            storage,
        }
    }
}

fn in_memory() -> (Repositories, &'static str) {
    (Arc::new(InMemoryStore::new()).repositories(), "memory")
}

#[cfg(feature = "postgres")]
async fn repositories(db_config: Option<&DatabaseConfig>) -> (Repositories, &'static str) {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory();
    };

    match quill_infra::connect(config).await {
        Ok(db) => (quill_infra::postgres_repositories(db), "postgres"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
            in_memory()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(db_config: Option<&DatabaseConfig>) -> (Repositories, &'static str) {
    if db_config.is_some() {
        tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
    }
    in_memory()
}
