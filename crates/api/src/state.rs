use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::domain::DomainError;
use crate::storage::S3Presigner;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    config: Arc<AppConfig>,
    storage: Option<S3Presigner>,
}

impl AppState {
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let storage = S3Presigner::from_config(&config.storage);
        if storage.is_none() {
            tracing::warn!("AWS credentials not configured; attachment uploads are disabled");
        }

        Self {
            db,
            config: Arc::new(config),
            storage,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn storage(&self) -> Result<&S3Presigner, DomainError> {
        self.storage.as_ref().ok_or(DomainError::StorageUnavailable)
    }
}
