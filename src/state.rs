use crate::config::AppConfig;
use crate::storage::{LocalStorage, StorageClient};
use crate::store::Db;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Db>,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let storage = LocalStorage::new(&config.upload_dir).await?;
        info!(dir = %storage.root().display(), "upload storage ready");
        Ok(Self::from_parts(
            Arc::new(Db::new()),
            Arc::new(config),
            Arc::new(storage),
        ))
    }

    pub fn from_parts(db: Arc<Db>, config: Arc<AppConfig>, storage: Arc<dyn StorageClient>) -> Self {
        Self {
            db,
            config,
            storage,
        }
    }

    /// Isolated state for tests: empty stores, fixed JWT settings, no-op storage.
    #[cfg(test)]
    pub fn fake() -> Self {
        use async_trait::async_trait;
        use bytes::Bytes;

        #[derive(Clone)]
        struct FakeStorage;
        #[async_trait]
        impl StorageClient for FakeStorage {
            async fn put_object(&self, _k: &str, _b: Bytes, _ct: &str) -> anyhow::Result<()> {
                Ok(())
            }
            async fn delete_object(&self, _k: &str) -> anyhow::Result<()> {
                Ok(())
            }
            fn public_url(&self, k: &str) -> String {
                format!("/uploads/{}", k)
            }
        }

        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            cors_origin: None,
            upload_dir: std::env::temp_dir(),
            seed_demo_data: false,
        });

        Self::from_parts(Arc::new(Db::new()), config, Arc::new(FakeStorage))
    }
}
