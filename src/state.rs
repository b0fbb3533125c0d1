use std::sync::Arc;

use crate::auth::{jwt::JwtKeys, services::CredentialVerifier};
use crate::config::AppConfig;
use crate::store::{MemoryStore, PgStore, SurveyStore, UserStore};
use crate::surveys::services::SurveyService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub verifier: CredentialVerifier,
    pub surveys: SurveyService,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        match &config.database_url {
            Some(url) => {
                let store = Arc::new(PgStore::connect(url, config.db_max_connections).await?);
                store.migrate().await?;
                tracing::info!("using postgres store");
                Ok(Self::from_parts(config.clone(), store.clone(), store))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store, data is lost on exit");
                let store = Arc::new(MemoryStore::new());
                Ok(Self::from_parts(config.clone(), store.clone(), store))
            }
        }
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        surveys: Arc<dyn SurveyStore>,
    ) -> Self {
        let keys = JwtKeys::from(&config.jwt);
        Self {
            verifier: CredentialVerifier::new(users, keys),
            surveys: SurveyService::new(surveys),
            config,
        }
    }

    #[cfg(test)]
    pub fn fake(auth_enabled: bool) -> Self {
        let config = Arc::new(AppConfig {
            database_url: None,
            db_max_connections: 1,
            auth_enabled,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_seconds: 900,
            },
        });
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(config, store.clone(), store)
    }
}
