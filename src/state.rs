use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CaseService, ProceedingService, SeaOrmAuthService, SeaOrmCaseService,
    SeaOrmProceedingService, UploadStore,
};

/// Long-lived services shared by every request.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub uploads: Arc<UploadStore>,

    pub auth_service: Arc<dyn AuthService>,

    pub case_service: Arc<dyn CaseService>,

    pub proceeding_service: Arc<dyn ProceedingService>,
}

impl SharedState {
    /// Connects the database, applies migrations, prepares the upload
    /// directory and creates the bootstrap user if the users table is empty.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let uploads = Arc::new(UploadStore::new(&config.uploads));
        uploads.ensure_root().await?;
        info!("Upload directory: {}", uploads.root().display());

        let auth_service: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
            config.bootstrap.clone(),
        ));
        auth_service.ensure_bootstrap_user().await?;

        let case_service: Arc<dyn CaseService> =
            Arc::new(SeaOrmCaseService::new(store.clone(), uploads.clone()));
        let proceeding_service: Arc<dyn ProceedingService> =
            Arc::new(SeaOrmProceedingService::new(store.clone()));

        Ok(Self {
            config: Arc::new(config),
            store,
            uploads,
            auth_service,
            case_service,
            proceeding_service,
        })
    }
}
