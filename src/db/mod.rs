use crate::config::SecurityConfig;
use crate::models::{
    Case, CaseAttachments, CaseFields, CaseWithProceedings, Proceeding, ProceedingFields,
};
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        // Every pooled connection to `:memory:` would see its own empty database.
        if in_memory {
            opt.max_connections(1).min_connections(1);
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn case_repo(&self) -> repositories::case::CaseRepository {
        repositories::case::CaseRepository::new(self.conn.clone())
    }

    fn proceeding_repo(&self) -> repositories::proceeding::ProceedingRepository {
        repositories::proceeding::ProceedingRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Cases
    // ========================================================================

    pub async fn list_cases(&self) -> Result<Vec<Case>> {
        self.case_repo().list_all().await
    }

    pub async fn get_case(&self, id: i32) -> Result<Option<Case>> {
        self.case_repo().get(id).await
    }

    pub async fn get_case_with_proceedings(&self, id: i32) -> Result<Option<CaseWithProceedings>> {
        self.case_repo().get_with_proceedings(id).await
    }

    pub async fn insert_case(&self, fields: &CaseFields, attachments: CaseAttachments) -> Result<Case> {
        self.case_repo().insert(fields, attachments).await
    }

    pub async fn update_case(
        &self,
        id: i32,
        fields: &CaseFields,
        attachments: CaseAttachments,
    ) -> Result<Option<Case>> {
        self.case_repo().update(id, fields, attachments).await
    }

    pub async fn delete_case_cascade(&self, id: i32) -> Result<Option<Case>> {
        self.case_repo().delete_cascade(id).await
    }

    // ========================================================================
    // Proceedings
    // ========================================================================

    pub async fn get_proceeding(&self, id: i32) -> Result<Option<Proceeding>> {
        self.proceeding_repo().get(id).await
    }

    pub async fn insert_proceeding(&self, case_id: i32, fields: ProceedingFields) -> Result<Proceeding> {
        self.proceeding_repo().insert(case_id, fields).await
    }

    pub async fn update_proceeding(
        &self,
        id: i32,
        fields: ProceedingFields,
    ) -> Result<Option<Proceeding>> {
        self.proceeding_repo().update(id, fields).await
    }

    pub async fn delete_proceeding(&self, id: i32) -> Result<bool> {
        self.proceeding_repo().delete(id).await
    }

    pub async fn count_proceedings_for_case(&self, case_id: i32) -> Result<u64> {
        self.proceeding_repo().count_for_case(case_id).await
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo().create(username, password, config).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(username, password).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("casetrack-store-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_new_creates_missing_parent_directories() {
        let db_path = temp_root().join("nested").join("data").join("cases.db");

        let store = Store::new(&format!("sqlite:{}", db_path.display()))
            .await
            .unwrap();
        store.ping().await.unwrap();

        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_new_reports_unusable_database_directory() {
        let root = temp_root();
        std::fs::create_dir_all(&root).unwrap();
        let blocker = root.join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        let db_path = blocker.join("cases.db");
        let Err(err) = Store::new(&format!("sqlite:{}", db_path.display())).await else {
            panic!("expected an error when the parent is a file");
        };

        assert!(
            format!("{err:#}").contains("Failed to create database directory"),
            "{err:#}"
        );
    }
}
