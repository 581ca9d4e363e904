//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{BootstrapConfig, SecurityConfig};
use crate::db::Store;
use crate::domain::UserId;
use crate::services::auth_service::{AuthError, AuthService, UserInfo};
use crate::validation;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    bootstrap: BootstrapConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig, bootstrap: BootstrapConfig) -> Self {
        Self {
            store,
            security,
            bootstrap,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, username: &str, password: &str) -> Result<UserInfo, AuthError> {
        validation::validate_username(username)?;
        validation::validate_password(password)?;

        if self.store.get_user_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let user = self
            .store
            .create_user(username, password, &self.security)
            .await?
            .ok_or(AuthError::UsernameTaken)?;

        info!("New user registered: {}", user.username);
        Ok(UserInfo::from(user))
    }

    async fn login(&self, username: &str, password: &str) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .verify_user_password(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(UserInfo::from(user))
    }

    async fn get_user(&self, id: UserId) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user_by_id(id.value())
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserInfo::from(user))
    }

    async fn ensure_bootstrap_user(&self) -> Result<Option<UserInfo>, AuthError> {
        if !self.bootstrap.enabled || self.store.count_users().await? > 0 {
            return Ok(None);
        }

        let Some(user) = self
            .store
            .create_user(
                &self.bootstrap.username,
                &self.bootstrap.password,
                &self.security,
            )
            .await?
        else {
            return Ok(None);
        };

        warn!(
            "Default user '{}' created with the configured seed password. Change it or disable [bootstrap] before exposing this service.",
            user.username
        );
        Ok(Some(UserInfo::from(user)))
    }
}
