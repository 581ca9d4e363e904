use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthError, AuthService, SeaOrmAuthService};

pub async fn cmd_add_user(config: &Config, username: &str, password: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let auth = SeaOrmAuthService::new(store, config.security.clone(), config.bootstrap.clone());

    match auth.register(username, password).await {
        Ok(user) => {
            println!("✓ Created user '{}' (ID: {})", user.username, user.id);
            Ok(())
        }
        Err(AuthError::UsernameTaken) => anyhow::bail!("User '{username}' already exists"),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        let root = std::env::temp_dir().join(format!("casetrack-cli-{}", uuid::Uuid::new_v4()));
        let mut config = Config::default();
        config.general.database_path = format!("sqlite:{}", root.join("test.db").display());
        config.security.argon2_memory_cost_kib = 1024;
        config.security.argon2_time_cost = 1;
        config
    }

    #[tokio::test]
    async fn test_add_user_creates_login() {
        let config = test_config();

        cmd_add_user(&config, "clerk", "secret1").await.unwrap();

        let store = Store::new(&config.general.database_path).await.unwrap();
        assert!(store.get_user_by_username("clerk").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_add_user_fails_on_invalid_credentials() {
        let config = test_config();

        let err = cmd_add_user(&config, "ab", "x").await.unwrap_err();
        assert!(
            format!("{err:#}").contains("Username must be at least 3 characters"),
            "{err:#}"
        );
    }

    #[tokio::test]
    async fn test_add_user_fails_on_duplicate() {
        let config = test_config();

        cmd_add_user(&config, "clerk", "secret1").await.unwrap();
        assert!(cmd_add_user(&config, "clerk", "secret2").await.is_err());
    }
}
