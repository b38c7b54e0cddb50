use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::NazimError;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::initial_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

const SEED_USERNAME: &str = "superadmin";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn try_cache_backend(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>, NazimError> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = try_cache_backend(cache_type).await {
        return Ok(cache);
    }
    if cache_type != "moka" {
        warn!("Falling back to Moka (in-memory) cache");
        if let Some(cache) = try_cache_backend("moka").await {
            return Ok(cache);
        }
    }

    Err(NazimError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

/// 空库时创建平台管理员
///
/// 密码取 `ADMIN_PASSWORD`，未设置时随机生成并只在日志中出现一次。
async fn seed_super_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!("Database already has {} user(s), skipping seed", count);
            return;
        }
        Ok(_) => info!("No users found, creating platform super admin"),
        Err(e) => {
            warn!("Failed to count users: {}, skipping seed", e);
            return;
        }
    }

    let password = std::env::var("ADMIN_PASSWORD")
        .ok()
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| {
            let generated = initial_password();
            warn!("ADMIN_PASSWORD not set, generated super admin password: {}", generated);
            generated
        });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash super admin password: {}", e);
            return;
        }
    };

    let request = CreateUserRequest {
        username: SEED_USERNAME.to_string(),
        email: "superadmin@localhost".to_string(),
        password: password_hash,
        role: UserRole::SuperAdmin,
        full_name: Some("Platform Administrator".to_string()),
        phone: None,
        organization_id: None,
        default_school_id: None,
    };

    match storage.create_user(request).await {
        Ok(user) => info!(
            "Super admin created (ID: {}, username: {})",
            user.id, user.username
        ),
        Err(e) => warn!("Failed to create super admin: {}", e),
    }
}

/// 准备服务器启动：存储、迁移、初始账号与缓存
pub async fn prepare_server_startup() -> Result<StartupContext, NazimError> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    debug!(
        "Registered cache backends: {:?}",
        crate::cache::register::registered_object_cache_plugins()
    );

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_super_admin(&storage).await;

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[tokio::test]
    async fn test_seed_super_admin_only_on_empty_store() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());

        seed_super_admin(&storage).await;
        seed_super_admin(&storage).await;
        assert_eq!(storage.count_users().await.unwrap(), 1);

        let admin = storage
            .get_user_by_username_or_email(SEED_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::SuperAdmin);
        assert!(admin.organization_id.is_none());
        assert_ne!(admin.password_hash, "");
    }

    #[tokio::test]
    async fn test_unknown_cache_backend() {
        assert!(try_cache_backend("memcached").await.is_none());
    }
}
