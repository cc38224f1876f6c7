use crate::error::StartupError;
use logitrack::auth::defaults::ADMIN_ROLE;
use logitrack::auth::sled_repository::open_identity_db;
use logitrack::auth::{
    AuthError, AuthService, RoleRepository, RoleService, SessionStore, SledRoleRepository,
    SledUserRepository, UserRepository, UserService,
};
use logitrack::domain::CacheConfig;
use logitrack::persistence::{MemoryStore, SledStore};
use logitrack::ports::{CacheStore, InventoryStore, StorageFactory};
use logitrack::seed::seed_sample_data;
use logitrack::{CacheKey, CachedSnapshot, InventoryRepository};
use shared::config::{Config, StoreBackend};
use std::path::Path;
use std::sync::Arc;
use storage_engine::CacheFactory;
use tracing::info;

// The repository only ever holds the two snapshot keys
const SNAPSHOT_CACHE_CAPACITY: u64 = 16;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: InventoryRepository,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub role_service: Arc<RoleService>,
    pub session_store: Arc<SessionStore>,
}

impl AppState {
    /// Open the stores under `config.data_dir`, build the snapshot cache and
    /// make sure the default roles and admin account exist
    pub async fn from_config(config: &Config) -> Result<Self, StartupError> {
        let data_dir = Path::new(&config.data_dir);
        std::fs::create_dir_all(data_dir)?;

        let store: Arc<dyn InventoryStore> = match config.store {
            StoreBackend::Sled => {
                let path = data_dir.join("inventory.sled");
                info!("Opening sled store at {}", path.display());
                Arc::new(SledStore::new(path)?)
            }
            StoreBackend::Memory => {
                info!("Using in-memory store; data is lost on shutdown");
                Arc::new(MemoryStore::new())
            }
        };

        let cache_config = CacheConfig::new(
            "snapshots",
            config.cache_backend,
            config.cache_ttl,
            Some(SNAPSHOT_CACHE_CAPACITY),
        );
        let cache: Arc<dyn CacheStore<CacheKey, CachedSnapshot>> =
            CacheFactory::new().create_from_config(&cache_config);
        let repository = InventoryRepository::new(store, cache, config.cache_ttl);

        let (auth_service, user_service, role_service) =
            init_auth_system(data_dir, config).await?;

        let session_store = Arc::new(SessionStore::new(config.session_ttl, None));

        if config.seed_sample_data && seed_sample_data(&repository).await? {
            info!("Sample data seeded");
        }

        Ok(Self {
            repository,
            auth_service,
            user_service,
            role_service,
            session_store,
        })
    }
}

async fn init_auth_system(
    data_dir: &Path,
    config: &Config,
) -> Result<(Arc<AuthService>, Arc<UserService>, Arc<RoleService>), StartupError> {
    let db = open_identity_db(data_dir.join("identity.sled"))?;
    let user_repo: Arc<dyn UserRepository> = Arc::new(SledUserRepository::new(db.clone()));
    let role_repo: Arc<dyn RoleRepository> = Arc::new(SledRoleRepository::new(db));

    let auth_service = Arc::new(AuthService::new(user_repo.clone(), role_repo.clone()));
    let user_service = Arc::new(UserService::new(user_repo.clone(), role_repo.clone()));
    let role_service = Arc::new(RoleService::new(user_repo, role_repo));

    info!("Initializing default roles...");
    let default_roles = role_service.initialize_default_roles().await?;
    let admin_role = default_roles
        .iter()
        .find(|r| r.name == ADMIN_ROLE)
        .ok_or_else(|| AuthError::RoleNotFound(ADMIN_ROLE.to_string()))?;

    user_service
        .ensure_admin(&config.admin_username, &config.admin_password, &admin_role.id)
        .await?;

    Ok((auth_service, user_service, role_service))
}
