use std::time::Duration;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Sled,   // durable, under data_dir
    Memory, // process-local tables
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheBackend {
    Ttl,  // dashmap table with lazy expiry
    Moka, // moka with per-entry expiry
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub data_dir: String,
    pub store: StoreBackend,
    pub cache_backend: CacheBackend,
    pub cache_ttl: Duration,
    pub session_ttl: Duration,
    pub admin_username: String,
    pub admin_password: String,
    pub allowed_origins: Vec<String>,
    pub seed_sample_data: bool,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 8080;
    const DEFAULT_ADMIN_USERNAME: &str = "admin";
    const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
    const DEFAULT_DATA_DIR: &str = "./data";
    const DEFAULT_CACHE_TTL_SECS: u64 = 300;
    const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

    pub fn from_env() -> Self {
        let host =
            std::env::var("LOGITRACK_HOST").unwrap_or_else(|_| Self::DEFAULT_HOST.to_string());
        let http_port = std::env::var("LOGITRACK_HTTP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(Self::DEFAULT_HTTP_PORT);
        let cache_ttl_secs = std::env::var("LOGITRACK_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_CACHE_TTL_SECS);
        let session_ttl_secs = std::env::var("LOGITRACK_SESSION_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_SESSION_TTL_SECS);

        Self {
            host,
            http_port,
            data_dir: std::env::var("LOGITRACK_DATA_DIR")
                .unwrap_or_else(|_| Self::DEFAULT_DATA_DIR.to_string()),
            store: match std::env::var("LOGITRACK_STORE").as_deref() {
                Ok("memory") => StoreBackend::Memory,
                _ => StoreBackend::Sled,
            },
            cache_backend: match std::env::var("LOGITRACK_CACHE_BACKEND").as_deref() {
                Ok("moka") => CacheBackend::Moka,
                _ => CacheBackend::Ttl,
            },
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            session_ttl: Duration::from_secs(session_ttl_secs),
            admin_username: std::env::var("LOGITRACK_ADMIN_USERNAME")
                .unwrap_or_else(|_| Self::DEFAULT_ADMIN_USERNAME.to_string()),
            admin_password: std::env::var("LOGITRACK_ADMIN_PASSWORD").unwrap_or_else(|_| {
                warn!("LOGITRACK_ADMIN_PASSWORD not set, using default password 'admin123'");
                warn!("Please change the default admin password immediately!");
                Self::DEFAULT_ADMIN_PASSWORD.to_string()
            }),
            allowed_origins: std::env::var("LOGITRACK_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            seed_sample_data: std::env::var("LOGITRACK_SEED_SAMPLE_DATA")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}
