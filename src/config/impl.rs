use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 常用部署变量 -> 配置键
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("JWT_SECRET", "jwt.secret"),
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.redis.url"),
    ("REDIS_KEY_PREFIX", "cache.redis.key_prefix"),
    ("UPLOAD_DIR", "upload.dir"),
];

impl AppConfig {
    /// 加载顺序：config.toml、config.{APP_ENV}.toml、NAZIM_* 环境变量、部署变量
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{environment}")).required(false))
            .add_source(
                Environment::with_prefix("NAZIM")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers.max(1));
        }
        if app_config.is_production() && app_config.jwt.secret.len() < 32 {
            return Err(ConfigError::Message(
                "jwt.secret must be at least 32 characters in production".to_string(),
            ));
        }

        Ok(app_config)
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 计算图书逾期罚款
    pub fn library_fine(&self, overdue_days: i64) -> f64 {
        if overdue_days <= 0 {
            0.0
        } else {
            overdue_days as f64 * self.library.fine_per_day
        }
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        toml_config(include_str!("../../config.toml"))
    }

    fn toml_config(content: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(content, config::FileFormat::Toml))
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("sample config should deserialize")
    }

    #[test]
    fn test_sample_config_loads() {
        let config = sample_config();
        assert_eq!(config.server_bind_address(), "127.0.0.1:8080");
        assert_eq!(config.cache.cache_type, "moka");
        assert!(config.library.loan_days > 0);
    }

    #[test]
    fn test_environment_flags() {
        let mut config = sample_config();
        config.app.environment = "production".to_string();
        assert!(config.is_production());
        assert!(!config.is_development());
    }

    #[test]
    fn test_library_fine() {
        let mut config = sample_config();
        config.library.fine_per_day = 5.0;
        assert_eq!(config.library_fine(0), 0.0);
        assert_eq!(config.library_fine(-3), 0.0);
        assert_eq!(config.library_fine(4), 20.0);
    }
}
