use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// Load configuration from files and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // base configuration file
            .add_source(File::with_name("config").required(false))
            // environment specific configuration file
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // environment variable overrides
            .add_source(
                Environment::with_prefix("ESSAYSYSTEM")
                    .separator("_")
                    .try_parsing(true),
            );

        // well-known environment variables
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("upload.public_base_url", std::env::var("PUBLIC_BASE_URL").ok())?
            .set_override_option("ocr.api_key", std::env::var("VISION_API_KEY").ok())?
            .set_override_option("ai.api_key", std::env::var("GEMINI_API_KEY").ok())?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        // worker count defaults to the CPU count, capped by max_workers
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        app_config.validate()?;

        Ok(app_config)
    }

    /// Reject configurations that cannot possibly serve requests.
    /// The AI credentials are checked here so that a misconfigured
    /// deployment fails at startup rather than on the first pipeline call.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret is not set (JWT_SECRET)".to_string(),
            ));
        }
        if self.ocr.api_key.is_empty() {
            return Err(ConfigError::Message(
                "ocr.api_key is not set (VISION_API_KEY)".to_string(),
            ));
        }
        if self.ai.api_key.is_empty() {
            return Err(ConfigError::Message(
                "ai.api_key is not set (GEMINI_API_KEY)".to_string(),
            ));
        }
        Ok(())
    }

    /// Global configuration instance
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// Initialize the configuration (called once at application startup)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}
