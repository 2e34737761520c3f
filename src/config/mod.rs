use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    /// Full connection string; takes precedence over the user/pass/host parts
    pub uri: Option<String>,
    pub user: String,
    pub password: String,
    pub host: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_days: i64,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("BIND_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("STORE_BACKEND") {
            self.database.backend = match v.to_ascii_lowercase().as_str() {
                "memory" => StoreBackend::Memory,
                "mongo" | "mongodb" => StoreBackend::Mongo,
                _ => self.database.backend,
            };
        }
        if let Ok(v) = env::var("MONGODB_URI") {
            if !v.trim().is_empty() {
                self.database.uri = Some(v);
            }
        }
        if let Ok(v) = env::var("DB_USER") {
            self.database.user = v;
        }
        if let Ok(v) = env::var("DB_PASS") {
            self.database.password = v;
        }
        if let Ok(v) = env::var("DB_HOST") {
            self.database.host = v;
        }
        if let Ok(v) = env::var("DB_NAME") {
            self.database.name = v;
        }

        // Security overrides
        if let Ok(v) = env::var("ACCESS_TOKEN_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_DAYS") {
            self.security.jwt_expiry_days = v.parse().unwrap_or(self.security.jwt_expiry_days);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    pub(crate) fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig::defaults(StoreBackend::Mongo),
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_days: 30,
                cors_origins: vec!["*".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            ..Self::development()
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }
}

impl DatabaseConfig {
    const DEFAULT_HOST: &'static str = "cluster0.dgljxbc.mongodb.net";
    const DEFAULT_NAME: &'static str = "npinternational";

    fn defaults(backend: StoreBackend) -> Self {
        Self {
            backend,
            uri: None,
            user: String::new(),
            password: String::new(),
            host: Self::DEFAULT_HOST.to_string(),
            name: Self::DEFAULT_NAME.to_string(),
        }
    }

    /// Connection string for the hosted cluster. Credentials are percent-encoded.
    pub fn connection_uri(&self) -> Result<String, url::ParseError> {
        if let Some(uri) = &self.uri {
            return Ok(uri.clone());
        }

        let mut url = url::Url::parse(&format!("mongodb+srv://{}/", self.host))?;
        if !self.user.is_empty() {
            // set_username only fails for cannot-be-a-base urls, which a host url never is
            let _ = url.set_username(&self.user);
            let _ = url.set_password(Some(&self.password));
        }
        url.query_pairs_mut()
            .append_pair("retryWrites", "true")
            .append_pair("w", "majority");
        Ok(url.into())
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
