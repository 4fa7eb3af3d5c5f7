use std::env;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEnv {
    Development,
    Production,
    Test,
}

impl NodeEnv {
    pub fn is_production(&self) -> bool {
        *self == NodeEnv::Production
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    /// `DATABASE_URL` wins over the individual parts when set.
    pub url_override: Option<String>,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        match &self.url_override {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                urlencoding::encode(&self.user),
                urlencoding::encode(&self.password),
                self.host,
                self.port,
                self.name
            ),
        }
    }
}

#[derive(Clone)]
pub struct StorageConfig {
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub bucket: String,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "***"))
            .field("bucket", &self.bucket)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub node_env: NodeEnv,
    pub api_port: u16,
    /// Frontend origin; the only origin CORS allows.
    pub public_base_url: String,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub introspection: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let or = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        let node_env = match var("NODE_ENV").as_deref() {
            None | Some("development") => NodeEnv::Development,
            Some("production") => NodeEnv::Production,
            Some("test") => NodeEnv::Test,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "NODE_ENV",
                    value: other.to_string(),
                    reason: "expected development, production or test".to_string(),
                })
            }
        };

        let public_base_url = or("PUBLIC_BASE_URL", "http://localhost:3000");
        Url::parse(&public_base_url).map_err(|e| ConfigError::Invalid {
            name: "PUBLIC_BASE_URL",
            value: public_base_url.clone(),
            reason: e.to_string(),
        })?;

        let introspection = match var("GQL_INTROSPECTION") {
            Some(v) => v == "true",
            None => !node_env.is_production(),
        };

        Ok(Self {
            node_env,
            api_port: parse_number("API_PORT", var("API_PORT"), 4000)?,
            public_base_url,
            database: DatabaseConfig {
                host: or("DB_HOST", "localhost"),
                port: parse_number("DB_PORT", var("DB_PORT"), 5432)?,
                name: or("DB_NAME", "playnote"),
                user: or("DB_USER", "playnote"),
                password: or("DB_PASSWORD", "playnote"),
                url_override: var("DATABASE_URL"),
                max_connections: parse_number(
                    "DATABASE_MAX_CONNECTIONS",
                    var("DATABASE_MAX_CONNECTIONS"),
                    30,
                )?,
            },
            storage: StorageConfig {
                region: var("AWS_REGION"),
                access_key_id: var("AWS_ACCESS_KEY_ID"),
                secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
                bucket: or("S3_BUCKET", "playnote-attachments"),
            },
            introspection,
        })
    }
}

fn parse_number<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
