use crate::filter::FilterKind;
use anyhow::{Context, Result, bail};
use blueprints_auth::{DEFAULT_TOKEN_TTL, MAX_TOKEN_TTL};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

// Blueprints service configuration sourced from environment variables, with an
// optional YAML override file.
#[derive(Debug, Clone)]
pub struct BlueprintsConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub storage: StorageBackend,
    pub postgres: Option<PostgresConfig>,
    pub filter: FilterKind,
    pub seed_sample_data: bool,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" => Ok(StorageBackend::Postgres),
            other => bail!("unknown storage backend {other}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_ms: u64,
    pub acquire_timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub issuer: String,
    pub token_ttl: Duration,
    pub key_id: String,
    pub private_key_path: Option<PathBuf>,
    pub public_key_path: Option<PathBuf>,
    /// Install the demo accounts when `users` is empty.
    pub demo_users: bool,
    pub users: Vec<UserEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserEntry {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Default, Deserialize)]
struct BlueprintsConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    storage: Option<StorageBackend>,
    postgres: Option<PostgresConfig>,
    filter: Option<FilterKind>,
    seed_sample_data: Option<bool>,
    jwt_issuer: Option<String>,
    token_ttl_seconds: Option<u64>,
    jwt_key_id: Option<String>,
    jwt_private_key_path: Option<PathBuf>,
    jwt_public_key_path: Option<PathBuf>,
    demo_users: Option<bool>,
    users: Option<Vec<UserEntry>>,
}

impl BlueprintsConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = env_or("BLUEPRINTS_BIND", "0.0.0.0:8080")
            .parse()
            .with_context(|| "parse BLUEPRINTS_BIND")?;
        let metrics_bind = env_or("BLUEPRINTS_METRICS_BIND", "0.0.0.0:9090")
            .parse()
            .with_context(|| "parse BLUEPRINTS_METRICS_BIND")?;
        let storage = env_or("BLUEPRINTS_STORAGE", "memory")
            .parse()
            .with_context(|| "parse BLUEPRINTS_STORAGE")?;
        let postgres = match std::env::var("BLUEPRINTS_POSTGRES_URL") {
            Ok(url) => Some(PostgresConfig {
                url,
                max_connections: env_or("BLUEPRINTS_PG_MAX_CONNECTIONS", "10")
                    .parse()
                    .with_context(|| "parse BLUEPRINTS_PG_MAX_CONNECTIONS")?,
                connect_timeout_ms: env_or("BLUEPRINTS_PG_CONNECT_TIMEOUT_MS", "5000")
                    .parse()
                    .with_context(|| "parse BLUEPRINTS_PG_CONNECT_TIMEOUT_MS")?,
                acquire_timeout_ms: env_or("BLUEPRINTS_PG_ACQUIRE_TIMEOUT_MS", "5000")
                    .parse()
                    .with_context(|| "parse BLUEPRINTS_PG_ACQUIRE_TIMEOUT_MS")?,
            }),
            Err(_) => None,
        };
        let filter = env_or("BLUEPRINTS_FILTER", "identity")
            .parse::<FilterKind>()
            .map_err(anyhow::Error::msg)
            .with_context(|| "parse BLUEPRINTS_FILTER")?;
        let seed_sample_data = parse_bool("BLUEPRINTS_SEED_SAMPLE_DATA", true)?;
        let token_ttl = match std::env::var("BLUEPRINTS_TOKEN_TTL_SECONDS") {
            Ok(value) => Duration::from_secs(
                value
                    .parse()
                    .with_context(|| "parse BLUEPRINTS_TOKEN_TTL_SECONDS")?,
            ),
            Err(_) => DEFAULT_TOKEN_TTL,
        };
        let auth = AuthConfig {
            issuer: env_or("BLUEPRINTS_JWT_ISSUER", "blueprints-api"),
            token_ttl,
            key_id: env_or("BLUEPRINTS_JWT_KEY_ID", "blueprints-rs256"),
            private_key_path: std::env::var("BLUEPRINTS_JWT_PRIVATE_KEY_PATH")
                .ok()
                .map(PathBuf::from),
            public_key_path: std::env::var("BLUEPRINTS_JWT_PUBLIC_KEY_PATH")
                .ok()
                .map(PathBuf::from),
            demo_users: parse_bool("BLUEPRINTS_DEMO_USERS", true)?,
            users: Vec::new(),
        };
        let config = Self {
            bind_addr,
            metrics_bind,
            storage,
            postgres,
            filter,
            seed_sample_data,
            auth,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("BLUEPRINTS_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read BLUEPRINTS_CONFIG: {path}"))?;
            let override_cfg: BlueprintsConfigOverride = serde_yaml::from_str(&contents)
                .with_context(|| "parse blueprints config yaml")?;
            config.apply_override(override_cfg)?;
            config.validate()?;
        }
        Ok(config)
    }

    fn apply_override(&mut self, override_cfg: BlueprintsConfigOverride) -> Result<()> {
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.storage {
            self.storage = value;
        }
        if let Some(value) = override_cfg.postgres {
            self.postgres = Some(value);
        }
        if let Some(value) = override_cfg.filter {
            self.filter = value;
        }
        if let Some(value) = override_cfg.seed_sample_data {
            self.seed_sample_data = value;
        }
        if let Some(value) = override_cfg.jwt_issuer {
            self.auth.issuer = value;
        }
        if let Some(value) = override_cfg.token_ttl_seconds {
            self.auth.token_ttl = Duration::from_secs(value);
        }
        if let Some(value) = override_cfg.jwt_key_id {
            self.auth.key_id = value;
        }
        if let Some(value) = override_cfg.jwt_private_key_path {
            self.auth.private_key_path = Some(value);
        }
        if let Some(value) = override_cfg.jwt_public_key_path {
            self.auth.public_key_path = Some(value);
        }
        if let Some(value) = override_cfg.demo_users {
            self.auth.demo_users = value;
        }
        if let Some(value) = override_cfg.users {
            self.auth.users = value;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.auth.token_ttl.is_zero() {
            bail!("token ttl must be greater than zero");
        }
        if self.auth.token_ttl > MAX_TOKEN_TTL {
            bail!(
                "token ttl must not exceed {} seconds",
                MAX_TOKEN_TTL.as_secs()
            );
        }
        if self.auth.private_key_path.is_some() != self.auth.public_key_path.is_some() {
            bail!(
                "BLUEPRINTS_JWT_PRIVATE_KEY_PATH and BLUEPRINTS_JWT_PUBLIC_KEY_PATH must be set together"
            );
        }
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(key: &str, default: bool) -> Result<bool> {
    match std::env::var(key) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => bail!("parse {key}: expected a boolean, got {other}"),
        },
        Err(_) => Ok(default),
    }
}
