use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime};
use tokio_postgres::NoTls;

pub const DEFAULT_UPLOAD_ROOT: &str = "/var/www/upload";
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_POOL_SIZE: usize = 16;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub pg_host: String,
    pub pg_user: String,
    pub pg_pass: Option<String>,
    pub pg_db: String,
    pub pg_pool_size: usize,
    pub upload_root: PathBuf,
    pub max_image_bytes: usize,
    pub serve_images: bool,
    pub port: u16,
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", key, v)),
        _ => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests never touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            pg_host: lookup("PG_HOST").context("PG_HOST not set")?,
            pg_user: lookup("PG_USER").context("PG_USER not set")?,
            pg_pass: lookup("PG_PASS"),
            pg_db: lookup("PG_DB").context("PG_DB not set")?,
            pg_pool_size: parse_or("PG_POOL_SIZE", lookup("PG_POOL_SIZE"), DEFAULT_POOL_SIZE)?,
            upload_root: lookup("UPLOAD_ROOT")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_ROOT)),
            max_image_bytes: parse_or(
                "MAX_IMAGE_BYTES",
                lookup("MAX_IMAGE_BYTES"),
                DEFAULT_MAX_IMAGE_BYTES,
            )?,
            serve_images: parse_or("SERVE_IMAGES", lookup("SERVE_IMAGES"), true)?,
            port: parse_or("PORT", lookup("PORT"), 8080)?,
        })
    }
}

pub fn get_pg_pool(app: &AppConfig) -> Result<Pool> {
    let mut cfg = Config::new();
    cfg.host = Some(app.pg_host.clone());
    cfg.user = Some(app.pg_user.clone());
    cfg.password = app.pg_pass.clone();
    cfg.dbname = Some(app.pg_db.clone());

    if cfg.pool.is_none() {
        cfg.pool = Some(PoolConfig::default());
    }
    if let Some(ref mut pcfg) = cfg.pool {
        pcfg.max_size = app.pg_pool_size;
    }

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .context("failed to create postgres pool")
}
