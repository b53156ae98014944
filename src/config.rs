use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{Context, bail};

use crate::catalog::Limits;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub max_connections: u32,
    pub store_timeout: Duration,
    pub acquire_timeout: Duration,
    pub limits: Limits,
    pub run_migrations: bool,
    pub public_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").unwrap_or_else(|| "8080".to_string()).parse().context("PORT")?;

        let database_url = var("DATABASE_URL").map(|s| s.trim().to_string()).unwrap_or_default();
        if database_url.is_empty() {
            bail!("DATABASE_URL must be set to the catalog database connection string");
        }

        let max_connections: u32 = parse_or(&var, "DB_MAX_CONNECTIONS", 10)?;
        if max_connections == 0 {
            bail!("DB_MAX_CONNECTIONS must be positive");
        }
        let store_timeout_ms: u64 = parse_or(&var, "STORE_TIMEOUT_MS", 5_000)?;
        let acquire_timeout_ms: u64 = parse_or(&var, "DB_ACQUIRE_TIMEOUT_MS", store_timeout_ms)?;

        let default_page_size: u64 = parse_or(&var, "DEFAULT_PAGE_SIZE", 20)?;
        let max_page_size: u64 = parse_or(&var, "MAX_PAGE_SIZE", 100)?;
        if default_page_size == 0 || max_page_size == 0 {
            bail!("DEFAULT_PAGE_SIZE and MAX_PAGE_SIZE must be positive");
        }

        let run_migrations: bool = parse_or(&var, "RUN_MIGRATIONS", true)?;
        let public_dir = var("PUBLIC_DIR").unwrap_or_else(|| "public".to_string()).into();

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            max_connections,
            store_timeout: Duration::from_millis(store_timeout_ms),
            acquire_timeout: Duration::from_millis(acquire_timeout_ms),
            limits: Limits { default: default_page_size.min(max_page_size), max: max_page_size },
            run_migrations,
            public_dir,
        })
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("{key}={raw:?}")),
        None => Ok(default),
    }
}
