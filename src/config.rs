use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use dotenvy::dotenv;
use strum_macros::{Display, EnumString};

/// Which backend answers the parent / student / attendance lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StoreBackend {
    /// Direct MySQL connection through sqlx
    Sql,
    /// Hosted PostgREST-style endpoint
    Rest,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub jwt_secret: String,

    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub rest_url: Option<String>,
    pub rest_api_key: Option<String>,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    /// Offset applied to attendance timestamps before they are displayed
    pub display_utc_offset_minutes: i32,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source. `from_env` feeds it the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));

        let store_backend = parse_or(&lookup, "STORE_BACKEND", StoreBackend::Sql)?;
        let database_url = lookup("DATABASE_URL");
        let rest_url = lookup("REST_URL");
        let rest_api_key = lookup("REST_API_KEY");

        match store_backend {
            StoreBackend::Sql if database_url.is_none() => {
                bail!("DATABASE_URL must be set when STORE_BACKEND=sql")
            }
            StoreBackend::Rest if rest_url.is_none() || rest_api_key.is_none() => {
                bail!("REST_URL and REST_API_KEY must be set when STORE_BACKEND=rest")
            }
            _ => {}
        }

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            jwt_secret: required("JWT_SECRET")?,
            store_backend,
            database_url,
            rest_url,
            rest_api_key,
            rate_protected_per_min: parse_or(&lookup, "RATE_PROTECTED_PER_MIN", 1000)?,
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            display_utc_offset_minutes: parse_or(&lookup, "DISPLAY_UTC_OFFSET_MINUTES", 0)?,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
