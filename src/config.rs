use anyhow::{bail, Context};
use base64ct::{Base64, Encoding};
use rand::{rngs::OsRng, RngCore};
use serde::Deserialize;

pub const DEFAULT_TTL_SECONDS: i64 = 900;
/// One year.
pub const MAX_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// When false, `POST /survey` accepts anonymous callers and surveys are stored without an owner.
    pub auth_enabled: bool,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set; generated a process-lifetime key, tokens will not survive a restart");
                generate_secret()
            }
        };
        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "surveys".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "surveys-api".into()),
            ttl_seconds: parse_ttl(std::env::var("JWT_TTL_SECONDS").ok().as_deref())?,
        };
        let auth_enabled = std::env::var("AUTH_ENABLED")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);
        let db_max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        Ok(Self {
            database_url,
            db_max_connections,
            auth_enabled,
            jwt,
        })
    }
}

fn parse_ttl(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_TTL_SECONDS);
    };
    let ttl: i64 = raw
        .parse()
        .with_context(|| format!("JWT_TTL_SECONDS is not an integer: {raw:?}"))?;
    if !(1..=MAX_TTL_SECONDS).contains(&ttl) {
        bail!("JWT_TTL_SECONDS must be between 1 and {MAX_TTL_SECONDS}, got {ttl}");
    }
    Ok(ttl)
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    Base64::encode_string(&bytes)
}
