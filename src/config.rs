use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HashConfig {
    /// Argon2 iteration count. Checked against the scheme's supported range
    /// when the hasher is constructed.
    pub cost: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub hash: HashConfig,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;
        let cost = match std::env::var("HASH_COST") {
            Ok(v) => v
                .parse::<u32>()
                .ok()
                .filter(|c| *c > 0)
                .with_context(|| format!("HASH_COST must be a positive integer, got '{v}'"))?,
            Err(_) => 2,
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        Ok(Self {
            database_url,
            hash: HashConfig { cost },
            jwt,
        })
    }
}
