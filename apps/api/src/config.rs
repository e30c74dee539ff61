use anyhow::{Context, Result};

/// S3-compatible object storage settings. Absent bucket means uploads stay in memory.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a present variable cannot be parsed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string for the document store. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub s3: Option<S3Config>,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on the profile image download made while rendering a PDF.
    pub image_fetch_timeout_secs: u64,
    /// Lifetime of presigned image URLs handed back to clients.
    pub presign_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let s3 = match optional_env("S3_BUCKET") {
            Some(bucket) => Some(S3Config {
                bucket,
                endpoint: optional_env("S3_ENDPOINT"),
                region: optional_env("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            }),
            None => None,
        };

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            s3,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            image_fetch_timeout_secs: parse_env("IMAGE_FETCH_TIMEOUT_SECS", 10)
                .context("IMAGE_FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
            presign_ttl_secs: parse_env("PRESIGN_TTL_SECS", 3600)
                .context("PRESIGN_TTL_SECS must be a whole number of seconds")?,
        })
    }

    /// Configuration with every external backend disabled.
    pub fn local() -> Self {
        Config {
            database_url: None,
            s3: None,
            port: 8080,
            rust_log: "info".to_string(),
            image_fetch_timeout_secs: 10,
            presign_ttl_secs: 3600,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => Ok(raw.trim().parse::<T>()?),
        None => Ok(default),
    }
}
