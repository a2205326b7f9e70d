use std::net::SocketAddr;
use std::path::Path;

use hashgate_crypto::DigestAlgorithm;
use hashgate_store::{S3Settings, DEFAULT_CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Gateway configuration.
///
/// Resolved once at startup: defaults, then an optional TOML file, then the
/// process environment. Never mutated afterwards.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub bucket: String,
    /// Value the `key` request header must equal on protected routes.
    pub secret_key: String,
    pub s3: S3Settings,
    pub algorithm: DigestAlgorithm,
    pub content_type: String,
    pub max_concurrent_requests: usize,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5002)),
            bucket: String::new(),
            secret_key: String::new(),
            s3: S3Settings::default(),
            algorithm: DigestAlgorithm::default(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            max_concurrent_requests: 16,
            request_timeout_secs: 120,
        }
    }
}

impl ServerConfig {
    /// Defaults, overlaid with `path` if given, overlaid with the environment.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        if let Ok(dotenv) = dotenvy::dotenv() {
            tracing::debug!(path = %dotenv.display(), "loaded .env");
        }
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Overlay values found through `var`. Unset variables leave fields alone.
    pub fn apply_env<F>(&mut self, var: F) -> ServerResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = var("BIND_ADDR") {
            self.bind_addr = addr
                .parse()
                .map_err(|e| ServerError::Config(format!("BIND_ADDR {addr:?}: {e}")))?;
        }
        if let Some(bucket) = var("BUCKET_NAME") {
            self.bucket = bucket;
        }
        if let Some(secret) = var("SECRET_KEY") {
            self.secret_key = secret;
        }
        if let Some(url) = var("ENDPOINT_URL") {
            self.s3.endpoint_url = Some(url);
        }
        if let Some(region) = var("REGION_NAME") {
            self.s3.region = Some(region);
        }
        if let Some(id) = var("AWS_ACCESS_KEY_ID") {
            self.s3.access_key_id = Some(id);
        }
        if let Some(secret) = var("AWS_SECRET_ACCESS_KEY") {
            self.s3.secret_access_key = Some(secret);
        }
        if let Some(flag) = var("S3_FORCE_PATH_STYLE") {
            self.s3.force_path_style = parse_env("S3_FORCE_PATH_STYLE", &flag)?;
        }
        if let Some(name) = var("HASH_ALGORITHM") {
            self.algorithm = name
                .parse()
                .map_err(|e| ServerError::Config(format!("HASH_ALGORITHM: {e}")))?;
        }
        if let Some(n) = var("MAX_CONCURRENT_REQUESTS") {
            self.max_concurrent_requests = parse_env("MAX_CONCURRENT_REQUESTS", &n)?;
        }
        if let Some(secs) = var("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", &secs)?;
        }
        Ok(())
    }

    /// Reject configurations the gateway cannot run with.
    pub fn validate(&self) -> ServerResult<()> {
        if self.bucket.trim().is_empty() {
            return Err(ServerError::Config("BUCKET_NAME is not set".into()));
        }
        if self.secret_key.is_empty() {
            return Err(ServerError::Config("SECRET_KEY is not set".into()));
        }
        if self.max_concurrent_requests == 0 {
            return Err(ServerError::Config(
                "max_concurrent_requests must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T>(name: &str, value: &str) -> ServerResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ServerError::Config(format!("{name} {value:?}: {e}")))
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("bucket", &self.bucket)
            .field("secret_key", &"<redacted>")
            .field("s3", &self.s3)
            .field("algorithm", &self.algorithm)
            .field("content_type", &self.content_type)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}
