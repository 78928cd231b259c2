use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_KEY_PREFIX: &str = "droitfpra";

#[derive(Clone, Debug)]
pub struct ContentConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub frontend_path: PathBuf,
    pub upload_dir: PathBuf,
    pub public_upload_prefix: String,
    pub bind_addr: SocketAddr,
    pub key_prefix: String,
    // base URL of another content API to fall back on, if any
    pub remote_api_url: Option<String>,
    pub log_level: String,
}

impl ContentConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .context("Failed to determine DATABASE_URL from environment variables")?;

        let max_connections = std::env::var("MAX_CONNECTIONS")
            .ok()
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(15);

        let frontend_path = PathBuf::from(
            std::env::var("FRONTEND_DIST_PATH")
                .context("Failed to determine FRONTEND_DIST_PATH from environment variables")?,
        );

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()));

        let public_upload_prefix =
            std::env::var("PUBLIC_UPLOAD_PREFIX").unwrap_or_else(|_| "/uploads".to_string());

        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .context("Invalid BIND_ADDR")?;

        let key_prefix = std::env::var("STORAGE_KEY_PREFIX")
            .unwrap_or_else(|_| DEFAULT_KEY_PREFIX.to_string());

        let remote_api_url = std::env::var("REMOTE_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            database_url,
            max_connections,
            frontend_path,
            upload_dir,
            public_upload_prefix,
            bind_addr,
            key_prefix,
            remote_api_url,
            log_level,
        })
    }
}
