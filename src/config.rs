use std::path::PathBuf;

const DEFAULT_APP_NAME: &str = "Chapelle";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_UPLOAD_DIR: &str = "data/uploads";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_MAX_IMPORT_BYTES: usize = 1024 * 1024;

/// Runtime configuration read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub database_url: String,
    pub bind_addr: String,
    /// Raw session key material; `None` when unset or shorter than 64 bytes.
    pub session_key: Option<Vec<u8>>,
    pub upload_dir: PathBuf,
    pub admin_password: String,
    pub max_upload_bytes: usize,
    /// Body limit for pasted roster forms and JSON requests.
    pub max_import_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| "DATABASE_URL must be set".to_string())?;

        let session_key = match lookup("SESSION_KEY") {
            Some(val) if val.len() >= 64 => Some(val.into_bytes()),
            Some(val) => {
                log::warn!("SESSION_KEY too short ({} bytes, need 64+), ignoring it", val.len());
                None
            }
            None => None,
        };

        let max_upload_bytes = byte_limit(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;
        let max_import_bytes = byte_limit(&lookup, "MAX_IMPORT_BYTES", DEFAULT_MAX_IMPORT_BYTES)?;

        Ok(Self {
            app_name: lookup("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            database_url,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            session_key,
            upload_dir: PathBuf::from(
                lookup("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
            ),
            admin_password: lookup("ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            max_upload_bytes,
            max_import_bytes,
        })
    }
}

fn byte_limit<F>(lookup: &F, key: &str, default: usize) -> Result<usize, String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("{key} is not a number: '{raw}'")),
        None => Ok(default),
    }
}
