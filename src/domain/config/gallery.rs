use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request body ceiling for uploads when `MAX_UPLOAD_BYTES` is unset.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Provider {
    #[serde(rename = "supabase")]
    Supabase,
    #[serde(rename = "memory")]
    Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SupabaseSecrets {
    #[serde(rename = "url")]
    pub url: String,
    #[serde(rename = "anonKey")]
    pub anon_key: String,
}

#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub provider: Provider,
    pub supabase: Option<SupabaseSecrets>,
    pub bucket_name: String,
    pub table_name: String,
    pub port: u16,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub max_upload_bytes: usize,
}

impl GalleryConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup("GALLERY_BACKEND").as_deref() {
            None | Some("supabase") => Provider::Supabase,
            Some("memory") => Provider::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "GALLERY_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let supabase = if provider == Provider::Supabase {
            let url = lookup("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
            let anon_key =
                lookup("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
            Some(SupabaseSecrets { url, anon_key })
        } else {
            None
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw,
            })?,
            None => 8080,
        };

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|bytes| *bytes > 0)
                .ok_or(ConfigError::Invalid {
                    name: "MAX_UPLOAD_BYTES",
                    value: raw,
                })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS").map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Ok(Self {
            provider,
            supabase,
            bucket_name: lookup("MEDIA_BUCKET").unwrap_or_else(|| "media".to_string()),
            table_name: lookup("MEDIA_TABLE").unwrap_or_else(|| "media".to_string()),
            port,
            cors_allowed_origins,
            max_upload_bytes,
        })
    }
}
