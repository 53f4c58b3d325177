use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// JWT verification settings used by the auth middleware
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub audience: Option<String>,
    pub issuer: Option<String>,
}

/// Credentials for the hosted auth provider's admin API
#[derive(Debug, Clone)]
pub struct AuthAdminSettings {
    pub base_url: String,
    pub service_key: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt: JwtSettings,
    pub auth_admin: Option<AuthAdminSettings>,
    pub cors_origins: Vec<String>,
    /// Overrides the collections purged on account deletion
    pub purge_collections: Option<Vec<String>>,
    /// Overrides the collections included in a data export
    pub export_collections: Option<Vec<String>>,
}

impl AppConfig {
    /// Reads configuration from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value: raw })?,
            None => 3002,
        };

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let jwt = JwtSettings {
            secret: lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
            audience: non_empty(lookup("JWT_AUDIENCE")),
            issuer: non_empty(lookup("JWT_ISSUER")),
        };

        let auth_admin = match (non_empty(lookup("AUTH_ADMIN_URL")), non_empty(lookup("AUTH_SERVICE_KEY"))) {
            (Some(base_url), Some(service_key)) => Some(AuthAdminSettings {
                base_url: base_url.trim_end_matches('/').to_string(),
                service_key,
            }),
            _ => None,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| split_list(&raw))
            .unwrap_or_else(|| vec!["http://localhost:3000".to_string()]);

        Ok(Self {
            host,
            port,
            database_url,
            jwt,
            auth_admin,
            cors_origins,
            purge_collections: lookup("PURGE_COLLECTIONS").map(|raw| split_list(&raw)),
            export_collections: lookup("EXPORT_COLLECTIONS").map(|raw| split_list(&raw)),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Splits a comma separated list, dropping blanks
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
