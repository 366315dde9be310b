use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Top of every hour (sec min hour day month weekday).
pub const DEFAULT_EXPIRATION_CRON: &str = "0 0 * * * *";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub email_service_url: String,
    pub frontend_url: String,
    /// Log notifications instead of calling the email service
    pub mock_email: bool,
    /// Per-request deadline for the email service
    pub email_timeout_secs: u64,
    pub expiration_cron: String,
    pub expire_on_startup: bool,
    /// Bearer token for admin routes; admin routes are disabled when unset
    pub admin_api_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            email_service_url: env::var("EMAIL_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            mock_email: parse_flag("MOCK_EMAIL", false)?,
            email_timeout_secs: env::var("EMAIL_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("EMAIL_TIMEOUT_SECS must be a valid number")?,
            expiration_cron: env::var("EXPIRATION_CRON")
                .unwrap_or_else(|_| DEFAULT_EXPIRATION_CRON.to_string()),
            expire_on_startup: parse_flag("EXPIRE_ON_STARTUP", true)?,
            admin_api_token: env::var("ADMIN_API_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
        })
    }
}

fn parse_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(value) => parse_bool(&value)
            .with_context(|| format!("{} must be a boolean, got '{}'", name, value.trim())),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" YES "), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("False"), Some(false));
    }

    #[test]
    fn test_parse_bool_rejects_anything_else() {
        assert_eq!(parse_bool(""), None);
        assert_eq!(parse_bool("maybe"), None);
    }
}
