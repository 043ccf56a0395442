//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use recruitment_core::documents::{DocumentPolicy, DocumentRules};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// Prefix of the values shipped in the example configuration.
const PLACEHOLDER_PREFIX: &str = "YOUR_";

pub const OAUTH_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive.file",
];

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which implementation backs the tabular store and the file store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Google,
    /// In-memory fakes seeded with demo candidates.
    Memory,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub backend: Backend,
    pub cors_origin: String,
    pub sheets_api_key: String,
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub oauth_client_id: String,
    pub drive_folder_id: String,
    pub access_token: Option<String>,
    pub token_wait: Duration,
    pub sheets_base: String,
    pub drive_base: String,
    pub upload_base: String,
    pub documents: DocumentRules,
}

/// `true` for values left empty or still holding an example placeholder.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.starts_with(PLACEHOLDER_PREFIX)
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        // --- Load Server Settings ---
        let bind_address_str = var_or("BIND_ADDRESS", "0.0.0.0:3000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let backend = match var_or("BACKEND", "google").to_lowercase().as_str() {
            "google" => Backend::Google,
            "memory" => Backend::Memory,
            other => {
                return Err(ConfigError::InvalidValue(
                    "BACKEND".to_string(),
                    format!("'{}' is not one of google, memory", other),
                ))
            }
        };

        let cors_origin = var_or("CORS_ORIGIN", "http://localhost:3000");

        // --- Load Google Settings (placeholders are allowed, checked at use) ---
        let sheets_api_key = var_or("GOOGLE_SHEETS_API_KEY", "YOUR_GOOGLE_SHEETS_API_KEY");
        let spreadsheet_id = var_or("GOOGLE_SPREADSHEET_ID", "YOUR_SPREADSHEET_ID");
        let sheet_name = var_or("GOOGLE_SHEET_NAME", "Reviewed");
        let oauth_client_id = var_or("GOOGLE_OAUTH_CLIENT_ID", "YOUR_OAUTH2_CLIENT_ID");
        let drive_folder_id = var_or("GOOGLE_DRIVE_FOLDER_ID", "YOUR_GOOGLE_DRIVE_FOLDER_ID");
        let access_token = lookup("GOOGLE_ACCESS_TOKEN").filter(|t| !t.trim().is_empty());

        let token_wait = Duration::from_secs(parse_number(&lookup, "TOKEN_WAIT_SECS", 120)?);

        let sheets_base = var_or(
            "GOOGLE_SHEETS_BASE",
            "https://sheets.googleapis.com/v4/spreadsheets",
        );
        let drive_base = var_or("GOOGLE_DRIVE_BASE", "https://www.googleapis.com/drive/v3");
        let upload_base = var_or(
            "GOOGLE_UPLOAD_BASE",
            "https://www.googleapis.com/upload/drive/v3",
        );

        // --- Load Document Limits ---
        let defaults = DocumentRules::default();
        let documents = DocumentRules {
            ktp: DocumentPolicy {
                max_bytes: parse_number(&lookup, "MAX_KTP_BYTES", defaults.ktp.max_bytes)?,
                ..defaults.ktp
            },
            selfie: DocumentPolicy {
                max_bytes: parse_number(&lookup, "MAX_SELFIE_BYTES", defaults.selfie.max_bytes)?,
                ..defaults.selfie
            },
        };

        Ok(Self {
            bind_address,
            log_level,
            backend,
            cors_origin,
            sheets_api_key,
            spreadsheet_id,
            sheet_name,
            oauth_client_id,
            drive_folder_id,
            access_token,
            token_wait,
            sheets_base,
            drive_base,
            upload_base,
            documents,
        })
    }

    /// Whether document upload may run. The Google backend needs a real OAuth
    /// client id and Drive folder; the provider itself is never consulted.
    pub fn uploads_configured(&self) -> bool {
        match self.backend {
            Backend::Memory => true,
            Backend::Google => {
                !is_placeholder(&self.oauth_client_id) && !is_placeholder(&self.drive_folder_id)
            }
        }
    }
}

fn parse_number<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string(), format!("'{}' is not a number", raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_leave_uploads_unconfigured() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.backend, Backend::Google);
        assert_eq!(config.sheet_name, "Reviewed");
        assert_eq!(config.documents.ktp.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.documents.selfie.max_bytes, 3 * 1024 * 1024);
        assert!(!config.uploads_configured());
    }

    #[test]
    fn real_identifiers_enable_uploads() {
        let config = config_from(&[
            ("GOOGLE_OAUTH_CLIENT_ID", "1234-abc.apps.googleusercontent.com"),
            ("GOOGLE_DRIVE_FOLDER_ID", "1IWAcF0GrsBWjY7Lsp"),
        ])
        .unwrap();
        assert!(config.uploads_configured());
    }

    #[test]
    fn memory_backend_needs_no_google_setup() {
        let config = config_from(&[("BACKEND", "memory")]).unwrap();
        assert!(config.uploads_configured());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            config_from(&[("BACKEND", "excel")]),
            Err(ConfigError::InvalidValue(key, _)) if key == "BACKEND"
        ));
        assert!(matches!(
            config_from(&[("MAX_KTP_BYTES", "five")]),
            Err(ConfigError::InvalidValue(key, _)) if key == "MAX_KTP_BYTES"
        ));
        assert!(matches!(
            config_from(&[("BIND_ADDRESS", "nowhere")]),
            Err(ConfigError::InvalidValue(key, _)) if key == "BIND_ADDRESS"
        ));
    }

    #[test]
    fn placeholder_detection() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("  "));
        assert!(is_placeholder("YOUR_SPREADSHEET_ID"));
        assert!(!is_placeholder("15SP2rOHLMoZ8dfxQFyLQ"));
    }
}
