//! Server configuration.
//!
//! Every option can be given on the command line or through a `LECTERN_*`
//! environment variable.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LECTERN_PORT` | 8080 | Server port |
//! | `LECTERN_HOST` | 127.0.0.1 | Host to bind |
//! | `LECTERN_LOG_LEVEL` | info | Log level |
//! | `LECTERN_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `LECTERN_ENABLE_CORS` | true | Enable CORS |
//! | `LECTERN_CORS_ORIGINS` | * | Allowed origins |
//! | `LECTERN_CORS_METHODS` | GET,HEAD,OPTIONS | Allowed methods |
//! | `LECTERN_CORS_HEADERS` | Accept,Content-Type,X-Preview-Token | Allowed headers |
//! | `LECTERN_BASE_URL` | http://localhost:8080 | Origin for redirect locations |
//! | `LECTERN_DATABASE_URL` | lectern.db | SQLite file, or `:memory:` |
//! | `LECTERN_PROJECT_NAME` | Lectern | Suffix for browser titles |
//! | `LECTERN_EXTENSION` | html | Page extension |
//! | `LECTERN_DEFAULT_SLOT` | text | Slot treated as main text |
//! | `LECTERN_PREVIEW_TOKEN` | | Token that unlocks unpublished records |
//! | `LECTERN_TABLE_DIR` | | Directory of embedded table definitions |
//! | `LECTERN_MAX_REDIRECT_PROBES` | 64 | Wildcard redirect probe cap |
//! | `LECTERN_ENABLE_REQUEST_ID` | true | Set and echo `X-Request-Id` |
//! | `LECTERN_SEED_FILE` | | JSON seed imported at startup |

use std::path::PathBuf;

use clap::Parser;
use lectern_engine::EngineSettings;
use url::Url;

/// Server configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "lectern")]
#[command(about = "Lectern content server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "LECTERN_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "LECTERN_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "LECTERN_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "LECTERN_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "LECTERN_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "LECTERN_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "LECTERN_CORS_METHODS", default_value = "GET,HEAD,OPTIONS")]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "LECTERN_CORS_HEADERS",
        default_value = "Accept,Content-Type,X-Preview-Token"
    )]
    pub cors_headers: String,

    /// Scheme and authority that relative redirect targets resolve against.
    #[arg(long, env = "LECTERN_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// SQLite database path, or `:memory:`.
    #[arg(long, env = "LECTERN_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Appended to every browser title except the site root's.
    #[arg(long, env = "LECTERN_PROJECT_NAME", default_value = "Lectern")]
    pub project_name: String,

    /// Page extension without the dot.
    #[arg(long, env = "LECTERN_EXTENSION", default_value = "html")]
    pub extension: String,

    /// Slot rendered as the page's main text.
    #[arg(long, env = "LECTERN_DEFAULT_SLOT", default_value = "text")]
    pub default_slot: String,

    /// Token that grants access to unpublished records. Unset closes the gate.
    #[arg(long, env = "LECTERN_PREVIEW_TOKEN")]
    pub preview_token: Option<String>,

    /// Directory holding `<name>.json` table definitions.
    #[arg(long, env = "LECTERN_TABLE_DIR")]
    pub table_dir: Option<PathBuf>,

    /// Maximum wildcard redirect probes per request.
    #[arg(long, env = "LECTERN_MAX_REDIRECT_PROBES", default_value = "64")]
    pub max_redirect_probes: usize,

    /// Enable request ID tracking.
    #[arg(long, env = "LECTERN_ENABLE_REQUEST_ID", default_value = "true")]
    pub enable_request_id: bool,

    /// JSON seed document imported before serving.
    #[arg(long, env = "LECTERN_SEED_FILE")]
    pub seed_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let engine = EngineSettings::default();
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,HEAD,OPTIONS".to_string(),
            cors_headers: "Accept,Content-Type,X-Preview-Token".to_string(),
            base_url: "http://localhost:8080".to_string(),
            database_url: None,
            project_name: engine.project_name,
            extension: engine.extension,
            default_slot: engine.default_slot,
            preview_token: None,
            table_dir: None,
            max_redirect_probes: engine.max_redirect_probes,
            enable_request_id: true,
            seed_file: None,
        }
    }
}

impl ServerConfig {
    /// Parses environment variables without requiring command line arguments.
    pub fn from_env() -> Self {
        Self::try_parse_from(["lectern"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the base URL without a trailing slash.
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Returns the engine settings this configuration implies.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            extension: self.extension.clone(),
            default_slot: self.default_slot.clone(),
            project_name: self.project_name.clone(),
            max_redirect_probes: self.max_redirect_probes,
        }
    }

    /// Validates the configuration and returns every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        match Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.host_str().is_some() => {}
            _ => errors.push(format!(
                "Base URL must be an absolute http(s) URL: {}",
                self.base_url
            )),
        }

        if self.extension.is_empty() || self.extension.contains(['.', '/']) {
            errors.push(format!(
                "Extension must be non-empty without '.' or '/': {}",
                self.extension
            ));
        }

        if self.default_slot.trim().is_empty() {
            errors.push("Default slot cannot be empty".to_string());
        }

        if self.preview_token.as_deref().is_some_and(str::is_empty) {
            errors.push("Preview token cannot be empty when set".to_string());
        }

        if self.max_redirect_probes == 0 {
            errors.push("Max redirect probes cannot be 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            base_url: "http://localhost:8080".to_string(),
            database_url: Some(":memory:".to_string()),
            enable_request_id: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.extension, "html");
        assert!(config.preview_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            host: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_origin_trims_slash() {
        let config = ServerConfig {
            base_url: "https://example.org/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.origin(), "https://example.org");
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = ServerConfig {
            port: 0,
            base_url: "example.org".to_string(),
            extension: ".html".to_string(),
            preview_token: Some(String::new()),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("Port")));
        assert!(errors.iter().any(|e| e.contains("Base URL")));
        assert!(errors.iter().any(|e| e.contains("Extension")));
        assert!(errors.iter().any(|e| e.contains("Preview token")));
    }

    #[test]
    fn test_engine_settings() {
        let config = ServerConfig {
            project_name: "Docs".to_string(),
            extension: "htm".to_string(),
            ..Default::default()
        };
        let settings = config.engine_settings();
        assert_eq!(settings.project_name, "Docs");
        assert_eq!(settings.extension, "htm");
        assert_eq!(settings.default_slot, "text");
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert!(!config.enable_cors);
        assert_eq!(config.database_url.as_deref(), Some(":memory:"));
    }
}
