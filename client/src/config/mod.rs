// Configuration management from environment variables

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration settings for the SeaBlock client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // Remote services
    pub api_url: String,
    pub verify_url: String,

    // Local state
    pub session_file: PathBuf,
    pub export_dir: PathBuf,

    /// Whole-request timeout; `None` keeps the HTTP client default
    pub http_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates configuration instance from environment variables with defaults
    pub fn from_env() -> Self {
        dotenv().ok();

        let api_url = env::var("SEABLOCK_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());
        let verify_url = env::var("SEABLOCK_VERIFY_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        let session_file = env::var("SEABLOCK_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".seablock/session.json"));
        let export_dir = env::var("SEABLOCK_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let http_timeout = env::var("SEABLOCK_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self::new(api_url, verify_url)
            .with_session_file(session_file)
            .with_export_dir(export_dir)
            .with_timeout(http_timeout)
    }

    /// Builds a configuration for explicit service URLs
    pub fn new(api_url: impl Into<String>, verify_url: impl Into<String>) -> Self {
        Self {
            api_url: trim_base(api_url.into()),
            verify_url: trim_base(verify_url.into()),
            session_file: PathBuf::from(".seablock/session.json"),
            export_dir: PathBuf::from("."),
            http_timeout: None,
        }
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.http_timeout = timeout;
        self
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
