use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::chat::SessionRole;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

const DEFAULT_GREETING: &str = "Hi! How can I help you today?";

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Chat backend endpoints
    pub backend: BackendConfig,
    /// Assistant message shown before anything is sent
    pub greeting: String,
    /// Roles whose first preset warms up the search index
    pub warmup_roles: Vec<SessionRole>,
    /// File extensions offered for upload (lowercase, no dot)
    pub upload_extensions: Vec<String>,
}

/// Where the chat backend lives
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub base_url: String,
    pub chat_path: String,
    pub warmup_path: String,
    pub upload_path: String,
    pub summarize_path: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            chat_path: "/api/mistral-chat".into(),
            warmup_path: "/api/build-index".into(),
            upload_path: "/api/upload-skills".into(),
            summarize_path: "/api/create-opportunity".into(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            greeting: DEFAULT_GREETING.into(),
            warmup_roles: vec![SessionRole::Staff],
            upload_extensions: vec!["csv".into(), "xlsx".into(), "xls".into()],
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// TOML representation of the `[backend]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlBackendConfig {
    pub base_url: Option<String>,
    pub chat_path: Option<String>,
    pub warmup_path: Option<String>,
    pub upload_path: Option<String>,
    pub summarize_path: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// TOML representation of the `[session]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlSessionConfig {
    pub greeting: Option<String>,
    pub warmup_roles: Option<Vec<SessionRole>>,
}

/// TOML representation of the `[upload]` section
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlUploadConfig {
    pub extensions: Option<Vec<String>>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub backend: Option<TomlBackendConfig>,
    pub session: Option<TomlSessionConfig>,
    pub upload: Option<TomlUploadConfig>,
}

impl Config {
    /// Load configuration from file, merging with defaults
    pub fn load(config_file: &Path) -> Self {
        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(config_file);
        }

        match Self::from_file(config_file) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %config_file.display(),
                    error = %e,
                    "Ignoring unreadable config, using defaults"
                );
                Config::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse a config file body on top of the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let toml_config: TomlConfig = toml::from_str(contents)?;
        let mut config = Config::default();

        if let Some(backend) = toml_config.backend {
            if let Some(base_url) = backend.base_url {
                config.backend.base_url = base_url;
            }
            if let Some(path) = backend.chat_path {
                config.backend.chat_path = path;
            }
            if let Some(path) = backend.warmup_path {
                config.backend.warmup_path = path;
            }
            if let Some(path) = backend.upload_path {
                config.backend.upload_path = path;
            }
            if let Some(path) = backend.summarize_path {
                config.backend.summarize_path = path;
            }
            if let Some(secs) = backend.timeout_secs {
                config.backend.timeout = Duration::from_secs(secs);
            }
        }

        if let Some(session) = toml_config.session {
            if let Some(greeting) = session.greeting {
                config.greeting = greeting;
            }
            if let Some(roles) = session.warmup_roles {
                config.warmup_roles = roles;
            }
        }

        if let Some(upload) = toml_config.upload {
            if let Some(extensions) = upload.extensions {
                config.upload_extensions = extensions
                    .into_iter()
                    .map(|ext| ext.trim_start_matches('.').to_lowercase())
                    .collect();
            }
        }

        Ok(config)
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "Failed to create config directory");
                return;
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write default config");
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.backend.base_url = base_url.into();
        self
    }

    /// Whether the first preset for `role` should warm up the index
    pub fn requires_warmup(&self, role: SessionRole) -> bool {
        self.warmup_roles.contains(&role)
    }

    /// Whether a file may be offered for upload, judged by its extension
    pub fn accepts_upload(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.upload_extensions.iter().any(|allowed| *allowed == ext))
    }
}
