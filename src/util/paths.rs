//! On-disk layout of the AgentOps data directory

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_DIR_NAME: &str = ".agentops";

/// Root holding the config file, the signed-in profile and the logs.
///
/// Defaults to `~/.agentops`; `--data-dir` points it elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use `custom` when given, otherwise the home-directory default
    pub fn resolve(custom: Option<PathBuf>) -> Self {
        match custom {
            Some(root) => Self::new(root),
            None => Self::new(
                dirs::home_dir()
                    .map(|home| home.join(DEFAULT_DIR_NAME))
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR_NAME)),
            ),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("agentops.log")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn profile_file(&self) -> PathBuf {
        self.root.join("profile.json")
    }

    /// Open the log file for appending, creating `logs/` if needed
    pub fn open_log(&self) -> io::Result<File> {
        fs::create_dir_all(self.logs_dir())?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_file())
    }
}
