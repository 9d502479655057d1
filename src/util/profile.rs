//! Signed-in user profile, shown next to the conversation.
//!
//! Written by the login flow; this crate only reads it for display.

use std::fs;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub designation: Option<Designation>,
    #[serde(default)]
    pub department: Option<Department>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Designation {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Department {
    #[serde(default)]
    pub name: Option<String>,
}

impl UserProfile {
    /// Read the stored profile. Missing or malformed files yield `None`.
    pub fn load(path: &Path) -> Option<Self> {
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Ignoring malformed profile");
                None
            }
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn title(&self) -> &str {
        self.designation
            .as_ref()
            .and_then(|d| d.title.as_deref())
            .unwrap_or("N/A")
    }

    pub fn department(&self) -> &str {
        self.department
            .as_ref()
            .and_then(|d| d.name.as_deref())
            .unwrap_or("N/A")
    }
}
