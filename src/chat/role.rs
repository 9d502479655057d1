use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workflow identity chosen through a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    /// Looking for an opportunity on their own behalf
    Seeker,
    /// Posting an opportunity
    #[serde(alias = "poster")]
    Lead,
    /// Internal staff looking for an opportunity; requires the search index
    Staff,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown session role: {0}")]
pub struct UnknownRole(pub String);

impl SessionRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionRole::Seeker => "seeker",
            SessionRole::Lead => "lead",
            SessionRole::Staff => "staff",
        }
    }

    pub fn parse(s: &str) -> Result<Self, UnknownRole> {
        match s.trim().to_lowercase().as_str() {
            "seeker" => Ok(SessionRole::Seeker),
            "lead" | "poster" => Ok(SessionRole::Lead),
            "staff" => Ok(SessionRole::Staff),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for SessionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SessionRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Fixed conversation starters offered before free-form input is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    LookingForOpportunity,
    PostingOpportunity,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::LookingForOpportunity, Preset::PostingOpportunity];

    pub fn prompt(&self) -> &'static str {
        match self {
            Preset::LookingForOpportunity => "I'm looking for opportunity",
            Preset::PostingOpportunity => "I'm posting an opportunity",
        }
    }

    pub fn role(&self) -> SessionRole {
        match self {
            Preset::LookingForOpportunity => SessionRole::Staff,
            Preset::PostingOpportunity => SessionRole::Lead,
        }
    }
}

/// Input affordance shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    /// Only the preset buttons are offered
    #[default]
    Preset,
    /// Free-text input is enabled; never reverts
    FreeForm,
}
