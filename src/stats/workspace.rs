//! Workspace identifiers.
//!
//! A workspace is a named partition of tasks and statistics (for example
//! `pro` and `perso`). The identifier becomes part of a persistence key, so
//! only a conservative character set is accepted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Workspace used when nothing else is configured.
pub const DEFAULT_WORKSPACE: &str = "pro";

/// Maximum accepted identifier length.
const MAX_WORKSPACE_LENGTH: usize = 64;

/// Validated workspace identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkspaceId(String);

impl WorkspaceId {
    /// Parses a workspace identifier.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidWorkspace`] if the identifier is empty,
    /// too long, or contains characters other than ASCII alphanumerics,
    /// `-` and `_`.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.len() > MAX_WORKSPACE_LENGTH {
            return Err(LedgerError::InvalidWorkspace(raw.to_string()));
        }
        let valid = trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(LedgerError::InvalidWorkspace(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for WorkspaceId {
    fn default() -> Self {
        Self(DEFAULT_WORKSPACE.to_string())
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WorkspaceId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WorkspaceId {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WorkspaceId> for String {
    fn from(value: WorkspaceId) -> Self {
        value.0
    }
}
