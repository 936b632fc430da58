//! Configuration notices
//!
//! Loading never fails; every substitution of a default is recorded here so
//! it can be logged and shown to the user.

use std::fmt;

use serde::Serialize;

/// What went wrong with a configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "lowercase")]
pub enum ConfigIssue {
    /// The option is not set anywhere
    Missing,
    /// The option is set but malformed or out of range
    Invalid(String),
    /// The configuration file could not be read or parsed
    Unreadable(String),
}

/// A default substituted during configuration loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigNotice {
    /// Dotted option key, or the file path for [`ConfigIssue::Unreadable`]
    pub key: String,
    pub issue: ConfigIssue,
    /// The default that was used instead, rendered for display
    pub default: String,
}

impl ConfigNotice {
    pub fn missing(key: impl Into<String>, default: impl fmt::Display) -> Self {
        Self {
            key: key.into(),
            issue: ConfigIssue::Missing,
            default: default.to_string(),
        }
    }

    pub fn invalid(
        key: impl Into<String>,
        reason: impl Into<String>,
        default: impl fmt::Display,
    ) -> Self {
        Self {
            key: key.into(),
            issue: ConfigIssue::Invalid(reason.into()),
            default: default.to_string(),
        }
    }

    pub fn unreadable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: path.into(),
            issue: ConfigIssue::Unreadable(reason.into()),
            default: "all defaults".to_string(),
        }
    }

    /// Whether the user should see this on the dashboard
    ///
    /// Unset options are routine and only logged.
    #[must_use]
    pub const fn is_user_visible(&self) -> bool {
        !matches!(self.issue, ConfigIssue::Missing)
    }
}

impl fmt::Display for ConfigNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.issue {
            ConfigIssue::Missing => {
                write!(f, "'{}' is not set, using default {}", self.key, self.default)
            },
            ConfigIssue::Invalid(reason) => write!(
                f,
                "'{}' is invalid ({reason}), using default {}",
                self.key, self.default
            ),
            ConfigIssue::Unreadable(reason) => write!(
                f,
                "Config file '{}' contains errors ({reason}). Using default values.",
                self.key
            ),
        }
    }
}
