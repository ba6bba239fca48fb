//! Sexual preference enumeration.
//!
//! The stored and transmitted representation is the upper-case name
//! (`MALE`, `FEMALE`, `BOTH`). Anything else is rejected with
//! [`InvalidPreference`].

use serde::{Deserialize, Serialize};

/// The closed set of accepted preference values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Preference {
    Male,
    Female,
    Both,
}

/// Every accepted preference, in display order.
pub const ALL_PREFERENCES: [Preference; 3] =
    [Preference::Male, Preference::Female, Preference::Both];

/// Raised when an input does not name one of [`ALL_PREFERENCES`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid preference '{0}'")]
pub struct InvalidPreference(pub String);

impl Preference {
    /// Parse a preference string exactly as transmitted (case-sensitive).
    pub fn parse(s: &str) -> Result<Self, InvalidPreference> {
        match s {
            "MALE" => Ok(Self::Male),
            "FEMALE" => Ok(Self::Female),
            "BOTH" => Ok(Self::Both),
            other => Err(InvalidPreference(other.to_string())),
        }
    }

    /// Database and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Both => "BOTH",
        }
    }
}

/// Whether `s` names an accepted preference.
pub fn is_valid_preference(s: &str) -> bool {
    Preference::parse(s).is_ok()
}
