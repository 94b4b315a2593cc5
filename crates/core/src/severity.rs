//! Severity classes for rule outcomes.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GuardError;

/// How a failed rule affects acceptance of a mutation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// A violation blocks the mutation.
    Hard,
    /// A violation is reported as a warning only.
    Soft,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Hard => "HARD",
            Severity::Soft => "SOFT",
        }
    }

    pub fn blocks(self) -> bool {
        self == Severity::Hard
    }
}

impl core::fmt::Display for Severity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HARD" => Ok(Severity::Hard),
            "SOFT" => Ok(Severity::Soft),
            other => Err(GuardError::invalid_config(format!("unknown severity '{other}'"))),
        }
    }
}
