//! Natural-key codes used across the catalog.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::GuardError;

/// Code identifying a style (catalog-level definition).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleCode(String);

/// Code identifying a product (sellable color/size variant of a style).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCode(String);

macro_rules! impl_code_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a code, rejecting blank input.
            pub fn new(code: impl Into<String>) -> Result<Self, GuardError> {
                let code = code.into();
                if code.trim().is_empty() {
                    return Err(GuardError::invalid_code(format!("{}: must not be blank", $name)));
                }
                Ok(Self(code))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = GuardError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

impl_code_newtype!(StyleCode, "StyleCode");
impl_code_newtype!(ProductCode, "ProductCode");
