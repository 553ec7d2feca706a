//! Free-text address value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// A free-form address or place description, as typed by the user
///
/// The text is opaque to the pipeline; the geocoding provider interprets it.
/// The only validation is that it is not empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

/// Error type for empty address input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyAddress;

impl fmt::Display for EmptyAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address must not be empty")
    }
}

impl std::error::Error for EmptyAddress {}

impl Address {
    /// Create an address from user input, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `EmptyAddress` if the trimmed input is empty.
    pub fn new(text: impl Into<String>) -> Result<Self, EmptyAddress> {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(EmptyAddress);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The address text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
