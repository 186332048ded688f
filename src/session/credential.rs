// API key held for the lifetime of a session
// Author: kelexine (https://github.com/kelexine)

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// An OpenAI API key. Wiped from memory on drop and never printed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credential(String);

impl Credential {
    /// Presence is the only check: blank input yields `None`.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let mut raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            raw.zeroize();
            return None;
        }
        let key = Self(trimmed.to_string());
        raw.zeroize();
        Some(key)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}
