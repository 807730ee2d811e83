//! Dot-path scopes
//!
//! A scope is a namespace like `components.button`. It is not a stored entity:
//! at query time it expands into an ordered search chain of progressively less
//! specific levels, always ending in `global`.

use serde::{Deserialize, Serialize};

pub const GLOBAL_SCOPE: &str = "global";

/// A dot-separated scope path
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let trimmed = path.trim().trim_matches('.');
        if trimmed.is_empty() {
            return Self::global();
        }
        Scope(trimmed.to_string())
    }

    pub fn global() -> Self {
        Scope(GLOBAL_SCOPE.to_string())
    }

    pub fn is_global(&self) -> bool {
        self.0 == GLOBAL_SCOPE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Search levels from most to least specific, ending in `global`
    ///
    /// `components.button` yields `["components.button", "components", "global"]`.
    pub fn search_chain(&self) -> Vec<String> {
        if self.is_global() {
            return vec![GLOBAL_SCOPE.to_string()];
        }
        let mut levels = Vec::new();
        let mut current = self.0.as_str();
        loop {
            levels.push(current.to_string());
            match current.rfind('.') {
                Some(idx) => current = &current[..idx],
                None => break,
            }
        }
        levels.push(GLOBAL_SCOPE.to_string());
        levels
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::global()
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scope {
    fn from(path: &str) -> Self {
        Scope::new(path)
    }
}
