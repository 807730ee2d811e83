//! Theme change events
//!
//! The engine never touches storage itself. When a switch reaches `Applied`
//! it emits a [`ThemeChanged`] event; the external persistence collaborator
//! subscribes and remembers the active theme across sessions.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Emitted once per successfully applied theme switch
#[derive(Clone, Debug, Serialize)]
pub struct ThemeChanged {
    /// Id of the most specific theme in the newly active stack
    pub theme: String,
    /// Unix milliseconds at apply time
    pub timestamp: u64,
    /// Engine version, for persisted-state migration
    pub version: String,
}

impl ThemeChanged {
    pub fn now(theme: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            theme: theme.into(),
            timestamp,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Registered callback for theme changes
pub type ThemeListener = Box<dyn Fn(&ThemeChanged) + Send + Sync>;
