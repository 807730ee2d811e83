//! Theme definitions and ordered theme stacks
//!
//! A theme is an append-only set of token overrides with a declared priority.
//! Composition walks an ordered stack of themes; among candidates, the highest
//! declared priority wins and stack order (later = more specific) breaks ties.

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::error::{TokenError, TokenResult};
use crate::token::{DesignToken, TokenType, TokenValue};

/// One theme: an id plus a set of token overrides
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeDefinition {
    pub id: String,
    pub display_name: String,
    /// Declared priority, compared numerically across the stack
    pub priority: i32,
    pub is_default: bool,
    /// Overrides keyed by token id, in declaration order
    pub overrides: IndexMap<String, DesignToken>,
}

impl ThemeDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            priority: 0,
            is_default: false,
            overrides: IndexMap::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Add an override; last write wins within one theme
    pub fn override_token(mut self, token: DesignToken) -> Self {
        self.overrides.insert(token.id.clone(), token);
        self
    }

    pub fn get(&self, token_id: &str) -> Option<&DesignToken> {
        self.overrides.get(token_id)
    }
}

/// An ordered sequence of themes; later entries are more specific
///
/// The stack is immutable once built. Switching themes means swapping the
/// active stack reference, never mutating definitions in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThemeStack {
    themes: Vec<ThemeDefinition>,
}

impl ThemeStack {
    pub fn new(themes: Vec<ThemeDefinition>) -> Self {
        Self { themes }
    }

    pub fn push(mut self, theme: ThemeDefinition) -> Self {
        self.themes.push(theme);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThemeDefinition> {
        self.themes.iter()
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// The most specific (last) theme, used for the emitted `data-theme` selector
    pub fn top(&self) -> Option<&ThemeDefinition> {
        self.themes.last()
    }

    pub fn contains(&self, theme_id: &str) -> bool {
        self.themes.iter().any(|t| t.id == theme_id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.themes.iter().map(|t| t.id.as_str()).collect()
    }

    /// Identity signature for cache keys
    ///
    /// Hashes the ordered theme ids only, not override content. Two stacks with
    /// the same themes in the same order share a signature; mutated token
    /// content is covered separately by the registry version.
    pub fn signature(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for theme in &self.themes {
            theme.id.hash(&mut hasher);
        }
        self.themes.len().hash(&mut hasher);
        hasher.finish()
    }
}

impl FromIterator<ThemeDefinition> for ThemeStack {
    fn from_iter<I: IntoIterator<Item = ThemeDefinition>>(iter: I) -> Self {
        Self {
            themes: iter.into_iter().collect(),
        }
    }
}

/// On-disk theme file (JSON)
///
/// Override values are either raw value strings or DTCG-shaped records:
///
/// ```json
/// {
///   "id": "dark",
///   "displayName": "Dark",
///   "priority": 10,
///   "overrides": {
///     "color-primary": "#3399ff",
///     "color-accent": { "$type": "color", "$value": "{color-primary}" }
///   }
/// }
/// ```
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeFile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub overrides: IndexMap<String, OverrideValue>,
}

/// A theme-file override entry
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OverrideValue {
    Raw(String),
    Record {
        #[serde(rename = "$type", alias = "type")]
        token_type: String,
        #[serde(rename = "$value", alias = "value")]
        value: String,
        #[serde(rename = "$description", alias = "description", default)]
        description: Option<String>,
    },
}

impl ThemeFile {
    pub fn from_json(src: &str) -> TokenResult<Self> {
        serde_json::from_str(src).map_err(|e| TokenError::InvalidFormat {
            id: "<theme document>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Convert into a [`ThemeDefinition`], inferring types for raw string
    /// overrides from the value shape
    pub fn into_definition(self) -> TokenResult<ThemeDefinition> {
        let mut theme = ThemeDefinition::new(self.id.clone()).with_priority(self.priority);
        if let Some(name) = self.display_name {
            theme.display_name = name;
        }
        theme.is_default = self.is_default;
        for (token_id, entry) in self.overrides {
            let token = match entry {
                OverrideValue::Raw(raw) => {
                    let value = TokenValue::parse(&raw);
                    let token_type = match &value {
                        // An alias takes its real type from the resolved target;
                        // the local tag is advisory only.
                        TokenValue::Alias(target) => {
                            infer_type_from_id(target).unwrap_or_else(|| {
                                tracing::warn!(
                                    %token_id,
                                    %target,
                                    "alias target has no recognizable category, assuming color"
                                );
                                TokenType::Color
                            })
                        }
                        TokenValue::Literal(lit) => {
                            infer_type(lit).ok_or_else(|| TokenError::InvalidFormat {
                                id: token_id.clone(),
                                reason: format!("cannot infer a token type for `{lit}`"),
                            })?
                        }
                    };
                    let mut token = DesignToken::new(token_id.clone(), token_type, &raw);
                    token.value = value;
                    token
                }
                OverrideValue::Record {
                    token_type,
                    value,
                    description,
                } => {
                    let token_type = TokenType::from_tag(&token_type).ok_or_else(|| {
                        TokenError::InvalidFormat {
                            id: token_id.clone(),
                            reason: format!("unknown token type `{token_type}`"),
                        }
                    })?;
                    let mut token = DesignToken::new(token_id.clone(), token_type, &value);
                    token.description = description;
                    token
                }
            };
            theme.overrides.insert(token_id, token);
        }
        Ok(theme)
    }
}

/// Guess a type from a token id's category prefix (`color-primary` -> Color)
pub fn infer_type_from_id(id: &str) -> Option<TokenType> {
    let prefix = id.split('-').next()?;
    match prefix {
        "color" => Some(TokenType::Color),
        "spacing" | "size" | "radius" => Some(TokenType::Dimension),
        "font" => Some(TokenType::FontFamily),
        "duration" => Some(TokenType::Duration),
        "shadow" => Some(TokenType::Shadow),
        "gradient" => Some(TokenType::Gradient),
        "border" => Some(TokenType::Border),
        _ => None,
    }
}

/// Best-effort type inference for untagged literal values
pub fn infer_type(value: &str) -> Option<TokenType> {
    let v = value.trim();
    if v.starts_with('#') || v.starts_with("rgb") || v.starts_with("hsl") {
        return Some(TokenType::Color);
    }
    if v.ends_with("ms") || (v.ends_with('s') && v[..v.len() - 1].parse::<f64>().is_ok()) {
        return Some(TokenType::Duration);
    }
    for unit in ["px", "rem", "em", "pt", "vw", "vh", "%"] {
        if let Some(num) = v.strip_suffix(unit) {
            if num.parse::<f64>().is_ok() {
                return Some(TokenType::Dimension);
            }
        }
    }
    if v.parse::<f64>().is_ok() {
        return Some(TokenType::Number);
    }
    None
}
