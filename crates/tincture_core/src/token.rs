//! Design token model

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Closed set of token types (DTCG `$type` tags)
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Color,
    Dimension,
    FontFamily,
    FontWeight,
    Duration,
    Number,
    Border,
    Shadow,
    Gradient,
    Typography,
    CubicBezier,
}

impl TokenType {
    pub const ALL: [TokenType; 11] = [
        TokenType::Color,
        TokenType::Dimension,
        TokenType::FontFamily,
        TokenType::FontWeight,
        TokenType::Duration,
        TokenType::Number,
        TokenType::Border,
        TokenType::Shadow,
        TokenType::Gradient,
        TokenType::Typography,
        TokenType::CubicBezier,
    ];

    /// Parse a DTCG type tag. Unknown tags are not a member of the closed set.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "color" => Some(TokenType::Color),
            "dimension" => Some(TokenType::Dimension),
            "fontFamily" => Some(TokenType::FontFamily),
            "fontWeight" => Some(TokenType::FontWeight),
            "duration" => Some(TokenType::Duration),
            "number" => Some(TokenType::Number),
            "border" => Some(TokenType::Border),
            "shadow" => Some(TokenType::Shadow),
            "gradient" => Some(TokenType::Gradient),
            "typography" => Some(TokenType::Typography),
            "cubicBezier" => Some(TokenType::CubicBezier),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            TokenType::Color => "color",
            TokenType::Dimension => "dimension",
            TokenType::FontFamily => "fontFamily",
            TokenType::FontWeight => "fontWeight",
            TokenType::Duration => "duration",
            TokenType::Number => "number",
            TokenType::Border => "border",
            TokenType::Shadow => "shadow",
            TokenType::Gradient => "gradient",
            TokenType::Typography => "typography",
            TokenType::CubicBezier => "cubicBezier",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// A raw token value: either a literal or an alias to another token
///
/// Alias syntax accepts both the DTCG `{other-token}` form and the CSS
/// custom-property form `var(--other-token)` produced by some ingestion
/// pipelines. Serialized as the raw string in both directions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TokenValue {
    Literal(String),
    Alias(String),
}

impl TokenValue {
    /// Parse a raw value string into literal or alias form
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(inner) = trimmed
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
        {
            return TokenValue::Alias(inner.trim().to_string());
        }
        if let Some(inner) = trimmed
            .strip_prefix("var(--")
            .and_then(|s| s.strip_suffix(')'))
        {
            return TokenValue::Alias(inner.trim().to_string());
        }
        TokenValue::Literal(trimmed.to_string())
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, TokenValue::Alias(_))
    }

    /// Alias target id, if this value is an alias
    pub fn alias_target(&self) -> Option<&str> {
        match self {
            TokenValue::Alias(target) => Some(target),
            TokenValue::Literal(_) => None,
        }
    }

    /// The raw string form (`{target}` for aliases)
    pub fn raw(&self) -> String {
        match self {
            TokenValue::Literal(v) => v.clone(),
            TokenValue::Alias(target) => format!("{{{target}}}"),
        }
    }
}

impl From<String> for TokenValue {
    fn from(raw: String) -> Self {
        TokenValue::parse(&raw)
    }
}

impl From<TokenValue> for String {
    fn from(value: TokenValue) -> Self {
        value.raw()
    }
}

/// A named design value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignToken {
    /// Unique id within its owning scope (and theme, for overrides)
    pub id: String,
    /// Kebab-case display name; defaults to the id
    pub name: String,
    /// Literal value or alias reference
    pub value: TokenValue,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DesignToken {
    pub fn new(id: impl Into<String>, token_type: TokenType, raw_value: &str) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            value: TokenValue::parse(raw_value),
            token_type,
            category: None,
            description: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Ordered token ids traversed while resolving an alias to its terminal literal.
/// Most chains are short; depth is bounded at 32.
pub type ResolutionChain = SmallVec<[String; 4]>;

/// The outcome of resolving one token against a theme stack and scope
///
/// Produced fresh per resolution, immutable, and cached by value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResolvedToken {
    pub token_id: String,
    /// Terminal literal value
    pub value: String,
    /// Scope level that supplied the winning definition
    pub resolved_scope: String,
    /// Theme that supplied the winning definition; `None` for base definitions
    pub resolved_theme: Option<String>,
    /// Token ids traversed, starting with `token_id`
    pub chain: ResolutionChain,
}
