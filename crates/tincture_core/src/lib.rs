//! Tincture core data model
//!
//! The shared vocabulary of the Tincture engine:
//!
//! - **Design tokens**: named design values (colors, dimensions, durations, ...)
//!   that are either literals or aliases to other tokens
//! - **Themes**: ordered stacks of override sets composed by priority
//! - **Scopes**: dot-path namespaces (`components.button`) with fallback to `global`
//! - **Validation**: DTCG shape, naming, and value-grammar checks with strict and
//!   lenient modes
//! - **DTCG ingestion**: parsing of `$type`/`$value` token documents
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tincture_core::{DesignToken, TokenType, Validator};
//!
//! let token = DesignToken::new("color-primary", TokenType::Color, "#0066cc");
//! let report = Validator::strict().validate_token(&token);
//! assert!(report.is_valid);
//! ```

pub mod dtcg;
pub mod error;
pub mod scope;
pub mod theme;
pub mod token;
pub mod validate;

// Re-export commonly used types
pub use dtcg::{parse_document, DtcgDocument};
pub use error::{TokenError, TokenResult};
pub use scope::Scope;
pub use theme::{ThemeDefinition, ThemeFile, ThemeStack};
pub use token::{DesignToken, ResolvedToken, ResolutionChain, TokenType, TokenValue};
pub use validate::{TokenValidation, ValidationReport, Validator};
