//! Tincture engine
//!
//! The public surface of the design-token resolution and theme-composition
//! engine. External collaborators (UI layers, build tooling) use:
//!
//! - [`ThemeEngine::resolve`]: one token against a stack and optional scope
//! - [`ThemeEngine::compose_theme`]: the full resolved snapshot for a stack
//! - [`ThemeEngine::generate_css`]: stylesheet emission with a size report
//! - [`ThemeEngine::validate_tokens`]: batch validation (strict or lenient)
//! - [`ThemeEngine::invalidate`]: explicit cache eviction
//! - [`ThemeEngine::switch_theme`]: the full switch protocol with revert
//!
//! All computation is pure and synchronous; persistence of the active theme
//! is delegated to listeners registered via
//! [`ThemeEngine::on_theme_changed`].

pub mod engine;
pub mod events;
pub mod switch;

// Re-export commonly used types
pub use engine::{ThemeEngine, ThemeSnapshot};
pub use events::{ThemeChanged, ThemeListener};
pub use switch::{SwitchOutcome, SwitchPhase, SWITCH_BUDGET};

pub use tincture_core::{
    DesignToken, ResolvedToken, Scope, ThemeDefinition, ThemeStack, TokenError, TokenResult,
    TokenType, TokenValue, ValidationReport, Validator,
};
pub use tincture_css::{ClassDef, CssOutput, CssProperty, CssRequest, SizeReport};
pub use tincture_resolve::{ResolutionCache, TokenRegistry};
