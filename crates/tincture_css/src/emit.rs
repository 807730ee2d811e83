//! CSS serialization
//!
//! Turns resolved token snapshots into custom-property declarations inside a
//! theme-scoped selector, plus semantic component and utility class rules.
//! Every value goes through the cache-fronted scope resolver; a token that
//! fails to resolve becomes a CSS comment so one bad token cannot blank out
//! the rest of the theme.

use serde::{Deserialize, Serialize};

use tincture_core::{Scope, ThemeStack};
use tincture_resolve::{composition_ids, resolve_cached, ResolutionCache, TokenRegistry};

use crate::budget::SizeReport;

/// One declaration in a class rule: a CSS property fed by a token
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CssProperty {
    pub property: String,
    pub token_id: String,
}

impl CssProperty {
    pub fn new(property: impl Into<String>, token_id: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            token_id: token_id.into(),
        }
    }
}

/// A semantic class rule resolved within a scope
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassDef {
    /// Class name without the leading dot
    pub class_name: String,
    #[serde(default)]
    pub scope: Scope,
    pub properties: Vec<CssProperty>,
}

impl ClassDef {
    pub fn new(class_name: impl Into<String>, scope: Scope) -> Self {
        Self {
            class_name: class_name.into(),
            scope,
            properties: Vec::new(),
        }
    }

    pub fn property(mut self, property: &str, token_id: &str) -> Self {
        self.properties.push(CssProperty::new(property, token_id));
        self
    }
}

/// Everything one emission run should produce
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CssRequest {
    #[serde(default)]
    pub components: Vec<ClassDef>,
    #[serde(default)]
    pub utilities: Vec<ClassDef>,
}

/// Emitted CSS plus its size accounting
#[derive(Clone, Debug, Serialize)]
pub struct CssOutput {
    pub css: String,
    pub report: SizeReport,
}

/// Serializes resolved tokens into CSS text
pub struct CssEmitter<'a> {
    registry: &'a TokenRegistry,
    cache: &'a ResolutionCache,
}

impl<'a> CssEmitter<'a> {
    pub fn new(registry: &'a TokenRegistry, cache: &'a ResolutionCache) -> Self {
        Self { registry, cache }
    }

    /// Emit the custom-property block for every global token
    ///
    /// The selector is scoped to the stack's most specific theme:
    /// `[data-theme="dark"] { --color-primary: #3399ff; }`
    pub fn emit_theme(&self, stack: &ThemeStack) -> String {
        let theme_id = stack.top().map(|t| t.id.as_str()).unwrap_or("default");
        let scope = Scope::global();
        let mut css = format!("[data-theme=\"{theme_id}\"] {{\n");
        for token_id in composition_ids(self.registry, stack) {
            match resolve_cached(self.registry, self.cache, stack, &scope, &token_id) {
                Ok(resolved) => {
                    css.push_str(&format!("  --{token_id}: {};\n", resolved.value));
                }
                Err(err) => {
                    tracing::warn!(%token_id, %err, "token skipped during theme emission");
                    css.push_str(&format!("  /* unresolved: {token_id} ({err}) */\n"));
                }
            }
        }
        css.push_str("}\n");
        css
    }

    /// Emit class rules, resolving each declaration within its def's scope
    pub fn emit_classes(&self, stack: &ThemeStack, defs: &[ClassDef]) -> String {
        let mut css = String::new();
        for def in defs {
            css.push_str(&format!(".{} {{\n", def.class_name));
            for prop in &def.properties {
                match resolve_cached(self.registry, self.cache, stack, &def.scope, &prop.token_id) {
                    Ok(resolved) => {
                        css.push_str(&format!("  {}: {};\n", prop.property, resolved.value));
                    }
                    Err(err) => {
                        tracing::warn!(
                            class = %def.class_name,
                            token_id = %prop.token_id,
                            %err,
                            "declaration skipped during class emission"
                        );
                        css.push_str(&format!(
                            "  /* unresolved: {} ({err}) */\n",
                            prop.token_id
                        ));
                    }
                }
            }
            css.push_str("}\n");
        }
        css
    }

    /// Full emission: tokens, components, and utilities with size accounting
    ///
    /// The returned CSS may exceed a budget only when the report says so.
    pub fn generate(&self, stack: &ThemeStack, request: &CssRequest) -> CssOutput {
        let tokens = self.emit_theme(stack);
        let components = self.emit_classes(stack, &request.components);
        let utilities = self.emit_classes(stack, &request.utilities);

        let report = SizeReport::new(tokens.len(), components.len(), utilities.len());
        for overflow in &report.over_budget {
            tracing::warn!(%overflow, "css emission over budget");
        }

        let mut css = tokens;
        if !components.is_empty() {
            css.push('\n');
            css.push_str(&components);
        }
        if !utilities.is_empty() {
            css.push('\n');
            css.push_str(&utilities);
        }
        CssOutput { css, report }
    }
}
