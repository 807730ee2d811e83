//! Authoritative token store
//!
//! Base (theme-independent) definitions keyed by scope level, then token id.
//! Registration is the only mutation path; every mutation bumps a monotonic
//! version counter that the resolution cache folds into its keys, so stale
//! entries age out without an invalidation sweep.

use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;

use tincture_core::scope::GLOBAL_SCOPE;
use tincture_core::{DesignToken, TokenError, TokenResult, ValidationReport, Validator};

/// Scope-keyed store of base token definitions
#[derive(Debug, Default)]
pub struct TokenRegistry {
    /// scope level -> token id -> definition, both in insertion order
    scopes: IndexMap<String, IndexMap<String, DesignToken>>,
    version: AtomicU64,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token in the global scope
    pub fn register(&mut self, token: DesignToken) -> TokenResult<()> {
        self.register_in(GLOBAL_SCOPE, token)
    }

    /// Register a token in a specific scope level
    ///
    /// Fails with `DuplicateId` when the id already exists in that scope.
    pub fn register_in(&mut self, scope: &str, token: DesignToken) -> TokenResult<()> {
        let tokens = self.scopes.entry(scope.to_string()).or_default();
        if tokens.contains_key(&token.id) {
            return Err(TokenError::DuplicateId {
                id: token.id.clone(),
                scope: scope.to_string(),
            });
        }
        tracing::trace!(id = %token.id, scope, "registered token");
        tokens.insert(token.id.clone(), token);
        self.bump();
        Ok(())
    }

    /// Replace an existing definition (or insert a new one)
    ///
    /// Resolved values are never mutated in place; an update produces a new
    /// registry version, which invalidates dependent cache entries by key.
    pub fn upsert_in(&mut self, scope: &str, token: DesignToken) {
        self.scopes
            .entry(scope.to_string())
            .or_default()
            .insert(token.id.clone(), token);
        self.bump();
    }

    /// Load a batch of tokens into a scope, collecting every failure into one
    /// report instead of stopping at the first offender
    pub fn load(
        &mut self,
        scope: &str,
        tokens: impl IntoIterator<Item = DesignToken>,
        validator: &Validator,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();
        for token in tokens {
            let validation = validator.validate_token(&token);
            let id = token.id.clone();
            let valid = validation.is_valid;
            report.record(&id, validation);
            if !valid {
                continue;
            }
            if let Err(err) = self.register_in(scope, token) {
                // The token passed validation but collided; fold the duplicate
                // into the same batch report.
                report.rejected.push((id, vec![err]));
            }
        }
        report
    }

    /// Get a token from the global scope
    pub fn get(&self, id: &str) -> TokenResult<&DesignToken> {
        self.get_in(GLOBAL_SCOPE, id)
            .ok_or_else(|| TokenError::TokenNotFound { id: id.to_string() })
    }

    /// Get a token from a specific scope level, if present
    pub fn get_in(&self, scope: &str, id: &str) -> Option<&DesignToken> {
        self.scopes.get(scope)?.get(id)
    }

    /// Lazy, finite, restartable iteration over every registered token
    pub fn all(&self) -> impl Iterator<Item = &DesignToken> {
        self.scopes.values().flat_map(|tokens| tokens.values())
    }

    /// Token ids registered in the global scope, in registration order
    pub fn global_ids(&self) -> impl Iterator<Item = &str> {
        self.scopes
            .get(GLOBAL_SCOPE)
            .into_iter()
            .flat_map(|tokens| tokens.keys().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.scopes.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current registry version; bumped on every mutation
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    fn bump(&self) {
        self.version.fetch_add(1, Ordering::AcqRel);
    }

    /// Detect a structurally corrupt registry
    ///
    /// A mismatch between a map key and the stored token's id would make every
    /// downstream composition nondeterministic, so this is the one fatal
    /// load-time condition.
    pub fn verify_integrity(&self) -> TokenResult<()> {
        for (scope, tokens) in &self.scopes {
            for (key, token) in tokens {
                if key != &token.id {
                    return Err(TokenError::InvalidFormat {
                        id: token.id.clone(),
                        reason: format!(
                            "registry corrupt: stored under key `{key}` in scope `{scope}`"
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tincture_core::TokenType;

    fn color(id: &str, value: &str) -> DesignToken {
        DesignToken::new(id, TokenType::Color, value)
    }

    #[test]
    fn duplicate_id_in_same_scope_is_rejected() {
        let mut registry = TokenRegistry::new();
        registry.register(color("color-primary", "#0066cc")).unwrap();
        let err = registry
            .register(color("color-primary", "#3399ff"))
            .unwrap_err();
        assert_eq!(
            err,
            TokenError::DuplicateId {
                id: "color-primary".to_string(),
                scope: "global".to_string(),
            }
        );
    }

    #[test]
    fn same_id_in_different_scopes_is_fine() {
        let mut registry = TokenRegistry::new();
        registry.register(color("color-primary", "#0066cc")).unwrap();
        registry
            .register_in("components.button", color("color-primary", "#111111"))
            .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn every_mutation_bumps_the_version() {
        let mut registry = TokenRegistry::new();
        let v0 = registry.version();
        registry.register(color("color-primary", "#0066cc")).unwrap();
        let v1 = registry.version();
        registry.upsert_in(GLOBAL_SCOPE, color("color-primary", "#3399ff"));
        let v2 = registry.version();
        assert!(v0 < v1 && v1 < v2);
    }

    #[test]
    fn all_is_restartable() {
        let mut registry = TokenRegistry::new();
        registry.register(color("color-a", "#aaa")).unwrap();
        registry.register(color("color-b", "#bbb")).unwrap();
        assert_eq!(registry.all().count(), 2);
        assert_eq!(registry.all().count(), 2);
    }

    #[test]
    fn load_collects_all_failures_in_one_pass() {
        let mut registry = TokenRegistry::new();
        registry.register(color("color-dup", "#000")).unwrap();
        let report = registry.load(
            GLOBAL_SCOPE,
            vec![
                color("color-ok", "#fff"),
                color("color-bad", "nope"),
                color("color-dup", "#111"),
            ],
            &Validator::strict(),
        );
        assert_eq!(report.checked, 3);
        assert_eq!(report.rejected.len(), 2);
        assert!(registry.get("color-ok").is_ok());
        // The pre-existing definition survives the collision
        assert_eq!(
            registry.get("color-dup").unwrap().value.raw(),
            "#000"
        );
    }

    #[test]
    fn missing_token_reports_not_found() {
        let registry = TokenRegistry::new();
        assert_eq!(
            registry.get("color-missing").unwrap_err(),
            TokenError::TokenNotFound {
                id: "color-missing".to_string()
            }
        );
    }
}
