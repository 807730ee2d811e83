//! Engine facade
//!
//! One explicitly owned instance over registry, cache, and the active theme
//! stack. There is deliberately no module-level singleton: tests (and
//! embedders) construct isolated engines in parallel. All resolution paths
//! funnel cache -> scope resolver -> theme composer -> reference resolver ->
//! registry.

use std::sync::atomic::AtomicU64;
use std::sync::{Arc, RwLock};

use indexmap::IndexMap;

use tincture_core::{
    DesignToken, ResolvedToken, Scope, ThemeStack, TokenError, TokenResult, ValidationReport,
    Validator,
};
use tincture_css::{CssEmitter, CssOutput, CssRequest};
use tincture_resolve::{composition_ids, resolve_cached, CacheStats, ResolutionCache, TokenRegistry};

use crate::events::{ThemeChanged, ThemeListener};

/// A full resolved snapshot of the global token set against one stack
///
/// Per-token failures are localized: a bad token lands in `failures` instead
/// of aborting resolution of its siblings.
#[derive(Debug, Default)]
pub struct ThemeSnapshot {
    pub resolved: IndexMap<String, ResolvedToken>,
    pub failures: Vec<(String, TokenError)>,
}

impl ThemeSnapshot {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The design-token resolution and theme-composition engine
pub struct ThemeEngine {
    registry: TokenRegistry,
    cache: ResolutionCache,
    /// Active stack reference; swapped atomically, never mutated in place
    active: RwLock<Arc<ThemeStack>>,
    /// Switch epoch for last-switch-wins ordering
    pub(crate) epoch: AtomicU64,
    listeners: RwLock<Vec<ThemeListener>>,
}

impl ThemeEngine {
    pub fn new(registry: TokenRegistry) -> Self {
        Self::with_stack(registry, ThemeStack::default())
    }

    pub fn with_stack(registry: TokenRegistry, stack: ThemeStack) -> Self {
        Self {
            registry,
            cache: ResolutionCache::new(),
            active: RwLock::new(Arc::new(stack)),
            epoch: AtomicU64::new(0),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Mutation access to the registry; every mutation bumps the registry
    /// version, which retires dependent cache entries by key
    pub fn registry_mut(&mut self) -> &mut TokenRegistry {
        &mut self.registry
    }

    /// The currently applied stack
    pub fn active_stack(&self) -> Arc<ThemeStack> {
        self.active.read().expect("active stack lock poisoned").clone()
    }

    pub(crate) fn set_active(&self, stack: Arc<ThemeStack>) {
        *self.active.write().expect("active stack lock poisoned") = stack;
    }

    /// Resolve a single token against a stack, optionally within a scope
    pub fn resolve(
        &self,
        token_id: &str,
        stack: &ThemeStack,
        scope: Option<&Scope>,
    ) -> TokenResult<ResolvedToken> {
        let global = Scope::global();
        let scope = scope.unwrap_or(&global);
        resolve_cached(&self.registry, &self.cache, stack, scope, token_id)
    }

    /// Resolve every globally visible token against a stack, including tokens
    /// the stack's themes introduce on top of the base registry
    pub fn compose_theme(&self, stack: &ThemeStack) -> ThemeSnapshot {
        let scope = Scope::global();
        let mut snapshot = ThemeSnapshot::default();
        for id in composition_ids(&self.registry, stack) {
            match resolve_cached(&self.registry, &self.cache, stack, &scope, &id) {
                Ok(resolved) => {
                    snapshot.resolved.insert(id, resolved);
                }
                Err(err) => snapshot.failures.push((id, err)),
            }
        }
        tracing::debug!(
            resolved = snapshot.resolved.len(),
            failed = snapshot.failures.len(),
            stack = ?stack.ids(),
            "composed theme snapshot"
        );
        snapshot
    }

    /// Emit CSS for a stack and the requested class definitions
    pub fn generate_css(&self, stack: &ThemeStack, request: &CssRequest) -> CssOutput {
        CssEmitter::new(&self.registry, &self.cache).generate(stack, request)
    }

    /// Validate a batch of tokens into one report
    pub fn validate_tokens<'a>(
        &self,
        tokens: impl IntoIterator<Item = &'a DesignToken>,
        strict: bool,
    ) -> ValidationReport {
        Validator::new(strict).validate_all(tokens)
    }

    /// Explicit cache eviction; returns the number of entries removed
    pub fn invalidate(&self, pattern: Option<&str>) -> usize {
        self.cache.invalidate(pattern)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Register a listener for applied theme switches
    pub fn on_theme_changed(&self, listener: impl Fn(&ThemeChanged) + Send + Sync + 'static) {
        self.listeners
            .write()
            .expect("listener lock poisoned")
            .push(Box::new(listener));
    }

    pub(crate) fn notify(&self, event: &ThemeChanged) {
        for listener in self.listeners.read().expect("listener lock poisoned").iter() {
            listener(event);
        }
    }
}
