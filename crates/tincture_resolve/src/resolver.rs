//! Scoped reference resolution
//!
//! Walks a scope's search chain level by level. Scope-local definitions act
//! as a highest-priority layer above the theme stack at their level; at the
//! `global` level the theme composer picks the winner. Aliases re-enter the
//! same walk per hop, so a component-scoped alias can point at a global token
//! and an alias in one theme can land in another.
//!
//! Cycle detection uses an id-based visited set plus the ordered recursion
//! stack, never object identity, so the reported cycle chain is exact and the
//! algorithm stays portable.

use rustc_hash::FxHashSet;
use smallvec::smallvec;

use tincture_core::scope::GLOBAL_SCOPE;
use tincture_core::{
    DesignToken, ResolutionChain, ResolvedToken, Scope, ThemeStack, TokenError, TokenResult,
    TokenValue,
};

use crate::cache::{CacheKey, ResolutionCache};
use crate::compose::compose;
use crate::registry::TokenRegistry;

/// Alias chains longer than this are a resolver defect, reported as an error
/// instead of unbounded recursion
pub const MAX_REFERENCE_DEPTH: usize = 32;

/// The definition a scope-chain lookup settled on, with its provenance
struct LookupHit {
    token: DesignToken,
    scope: String,
    theme: Option<String>,
}

/// Resolves tokens against one (registry, theme stack, scope) triple
pub struct ScopedResolver<'a> {
    registry: &'a TokenRegistry,
    stack: &'a ThemeStack,
    chain: Vec<String>,
}

impl<'a> ScopedResolver<'a> {
    pub fn new(registry: &'a TokenRegistry, stack: &'a ThemeStack, scope: &Scope) -> Self {
        Self {
            registry,
            stack,
            chain: scope.search_chain(),
        }
    }

    /// Resolve a token to its terminal literal value
    pub fn resolve(&self, token_id: &str) -> TokenResult<ResolvedToken> {
        let mut visited = FxHashSet::default();
        let mut order = Vec::new();
        self.resolve_inner(token_id, &mut visited, &mut order)
    }

    fn resolve_inner(
        &self,
        token_id: &str,
        visited: &mut FxHashSet<String>,
        order: &mut Vec<String>,
    ) -> TokenResult<ResolvedToken> {
        if visited.contains(token_id) {
            // The reported chain starts at the first occurrence of the
            // repeated id, so it contains every cycle node exactly once.
            let start = order
                .iter()
                .position(|id| id == token_id)
                .unwrap_or(0);
            return Err(TokenError::CircularReference {
                chain: order[start..].to_vec(),
            });
        }
        if order.len() >= MAX_REFERENCE_DEPTH {
            return Err(TokenError::ReferenceDepthExceeded {
                id: order.first().cloned().unwrap_or_else(|| token_id.to_string()),
                max: MAX_REFERENCE_DEPTH,
            });
        }
        visited.insert(token_id.to_string());
        order.push(token_id.to_string());

        let hit = self.lookup(token_id)?;
        match &hit.token.value {
            TokenValue::Literal(value) => Ok(ResolvedToken {
                token_id: token_id.to_string(),
                value: value.clone(),
                resolved_scope: hit.scope,
                resolved_theme: hit.theme,
                chain: smallvec![token_id.to_string()],
            }),
            TokenValue::Alias(target) => {
                let child = self.resolve_inner(target, visited, order)?;
                let mut chain: ResolutionChain = smallvec![token_id.to_string()];
                chain.extend(child.chain);
                Ok(ResolvedToken {
                    token_id: token_id.to_string(),
                    value: child.value,
                    resolved_scope: hit.scope,
                    resolved_theme: hit.theme,
                    chain,
                })
            }
        }
    }

    /// Walk the scope chain for the raw winning definition of one id
    fn lookup(&self, token_id: &str) -> TokenResult<LookupHit> {
        for level in &self.chain {
            if level == GLOBAL_SCOPE {
                match compose(self.registry, self.stack, token_id) {
                    Ok(composed) => {
                        return Ok(LookupHit {
                            token: composed.token,
                            scope: GLOBAL_SCOPE.to_string(),
                            theme: composed.source_theme,
                        });
                    }
                    Err(TokenError::TokenNotFound { .. }) => {}
                    Err(other) => return Err(other),
                }
            } else if let Some(token) = self.registry.get_in(level, token_id) {
                return Ok(LookupHit {
                    token: token.clone(),
                    scope: level.clone(),
                    theme: None,
                });
            }
        }
        if self.chain.len() == 1 {
            Err(TokenError::TokenNotFound {
                id: token_id.to_string(),
            })
        } else {
            Err(TokenError::ScopeNotFound {
                id: token_id.to_string(),
                searched: self.chain.clone(),
            })
        }
    }
}

/// Resolve through the cache
///
/// The key folds in the stack signature and registry version, so theme swaps
/// and token mutations miss naturally instead of needing a sweep. Only
/// successful resolutions are cached; errors stay localized to their call.
pub fn resolve_cached(
    registry: &TokenRegistry,
    cache: &ResolutionCache,
    stack: &ThemeStack,
    scope: &Scope,
    token_id: &str,
) -> TokenResult<ResolvedToken> {
    let key = CacheKey::new(token_id, stack.signature(), scope.as_str(), registry.version());
    if let Some(hit) = cache.get(&key) {
        return Ok(hit);
    }
    let resolved = ScopedResolver::new(registry, stack, scope).resolve(token_id)?;
    cache.put(key, resolved.clone());
    Ok(resolved)
}
