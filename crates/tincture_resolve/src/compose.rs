//! Theme-stack composition
//!
//! Picks the winning definition of a token across an ordered theme stack.
//! Every theme that overrides the token becomes a candidate; the numerically
//! highest declared priority wins and, on ties, the candidate later in the
//! stack (more specific) takes precedence. With no theme candidate at all,
//! composition falls through to the registry's base definition.

use indexmap::IndexSet;

use tincture_core::{DesignToken, ThemeStack, TokenError, TokenResult, TokenValue};

use crate::registry::TokenRegistry;

/// One theme's claim on a token during composition
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub theme_id: String,
    pub declared_priority: i32,
    pub stack_index: usize,
    pub value: TokenValue,
}

/// The winning definition plus the full candidate list for auditability
#[derive(Clone, Debug, PartialEq)]
pub struct Composition {
    pub token: DesignToken,
    /// Theme that supplied the winner; `None` when the base definition won
    pub source_theme: Option<String>,
    pub priority: i32,
    pub candidates: Vec<Candidate>,
}

/// Every token id visible through composition at the global level
///
/// A theme may introduce a token the base registry never defines; such ids
/// still compose and must appear in snapshots and emitted CSS. Registry ids
/// come first in registration order, theme-introduced ids follow in stack
/// then declaration order.
pub fn composition_ids(registry: &TokenRegistry, stack: &ThemeStack) -> Vec<String> {
    let mut ids: IndexSet<String> = registry.global_ids().map(str::to_string).collect();
    for theme in stack.iter() {
        for id in theme.overrides.keys() {
            if !ids.contains(id) {
                ids.insert(id.clone());
            }
        }
    }
    ids.into_iter().collect()
}

/// Compose a token against a theme stack
pub fn compose(
    registry: &TokenRegistry,
    stack: &ThemeStack,
    token_id: &str,
) -> TokenResult<Composition> {
    let mut candidates = Vec::new();
    let mut winner: Option<(i32, usize)> = None;

    for (index, theme) in stack.iter().enumerate() {
        let Some(token) = theme.get(token_id) else {
            continue;
        };
        candidates.push(Candidate {
            theme_id: theme.id.clone(),
            declared_priority: theme.priority,
            stack_index: index,
            value: token.value.clone(),
        });
        // Later candidates replace on ties: stack order is the tie-break
        // authority, declared priority decides otherwise.
        let replaces = match winner {
            None => true,
            Some((best_priority, _)) => theme.priority >= best_priority,
        };
        if replaces {
            winner = Some((theme.priority, index));
        }
    }

    if let Some((priority, index)) = winner {
        let theme = stack.iter().nth(index).expect("winner index in bounds");
        let token = theme.get(token_id).expect("winner defines token").clone();
        return Ok(Composition {
            token,
            source_theme: Some(theme.id.clone()),
            priority,
            candidates,
        });
    }

    match registry.get(token_id) {
        Ok(token) => Ok(Composition {
            token: token.clone(),
            source_theme: None,
            priority: 0,
            candidates,
        }),
        Err(_) => Err(TokenError::TokenNotFound {
            id: token_id.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tincture_core::{ThemeDefinition, TokenType};

    fn color(id: &str, value: &str) -> DesignToken {
        DesignToken::new(id, TokenType::Color, value)
    }

    fn base_registry() -> TokenRegistry {
        let mut registry = TokenRegistry::new();
        registry.register(color("color-primary", "#0066cc")).unwrap();
        registry
    }

    #[test]
    fn theme_override_beats_base_definition() {
        let registry = base_registry();
        let stack = ThemeStack::new(vec![
            ThemeDefinition::new("base"),
            ThemeDefinition::new("dark").override_token(color("color-primary", "#3399ff")),
        ]);

        let composed = compose(&registry, &stack, "color-primary").unwrap();
        assert_eq!(composed.source_theme.as_deref(), Some("dark"));
        assert_eq!(composed.token.value.raw(), "#3399ff");
        assert_eq!(composed.candidates.len(), 1);
    }

    #[test]
    fn equal_priority_goes_to_the_later_theme() {
        let registry = base_registry();
        let stack = ThemeStack::new(vec![
            ThemeDefinition::new("dark")
                .with_priority(10)
                .override_token(color("color-primary", "#111111")),
            ThemeDefinition::new("high-contrast")
                .with_priority(10)
                .override_token(color("color-primary", "#ffffff")),
        ]);

        let composed = compose(&registry, &stack, "color-primary").unwrap();
        assert_eq!(composed.source_theme.as_deref(), Some("high-contrast"));
        assert_eq!(composed.token.value.raw(), "#ffffff");
        assert_eq!(composed.candidates.len(), 2);
    }

    #[test]
    fn higher_declared_priority_beats_stack_position() {
        let registry = base_registry();
        let stack = ThemeStack::new(vec![
            ThemeDefinition::new("brand")
                .with_priority(100)
                .override_token(color("color-primary", "#bb0000")),
            ThemeDefinition::new("dark")
                .with_priority(10)
                .override_token(color("color-primary", "#3399ff")),
        ]);

        let composed = compose(&registry, &stack, "color-primary").unwrap();
        assert_eq!(composed.source_theme.as_deref(), Some("brand"));
        assert_eq!(composed.priority, 100);
    }

    #[test]
    fn falls_through_to_base_when_no_theme_overrides() {
        let registry = base_registry();
        let stack = ThemeStack::new(vec![ThemeDefinition::new("dark")]);

        let composed = compose(&registry, &stack, "color-primary").unwrap();
        assert_eq!(composed.source_theme, None);
        assert_eq!(composed.token.value.raw(), "#0066cc");
        assert!(composed.candidates.is_empty());
    }

    #[test]
    fn composition_ids_include_theme_introduced_tokens() {
        let registry = base_registry();
        let stack = ThemeStack::new(vec![
            ThemeDefinition::new("base"),
            ThemeDefinition::new("dark")
                .override_token(color("color-primary", "#3399ff"))
                .override_token(color("color-focus", "#ff9900")),
        ]);

        let ids = composition_ids(&registry, &stack);
        assert_eq!(ids, ["color-primary", "color-focus"]);
    }

    #[test]
    fn absent_everywhere_is_not_found() {
        let registry = TokenRegistry::new();
        let stack = ThemeStack::new(vec![ThemeDefinition::new("dark")]);
        assert!(matches!(
            compose(&registry, &stack, "color-missing"),
            Err(TokenError::TokenNotFound { .. })
        ));
    }
}
