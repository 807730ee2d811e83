//! End-to-end behavior of the resolution pipeline through the engine facade.

use tincture_engine::{
    ClassDef, CssRequest, DesignToken, Scope, ThemeDefinition, ThemeEngine, ThemeStack,
    TokenError, TokenRegistry, TokenType,
};

fn color(id: &str, value: &str) -> DesignToken {
    DesignToken::new(id, TokenType::Color, value)
}

fn base_dark_engine() -> ThemeEngine {
    let mut registry = TokenRegistry::new();
    registry.register(color("color-primary", "#0066cc")).unwrap();
    registry.register(color("color-secondary", "#888888")).unwrap();
    ThemeEngine::new(registry)
}

fn base_dark_stack() -> ThemeStack {
    ThemeStack::new(vec![
        ThemeDefinition::new("base"),
        ThemeDefinition::new("dark").override_token(color("color-primary", "#3399ff")),
    ])
}

#[test]
fn literal_tokens_resolve_with_singleton_chain() {
    let engine = base_dark_engine();
    let stack = ThemeStack::new(vec![ThemeDefinition::new("base")]);
    let resolved = engine.resolve("color-secondary", &stack, None).unwrap();
    assert_eq!(resolved.value, "#888888");
    assert_eq!(resolved.chain.as_slice(), ["color-secondary"]);
}

#[test]
fn alias_chain_of_length_n_terminates_in_n_steps() {
    let mut registry = TokenRegistry::new();
    registry.register(color("color-0", "#123456")).unwrap();
    for i in 1..=5 {
        registry
            .register(color(&format!("color-{i}"), &format!("{{color-{}}}", i - 1)))
            .unwrap();
    }
    let engine = ThemeEngine::new(registry);
    let stack = ThemeStack::default();

    let resolved = engine.resolve("color-5", &stack, None).unwrap();
    assert_eq!(resolved.value, "#123456");
    assert_eq!(resolved.chain.len(), 6);
    assert_eq!(resolved.chain.first().map(String::as_str), Some("color-5"));
    assert_eq!(resolved.chain.last().map(String::as_str), Some("color-0"));
}

#[test]
fn three_token_cycle_reports_every_node_once() {
    let mut registry = TokenRegistry::new();
    registry.register(color("token-a", "{token-b}")).unwrap();
    registry.register(color("token-b", "{token-c}")).unwrap();
    registry.register(color("token-c", "{token-a}")).unwrap();
    let engine = ThemeEngine::new(registry);

    let err = engine
        .resolve("token-a", &ThemeStack::default(), None)
        .unwrap_err();
    let TokenError::CircularReference { chain } = err else {
        panic!("expected CircularReference, got {err:?}");
    };
    for id in ["token-a", "token-b", "token-c"] {
        assert_eq!(chain.iter().filter(|c| c.as_str() == id).count(), 1);
    }
    assert_eq!(chain.len(), 3);
}

#[test]
fn dark_override_wins_over_base_definition() {
    let engine = base_dark_engine();
    let resolved = engine
        .resolve("color-primary", &base_dark_stack(), None)
        .unwrap();
    assert_eq!(resolved.value, "#3399ff");
    assert_eq!(resolved.resolved_theme.as_deref(), Some("dark"));
}

#[test]
fn equal_priority_ties_break_toward_later_stack_entry() {
    let engine = base_dark_engine();
    let stack = ThemeStack::new(vec![
        ThemeDefinition::new("base"),
        ThemeDefinition::new("dark")
            .with_priority(10)
            .override_token(color("color-primary", "#111111")),
        ThemeDefinition::new("high-contrast")
            .with_priority(10)
            .override_token(color("color-primary", "#ffffff")),
    ]);

    let resolved = engine.resolve("color-primary", &stack, None).unwrap();
    assert_eq!(resolved.value, "#ffffff");
    assert_eq!(resolved.resolved_theme.as_deref(), Some("high-contrast"));
}

#[test]
fn scoped_token_resolves_locally_and_falls_back_elsewhere() {
    let mut engine = base_dark_engine();
    engine
        .registry_mut()
        .register_in("components.button", color("color-emphasis", "#ff2200"))
        .unwrap();
    engine
        .registry_mut()
        .register(color("color-emphasis", "#dd8800"))
        .unwrap();
    let stack = base_dark_stack();

    let button = engine
        .resolve("color-emphasis", &stack, Some(&Scope::new("components.button")))
        .unwrap();
    assert_eq!(button.value, "#ff2200");
    assert_eq!(button.resolved_scope, "components.button");

    let input = engine
        .resolve("color-emphasis", &stack, Some(&Scope::new("components.input")))
        .unwrap();
    assert_eq!(input.value, "#dd8800");
    assert_eq!(input.resolved_scope, "global");
}

#[test]
fn theme_introduced_token_reaches_snapshot_and_css() {
    let engine = base_dark_engine();
    let stack = base_dark_stack().push(
        ThemeDefinition::new("focus-ring").override_token(color("color-focus", "#ff9900")),
    );

    let resolved = engine.resolve("color-focus", &stack, None).unwrap();
    assert_eq!(resolved.value, "#ff9900");

    // A token only a theme defines must show up everywhere resolve() finds it.
    let snapshot = engine.compose_theme(&stack);
    assert!(snapshot.resolved.contains_key("color-focus"));

    let output = engine.generate_css(&stack, &CssRequest::default());
    assert!(output.css.contains("--color-focus: #ff9900;"));
}

#[test]
fn cache_is_idempotent_and_pattern_invalidation_is_targeted() {
    let engine = base_dark_engine();
    let stack = base_dark_stack();

    let first = engine.resolve("color-primary", &stack, None).unwrap();
    let second = engine.resolve("color-primary", &stack, None).unwrap();
    assert_eq!(first, second);
    engine.resolve("color-secondary", &stack, None).unwrap();

    let evicted = engine.invalidate(Some("color-primary"));
    assert_eq!(evicted, 1);

    let stats_before = engine.cache_stats();
    // color-secondary is still cached, color-primary must recompute
    engine.resolve("color-secondary", &stack, None).unwrap();
    engine.resolve("color-primary", &stack, None).unwrap();
    let stats_after = engine.cache_stats();
    assert_eq!(stats_after.hits, stats_before.hits + 1);
    assert_eq!(stats_after.misses, stats_before.misses + 1);
}

#[test]
fn css_never_exceeds_total_budget_silently() {
    let mut registry = TokenRegistry::new();
    for i in 0..400 {
        registry
            .register(DesignToken::new(
                format!("gradient-band-{i:03}"),
                TokenType::Gradient,
                "linear-gradient(135deg, #001122 0%, #334455 40%, #667788 80%, #99aabb 100%)",
            ))
            .unwrap();
    }
    let engine = ThemeEngine::new(registry);
    let stack = ThemeStack::new(vec![ThemeDefinition::new("base")]);

    let output = engine.generate_css(&stack, &CssRequest::default());
    if output.css.len() > tincture_css::TOTAL_BUDGET {
        assert!(output
            .report
            .over_budget
            .iter()
            .any(|e| matches!(e, TokenError::BudgetExceeded { category, .. } if category == "total")));
    }
    // This fixture is deliberately oversized.
    assert!(!output.report.within_budget());
}

#[test]
fn end_to_end_dark_theme_resolution() {
    let engine = base_dark_engine();
    let resolved = engine
        .resolve("color-primary", &base_dark_stack(), Some(&Scope::global()))
        .unwrap();
    assert_eq!(resolved.value, "#3399ff");
    assert_eq!(resolved.resolved_theme.as_deref(), Some("dark"));
    assert_eq!(resolved.resolved_scope, "global");
}

#[test]
fn component_class_css_uses_scoped_values() {
    let mut engine = base_dark_engine();
    engine
        .registry_mut()
        .register_in("components.button", color("color-primary", "#101010"))
        .unwrap();

    let request = CssRequest {
        components: vec![ClassDef::new("btn", Scope::new("components.button"))
            .property("background-color", "color-primary")],
        utilities: Vec::new(),
    };
    let output = engine.generate_css(&base_dark_stack(), &request);
    assert!(output.css.contains(".btn {"));
    assert!(output.css.contains("background-color: #101010;"));
    // The global custom property still carries the theme override
    assert!(output.css.contains("--color-primary: #3399ff;"));
}
