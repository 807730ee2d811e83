//! Theme switch protocol
//!
//! `Idle -> Validating -> Composing -> Emitting -> Applied`, with `Reverting`
//! reachable from any non-idle phase on failure. A failed switch leaves the
//! previously applied stack active; the UI is never left partially applied.
//!
//! Switches race by epoch: a run that is overtaken by a newer switch discards
//! its result instead of applying out of order (last-switch-wins). The 500ms
//! end-to-end budget is a service-level objective measured here and logged,
//! not a hard abort: the work is O(number of tokens) with no I/O, so meeting
//! the budget is a consequence of design.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;

use tincture_core::{ThemeStack, TokenError, Validator};
use tincture_css::{CssOutput, CssRequest};

use crate::engine::ThemeEngine;
use crate::events::ThemeChanged;

/// End-to-end switch budget (validate -> compose -> emit -> apply)
pub const SWITCH_BUDGET: Duration = Duration::from_millis(500);

/// Phases of the switch protocol
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchPhase {
    Idle,
    Validating,
    Composing,
    Emitting,
    Applied,
    Reverting,
}

impl std::fmt::Display for SwitchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SwitchPhase::Idle => "idle",
            SwitchPhase::Validating => "validating",
            SwitchPhase::Composing => "composing",
            SwitchPhase::Emitting => "emitting",
            SwitchPhase::Applied => "applied",
            SwitchPhase::Reverting => "reverting",
        };
        f.write_str(name)
    }
}

/// Result of one switch attempt
#[derive(Debug)]
pub struct SwitchOutcome {
    /// Whether the new stack became active
    pub applied: bool,
    /// A newer switch started before this one finished; result discarded
    pub superseded: bool,
    /// Phases traversed, in order, for diagnostics
    pub phases: Vec<SwitchPhase>,
    pub duration: Duration,
    /// Emitted CSS when the run reached `Emitting`
    pub css: Option<CssOutput>,
    /// The originating error when the run reverted
    pub error: Option<TokenError>,
}

impl SwitchOutcome {
    fn reverted(phases: Vec<SwitchPhase>, started: Instant, error: TokenError) -> Self {
        Self {
            applied: false,
            superseded: false,
            phases,
            duration: started.elapsed(),
            css: None,
            error: Some(error),
        }
    }
}

impl ThemeEngine {
    /// Run the full switch protocol against a new stack
    ///
    /// `request` names the class definitions currently mounted, so Composing
    /// covers every token the UI actually needs before anything is applied.
    pub fn switch_theme(&self, stack: ThemeStack, request: &CssRequest) -> SwitchOutcome {
        let my_epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        self.run_switch(my_epoch, stack, request)
    }

    fn run_switch(&self, my_epoch: u64, stack: ThemeStack, request: &CssRequest) -> SwitchOutcome {
        let started = Instant::now();
        let mut phases = vec![SwitchPhase::Validating];
        tracing::debug!(stack = ?stack.ids(), epoch = my_epoch, "theme switch requested");

        // Validating: the requested stack must exist and its overrides must
        // pass the strict validator.
        if stack.is_empty() {
            phases.push(SwitchPhase::Reverting);
            tracing::warn!("theme switch reverted: empty stack");
            return SwitchOutcome::reverted(
                phases,
                started,
                TokenError::InvalidFormat {
                    id: "<stack>".to_string(),
                    reason: "theme stack is empty".to_string(),
                },
            );
        }
        let validator = Validator::strict();
        for theme in stack.iter() {
            let report = validator.validate_all(theme.overrides.values());
            if !report.is_clean() {
                let (token_id, errors) = report.rejected.into_iter().next().expect("not clean");
                phases.push(SwitchPhase::Reverting);
                tracing::warn!(theme = %theme.id, token_id, "theme switch reverted in validation");
                return SwitchOutcome::reverted(
                    phases,
                    started,
                    errors.into_iter().next().unwrap_or(TokenError::InvalidFormat {
                        id: token_id,
                        reason: "validation failed".to_string(),
                    }),
                );
            }
        }

        // Composing: build the full snapshot, then make sure every token the
        // mounted classes depend on resolved. Other failures stay localized.
        phases.push(SwitchPhase::Composing);
        let snapshot = self.compose_theme(&stack);
        let needed: FxHashSet<&str> = request
            .components
            .iter()
            .chain(request.utilities.iter())
            .flat_map(|def| def.properties.iter())
            .map(|prop| prop.token_id.as_str())
            .collect();
        for def in request.components.iter().chain(request.utilities.iter()) {
            for prop in &def.properties {
                if let Err(err) = self.resolve(&prop.token_id, &stack, Some(&def.scope)) {
                    phases.push(SwitchPhase::Reverting);
                    tracing::warn!(
                        token_id = %prop.token_id,
                        class = %def.class_name,
                        %err,
                        "theme switch reverted in composition"
                    );
                    return SwitchOutcome::reverted(phases, started, err);
                }
            }
        }
        if let Some((token_id, err)) = snapshot
            .failures
            .iter()
            .find(|(id, _)| needed.contains(id.as_str()))
        {
            phases.push(SwitchPhase::Reverting);
            tracing::warn!(token_id, %err, "theme switch reverted in composition");
            return SwitchOutcome::reverted(phases, started, err.clone());
        }

        // Emitting
        phases.push(SwitchPhase::Emitting);
        let css = self.generate_css(&stack, request);

        // Last-switch-wins: a newer epoch supersedes this run before apply.
        if self.epoch.load(Ordering::Acquire) != my_epoch {
            tracing::debug!(epoch = my_epoch, "theme switch superseded, result discarded");
            return SwitchOutcome {
                applied: false,
                superseded: true,
                phases,
                duration: started.elapsed(),
                css: Some(css),
                error: None,
            };
        }

        // Applied: single atomic swap of the active stack reference, then
        // notify the persistence collaborator.
        phases.push(SwitchPhase::Applied);
        let theme_id = stack.top().map(|t| t.id.clone()).unwrap_or_default();
        self.set_active(Arc::new(stack));
        let event = ThemeChanged::now(theme_id);
        self.notify(&event);

        let duration = started.elapsed();
        if duration > SWITCH_BUDGET {
            tracing::warn!(
                ?duration,
                budget = ?SWITCH_BUDGET,
                "theme switch exceeded latency budget"
            );
        }
        tracing::debug!(theme = %event.theme, ?duration, "theme switch applied");

        SwitchOutcome {
            applied: true,
            superseded: false,
            phases,
            duration,
            css: Some(css),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tincture_core::{DesignToken, ThemeDefinition, TokenType};
    use tincture_resolve::TokenRegistry;

    fn engine() -> ThemeEngine {
        let mut registry = TokenRegistry::new();
        registry
            .register(DesignToken::new("color-primary", TokenType::Color, "#0066cc"))
            .unwrap();
        ThemeEngine::with_stack(
            registry,
            ThemeStack::new(vec![ThemeDefinition::new("base")]),
        )
    }

    fn dark_stack() -> ThemeStack {
        ThemeStack::new(vec![
            ThemeDefinition::new("base"),
            ThemeDefinition::new("dark").override_token(DesignToken::new(
                "color-primary",
                TokenType::Color,
                "#3399ff",
            )),
        ])
    }

    #[test]
    fn overtaken_switch_is_superseded_without_applying() {
        let engine = engine();
        let my_epoch = engine.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        // A newer switch claims the next epoch before this run applies.
        engine.epoch.fetch_add(1, Ordering::AcqRel);

        let outcome = engine.run_switch(my_epoch, dark_stack(), &CssRequest::default());
        assert!(outcome.superseded);
        assert!(!outcome.applied);
        assert!(outcome.error.is_none());
        // Emitting already ran, so the discarded CSS is still reported.
        assert!(outcome.css.is_some());
        assert!(!outcome.phases.contains(&SwitchPhase::Applied));
        assert_eq!(engine.active_stack().ids(), ["base"]);
    }

    #[test]
    fn current_epoch_switch_applies_normally() {
        let engine = engine();
        let my_epoch = engine.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        let outcome = engine.run_switch(my_epoch, dark_stack(), &CssRequest::default());
        assert!(outcome.applied);
        assert!(!outcome.superseded);
        assert_eq!(engine.active_stack().ids(), ["base", "dark"]);
    }
}
