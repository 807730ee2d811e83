//! Token validation
//!
//! Checks run in a fixed order: DTCG shape (type + value tags present), naming
//! convention, type membership, then value shape against the token's type.
//! Strict mode rejects a token on any violation; lenient mode downgrades
//! naming and missing-type-tag violations to warnings while still rejecting
//! malformed values. Lenient ingestion exists for migration tooling that
//! predates the DTCG format.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::TokenError;
use crate::token::{DesignToken, TokenType, TokenValue};

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9-]*$").unwrap())
}

fn hex_color_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap()
    })
}

fn fn_color_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:rgb|rgba|hsl|hsla)\([^)]+\)$").unwrap())
}

fn dimension_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?[0-9]+(?:\.[0-9]+)?(?:px|rem|em|pt|vw|vh|%)$").unwrap())
}

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+(?:\.[0-9]+)?(?:ms|s)$").unwrap())
}

/// Validation outcome for a single token
#[derive(Clone, Debug, Default)]
pub struct TokenValidation {
    pub is_valid: bool,
    pub errors: Vec<TokenError>,
    pub warnings: Vec<String>,
}

/// Batch validation outcome for a whole token load
///
/// Load-time violations are collected here in one pass rather than aborting on
/// the first offender, so a report covers every bad token in the batch.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    pub checked: usize,
    /// Rejected tokens with the errors that rejected them
    pub rejected: Vec<(String, Vec<TokenError>)>,
    /// Per-token warnings that did not cause rejection
    pub warnings: Vec<(String, String)>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn accepted(&self) -> usize {
        self.checked - self.rejected.len()
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.checked += other.checked;
        self.rejected.extend(other.rejected);
        self.warnings.extend(other.warnings);
    }

    pub fn record(&mut self, token_id: &str, validation: TokenValidation) {
        self.checked += 1;
        for warning in validation.warnings {
            self.warnings.push((token_id.to_string(), warning));
        }
        if !validation.is_valid {
            self.rejected.push((token_id.to_string(), validation.errors));
        }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} checked, {} accepted, {} rejected, {} warnings",
            self.checked,
            self.accepted(),
            self.rejected.len(),
            self.warnings.len()
        )?;
        for (id, errors) in &self.rejected {
            for error in errors {
                writeln!(f, "  error[{id}]: {error}")?;
            }
        }
        for (id, warning) in &self.warnings {
            writeln!(f, "  warn[{id}]: {warning}")?;
        }
        Ok(())
    }
}

/// Token validator with strict and lenient modes
#[derive(Clone, Copy, Debug)]
pub struct Validator {
    strict: bool,
}

impl Validator {
    /// Reject on any violation ("reject all non-compliant tokens" policy)
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Downgrade naming violations to warnings; malformed values still reject
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Validate a single token
    pub fn validate_token(&self, token: &DesignToken) -> TokenValidation {
        let mut out = TokenValidation {
            is_valid: true,
            ..Default::default()
        };

        if !name_re().is_match(&token.name) {
            let violation = TokenError::NamingViolation {
                name: token.name.clone(),
            };
            if self.strict {
                out.errors.push(violation);
            } else {
                out.warnings.push(violation.to_string());
            }
        }

        if let TokenValue::Literal(literal) = &token.value {
            if let Some(reason) = value_shape_error(token.token_type, literal) {
                // Malformed values reject in both modes
                out.errors.push(TokenError::InvalidFormat {
                    id: token.id.clone(),
                    reason,
                });
            }
        } else if let Some(target) = token.value.alias_target() {
            if !name_re().is_match(target) {
                out.errors.push(TokenError::InvalidFormat {
                    id: token.id.clone(),
                    reason: format!("alias target `{target}` is not a valid token id"),
                });
            }
        }

        out.is_valid = out.errors.is_empty();
        out
    }

    /// Validate a batch into one report, never aborting mid-pass
    pub fn validate_all<'a, I>(&self, tokens: I) -> ValidationReport
    where
        I: IntoIterator<Item = &'a DesignToken>,
    {
        let mut report = ValidationReport::default();
        for token in tokens {
            report.record(&token.id, self.validate_token(token));
        }
        tracing::debug!(
            checked = report.checked,
            rejected = report.rejected.len(),
            strict = self.strict,
            "token validation pass finished"
        );
        report
    }
}

/// Check a literal value against its declared type's grammar
fn value_shape_error(token_type: TokenType, value: &str) -> Option<String> {
    let ok = match token_type {
        TokenType::Color => hex_color_re().is_match(value) || fn_color_re().is_match(value),
        TokenType::Dimension => value == "0" || dimension_re().is_match(value),
        TokenType::Duration => duration_re().is_match(value),
        TokenType::Number => value.parse::<f64>().is_ok(),
        TokenType::FontWeight => {
            matches!(value, "normal" | "bold" | "lighter" | "bolder")
                || value
                    .parse::<u32>()
                    .map(|w| (100..=900).contains(&w) && w % 100 == 0)
                    .unwrap_or(false)
        }
        // Composite types carry free-form CSS shorthand; require non-empty only
        TokenType::FontFamily
        | TokenType::Border
        | TokenType::Shadow
        | TokenType::Gradient
        | TokenType::Typography
        | TokenType::CubicBezier => !value.trim().is_empty(),
    };
    if ok {
        None
    } else {
        Some(format!(
            "`{value}` is not a valid {token_type} value"
        ))
    }
}
