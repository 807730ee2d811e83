//! CSS size budgets
//!
//! Fixed byte budgets per emitted category. Overflow is a policy signal for
//! the caller (truncate, warn, or block a release), never a hard failure:
//! the report carries `BudgetExceeded` entries alongside the CSS itself.

use serde::Serialize;

use tincture_core::TokenError;

/// Custom-property declarations for the token set
pub const TOKENS_BUDGET: usize = 8 * 1024;
/// Semantic component class rules
pub const COMPONENTS_BUDGET: usize = 10 * 1024;
/// Utility class rules
pub const UTILITIES_BUDGET: usize = 2 * 1024;
/// Whole stylesheet
pub const TOTAL_BUDGET: usize = 20 * 1024;
/// Compressed-size target, measured by build tooling rather than the engine
pub const GZIP_TARGET: usize = 5 * 1024;

/// Emitted CSS categories tracked against separate budgets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CssCategory {
    Tokens,
    Components,
    Utilities,
}

impl CssCategory {
    pub fn budget(&self) -> usize {
        match self {
            CssCategory::Tokens => TOKENS_BUDGET,
            CssCategory::Components => COMPONENTS_BUDGET,
            CssCategory::Utilities => UTILITIES_BUDGET,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CssCategory::Tokens => "tokens",
            CssCategory::Components => "components",
            CssCategory::Utilities => "utilities",
        }
    }
}

impl std::fmt::Display for CssCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Byte accounting for one emission run
#[derive(Clone, Debug, Default, Serialize)]
pub struct SizeReport {
    pub tokens_bytes: usize,
    pub components_bytes: usize,
    pub utilities_bytes: usize,
    pub total_bytes: usize,
    /// Compressed-size target echoed for downstream tooling
    pub gzip_target_bytes: usize,
    /// One entry per overflowing category (plus total)
    pub over_budget: Vec<TokenError>,
}

impl SizeReport {
    pub fn new(tokens_bytes: usize, components_bytes: usize, utilities_bytes: usize) -> Self {
        let total_bytes = tokens_bytes + components_bytes + utilities_bytes;
        let mut over_budget = Vec::new();

        for (category, actual) in [
            (CssCategory::Tokens, tokens_bytes),
            (CssCategory::Components, components_bytes),
            (CssCategory::Utilities, utilities_bytes),
        ] {
            if actual > category.budget() {
                over_budget.push(TokenError::BudgetExceeded {
                    category: category.label().to_string(),
                    actual,
                    limit: category.budget(),
                });
            }
        }
        if total_bytes > TOTAL_BUDGET {
            over_budget.push(TokenError::BudgetExceeded {
                category: "total".to_string(),
                actual: total_bytes,
                limit: TOTAL_BUDGET,
            });
        }

        Self {
            tokens_bytes,
            components_bytes,
            utilities_bytes,
            total_bytes,
            gzip_target_bytes: GZIP_TARGET,
            over_budget,
        }
    }

    pub fn within_budget(&self) -> bool {
        self.over_budget.is_empty()
    }
}
