//! CSS emission for Tincture
//!
//! Serializes resolved token snapshots into:
//!
//! - theme-scoped custom-property blocks (`[data-theme="dark"] { --x: ...; }`)
//! - semantic component class rules
//! - utility class rules
//!
//! while tracking running byte size per category against fixed budgets
//! (tokens 8KB, components 10KB, utilities 2KB, total 20KB). Overflow is
//! reported in the [`SizeReport`], never thrown.

pub mod budget;
pub mod emit;

pub use budget::{
    CssCategory, SizeReport, COMPONENTS_BUDGET, GZIP_TARGET, TOKENS_BUDGET, TOTAL_BUDGET,
    UTILITIES_BUDGET,
};
pub use emit::{ClassDef, CssEmitter, CssOutput, CssProperty, CssRequest};
