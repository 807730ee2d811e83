use serde::Serialize;
use thiserror::Error;

/// Errors produced by the token engine
///
/// Resolution-time errors (`TokenNotFound`, `CircularReference`, `ScopeNotFound`)
/// are localized to the failing token; batch loading collects `DuplicateId` and
/// `InvalidFormat` into a [`crate::ValidationReport`] instead of failing fast.
/// `BudgetExceeded` is always reported, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TokenError {
    /// No definition for the id in any theme, scope level, or the base registry
    #[error("token not found: `{id}`")]
    TokenNotFound { id: String },

    /// An alias chain came back to a token already on the recursion stack.
    /// The chain contains every node in the cycle exactly once, in traversal order.
    #[error("circular reference: {}", chain.join(" -> "))]
    CircularReference { chain: Vec<String> },

    /// An alias chain exceeded the depth bound without repeating a node
    #[error("reference chain starting at `{id}` exceeded max depth {max}")]
    ReferenceDepthExceeded { id: String, max: usize },

    /// DTCG shape or value-grammar violation
    #[error("invalid format for `{id}`: {reason}")]
    InvalidFormat { id: String, reason: String },

    /// Token name does not match `^[a-z][a-z0-9-]*$`
    #[error("naming violation: `{name}` is not kebab-case")]
    NamingViolation { name: String },

    /// Every level of the scope search chain was exhausted
    #[error("`{id}` not found in any scope level (searched: {})", searched.join(", "))]
    ScopeNotFound { id: String, searched: Vec<String> },

    /// A CSS category would overflow its byte budget (reported, never thrown)
    #[error("css `{category}` section over budget: {actual} > {limit} bytes")]
    BudgetExceeded {
        category: String,
        actual: usize,
        limit: usize,
    },

    /// Two tokens share an id within the same scope
    #[error("duplicate token id `{id}` in scope `{scope}`")]
    DuplicateId { id: String, scope: String },
}

pub type TokenResult<T> = Result<T, TokenError>;
