//! Token resolution pipeline
//!
//! Everything between a token id and its terminal literal value:
//!
//! - [`TokenRegistry`]: scope-keyed authoritative store of base definitions,
//!   with a monotonic version counter for cache invalidation
//! - [`compose`]: theme-stack composition (highest declared priority wins,
//!   later-in-stack breaks ties)
//! - [`ScopedResolver`]: scope-chain walk + alias-chain resolution with
//!   id-based cycle detection and a bounded depth
//! - [`ResolutionCache`]: explicit memo map keyed by
//!   `(token id, stack signature, scope, registry version)` with pattern
//!   invalidation
//!
//! All of it is pure, synchronous computation over in-memory structures; reads
//! never block each other and cache writes are idempotent.

pub mod cache;
pub mod compose;
pub mod registry;
pub mod resolver;

pub use cache::{CacheKey, CacheStats, ResolutionCache};
pub use compose::{compose, composition_ids, Candidate, Composition};
pub use registry::TokenRegistry;
pub use resolver::{resolve_cached, ScopedResolver, MAX_REFERENCE_DEPTH};
