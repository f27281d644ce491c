//! Entity parser module
//!
//! Applies per-entity parsing rules to a raw batch: an optional pre-flatten
//! transform, flattening of every declared JSON column, and provenance
//! stamping.
//!
//! Pre-flatten transforms are strategies keyed by entity name. The registry's
//! `pre_flatten` entries register them; [`EntityParser::with_strategy`]
//! overrides them. Entities without a strategy use [`Identity`].

mod parser;
mod strategy;

pub use parser::EntityParser;
pub use strategy::{strategy_for, Identity, PreFlattenTransform, SplitJsonColumn};
