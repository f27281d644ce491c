//! Type coercion module
//!
//! Conforms a parsed batch to an entity's write types.
//!
//! Coercion is a two-state attempt policy ([`CoercionMode`]): a strict pass
//! over the whole batch, and on any failure a lenient pass over the whole
//! batch. The lenient pass keeps values it cannot convert, so a column may
//! leave this stage with mixed cell kinds; such columns are stored as text.

mod cast;

pub use cast::{cast_cell, coerce, coerce_column, coerce_with_mode, CoercionMode};
