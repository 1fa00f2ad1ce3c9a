//! Adapter implementations of the predicate port.

pub mod expression;
pub mod function;
