//! Application services for the filter stage.
//!
//! Services compose the domain types and the predicate port into the
//! normalize-then-evaluate workflow the transport calls per message.

mod filter;
mod normalizer;

pub use filter::MessageFilter;
pub use normalizer::PayloadNormalizer;
