//! Port definitions for the filter stage.
//!
//! Ports are abstract trait interfaces; adapters provide the concrete
//! predicate implementations.

pub mod predicate;
