//! Step definitions for message filtering BDD scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
