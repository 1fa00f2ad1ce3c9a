//! Unit tests for the filter module.
//!
//! Tests are organised by layer, covering happy paths, error cases, and
//! edge cases for all public APIs.

mod config_tests;
mod json_path_tests;
mod service_tests;
