//! Filter processor: a single-stage message filter.
//!
//! This crate decides, message by message, whether a message flowing through
//! a pipeline is retained or discarded. The decision comes from a boolean
//! expression over the message payload and headers, compiled once when the
//! filter is configured.
//!
//! # Architecture
//!
//! The filter follows hexagonal architecture principles:
//!
//! - **Domain**: Messages, payloads, headers and verdicts
//! - **Ports**: The [`filter::ports::predicate::Predicate`] trait
//! - **Adapters**: The expression dialect and closure-backed predicates
//! - **Services**: Payload normalization and the filter workflow
//!
//! # Modules
//!
//! - [`filter`]: Configuration, evaluation and the filter service

pub mod filter;
