//! The message filter stage.
//!
//! A filter decides, for each message, whether it continues downstream.
//! Binary payloads with a text-like content type are first decoded to text;
//! a boolean predicate compiled at start-up then reads the payload and
//! headers. Retained messages are forwarded exactly as received. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - The predicate port in [`ports`]
//! - Predicate implementations in [`adapters`]
//! - The normalize-and-evaluate workflow in [`services`]
//!
//! # Examples
//!
//! ```
//! use filter_processor::filter::config::FilterConfig;
//! use filter_processor::filter::domain::Message;
//! use filter_processor::filter::services::MessageFilter;
//!
//! let filter = MessageFilter::from_config(&FilterConfig::new(
//!     "#jsonPath(payload, '$.foo') == 'bar'",
//! ))
//! .expect("valid expression");
//!
//! let message = Message::builder(br#"{"foo":"bar"}"#.to_vec())
//!     .with_content_type("application/json")
//!     .build();
//! let forwarded = filter.filter(message.clone()).expect("evaluation succeeds");
//! assert_eq!(forwarded, Some(message));
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
