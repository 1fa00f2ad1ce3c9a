//! Domain types for the filter stage.
//!
//! This module contains pure domain types with no infrastructure dependencies.
//! Messages are immutable after construction; every transformation produces a
//! new value.

mod charset;
mod content_type;
mod header;
mod message;
mod payload;
mod verdict;

pub use charset::TextCharset;
pub use content_type::{CONTENT_TYPE_HEADER, ContentType, DEFAULT_CONTENT_TYPE, TEXT_MARKERS};
pub use header::{HeaderValue, Headers};
pub use message::{Message, MessageBuilder};
pub use payload::Payload;
pub use verdict::Verdict;
