//! Event stream client library
//!
//! Provides a reconnecting server-push stream client with named-event
//! dispatch, exponential backoff and jitter, and an explicit close handle.

mod backoff;
mod client;
mod parser;
mod types;

pub use backoff::Backoff;
pub use client::{StreamClient, StreamHandle};
pub use parser::SseParser;
pub use types::{ErrorHandler, EventHandler, OpenHandler, StreamConfig, StreamError, StreamEvent};
