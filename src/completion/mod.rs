//! The resilient call layer.
//!
//! A [`CompletionService`] wraps one shared [`CompletionBackend`] with a
//! session-scoped response cache, a fixed-delay retry policy and an optional
//! wall-clock deadline for whole cycles.
//!
//! [`CompletionBackend`]: crate::openai::CompletionBackend
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod service;

pub use service::CompletionService;
