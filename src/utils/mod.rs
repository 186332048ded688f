//! Utility functions and helpers for mailslayer.
//!
//! This module provides cross-cutting concerns like structured logging,
//! key sanitization, and the retry and timeout policies wrapped around
//! every completion call.
//!
//! # Submodules
//!
//! - `logging`: Tracing and logging initialization with secret redaction.
//! - `retry`: Bounded retry with a fixed delay between attempts.
//! - `timeout`: Advisory wall-clock deadline on a worker task.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
pub mod retry;
pub mod timeout;
