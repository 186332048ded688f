//! Data models for the message intent and the OpenAI API.
//!
//! This module contains the type definitions for:
//! - The user's structured choices and free-text intent (`intent`)
//! - The upstream OpenAI chat completions API (`openai`)

// Author: kelexine (https://github.com/kelexine)

pub mod intent;
pub mod openai;

pub use intent::{EditRequest, GenerationRequest, Language, Length, Mode, Platform, Recipient, Tone};
pub use openai::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
