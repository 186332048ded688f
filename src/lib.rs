// mailslayer - Compose and edit messages with an LLM
// Author: kelexine (https://github.com/kelexine)

pub mod cache;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod openai;
pub mod prompt;
pub mod server;
pub mod session;
pub mod utils;
