// CLI module for mailslayer
// Author: kelexine (https://github.com/kelexine)

use crate::models::{
    EditRequest, GenerationRequest, Language, Length, Mode, Platform, Recipient, Tone,
};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// mailslayer - compose and edit messages with an LLM
#[derive(Parser, Debug)]
#[command(name = "mailslayer", version, about, long_about = None)]
pub struct Args {
    /// Config file to read instead of ~/.mailslayer/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP shell (default)
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Write a new message
    Create {
        #[command(flatten)]
        auth: AuthArgs,
        #[command(flatten)]
        style: StyleArgs,
        /// What you want to say
        #[arg(long)]
        intent: String,
    },
    /// Reply to a message you received
    Reply {
        #[command(flatten)]
        auth: AuthArgs,
        #[command(flatten)]
        style: StyleArgs,
        /// The message you are replying to
        #[arg(long)]
        original: String,
    },
    /// Edit a message with a free-text request such as "make it shorter"
    Edit {
        #[command(flatten)]
        auth: AuthArgs,
        /// The message to edit
        #[arg(long)]
        original: String,
        /// How to change it
        #[arg(long)]
        instruction: String,
        #[arg(long, value_enum, default_value_t = LanguageArg::English)]
        language: LanguageArg,
    },
    /// Verify the API key against the configured endpoint
    Check {
        #[command(flatten)]
        auth: AuthArgs,
    },
}

#[derive(ClapArgs, Debug)]
pub struct AuthArgs {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct StyleArgs {
    /// Colleague, Manager, Friend, Family (anything else is used as written)
    #[arg(long, default_value = "Colleague")]
    pub recipient: String,
    /// Email, LinkedIn, Instagram, WhatsApp (anything else is used as written)
    #[arg(long, default_value = "Email")]
    pub platform: String,
    /// Professional, Neutral, Casual (anything else is used as written)
    #[arg(long, default_value = "Professional")]
    pub tone: String,
    /// "Very Short", Short, Medium, "Detailed (Long)"
    #[arg(long, default_value = "Short")]
    pub length: String,
    /// Receiver's name
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, value_enum, default_value_t = LanguageArg::English)]
    pub language: LanguageArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageArg {
    #[value(alias = "en")]
    English,
    #[value(alias = "ja")]
    Japanese,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::English => Language::English,
            LanguageArg::Japanese => Language::Japanese,
        }
    }
}

impl StyleArgs {
    pub fn into_request(self, mode: Mode, body: String) -> GenerationRequest {
        GenerationRequest {
            mode,
            recipient: Recipient::from(self.recipient),
            platform: Platform::from(self.platform),
            tone: Tone::from(self.tone),
            length: Length::from(self.length),
            receiver_name: self.name,
            body,
            language: self.language.into(),
        }
    }
}

/// Build the edit request for the `edit` subcommand.
pub fn edit_request(original: String, instruction: String, language: LanguageArg) -> EditRequest {
    EditRequest {
        original,
        instruction,
        language: language.into(),
    }
}
