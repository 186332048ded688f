//! User-facing intent fields collected by the presentation shell.
//!
//! Recipient, platform, tone and length are closed choices in the form but
//! open at this layer: any label outside the known set is kept verbatim in an
//! `Other` variant so the prompt builder can still use it as free text.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares an enumeration with canonical display labels, case-insensitive
/// parsing and an `Other(String)` fallback. Serialized as its label.
macro_rules! open_choice {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => [$label:literal $(, $alias:literal)*]),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// A label outside the known set, used verbatim.
            Other(String),
        }

        impl $name {
            /// Every known choice, in form order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Other(raw) => raw,
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                let normalized = raw.trim().to_lowercase();
                $(
                    if normalized == $label.to_lowercase()
                        $(|| normalized == $alias)*
                    {
                        return $name::$variant;
                    }
                )+
                $name::Other(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                $name::from(raw.as_str())
            }
        }

        impl From<$name> for String {
            fn from(choice: $name) -> Self {
                choice.label().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

open_choice! {
    /// Who the message is addressed to.
    Recipient {
        Colleague => ["Colleague"],
        Manager => ["Manager"],
        Friend => ["Friend"],
        Family => ["Family"],
    }
}

open_choice! {
    /// Where the message will be sent.
    Platform {
        Email => ["Email", "e-mail", "mail"],
        LinkedIn => ["LinkedIn"],
        Instagram => ["Instagram"],
        WhatsApp => ["WhatsApp"],
    }
}

open_choice! {
    Tone {
        Professional => ["Professional"],
        Neutral => ["Neutral"],
        Casual => ["Casual"],
    }
}

open_choice! {
    Length {
        VeryShort => ["Very Short", "very-short", "very_short", "veryshort"],
        Short => ["Short"],
        Medium => ["Medium"],
        Detailed => ["Detailed (Long)", "detailed", "long"],
    }
}

/// Output language toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "en", alias = "English")]
    English,
    #[serde(alias = "ja", alias = "jp", alias = "Japanese")]
    Japanese,
}

impl Language {
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Japanese => "Japanese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a new message is composed or an existing one answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Create,
    Reply,
}

/// Everything needed to build a create or reply prompt.
///
/// `body` is the free-text intent in [`Mode::Create`] and the original
/// message being answered in [`Mode::Reply`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub mode: Mode,
    pub recipient: Recipient,
    pub platform: Platform,
    pub tone: Tone,
    pub length: Length,
    pub receiver_name: String,
    pub body: String,
    #[serde(default)]
    pub language: Language,
}

/// An edit round-trip over previously generated text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditRequest {
    pub original: String,
    pub instruction: String,
    #[serde(default)]
    pub language: Language,
}
