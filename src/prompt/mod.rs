//! Prompt construction.
//!
//! Turns the user's choices into the single instruction string sent to the
//! completion API. Building a prompt never fails: labels outside the known
//! choices are embedded as free text.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::models::{EditRequest, GenerationRequest, Mode};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Build the prompt for a create or reply request.
pub fn build_generation_prompt(req: &GenerationRequest) -> String {
    let header = match req.mode {
        Mode::Create => "message",
        Mode::Reply => "reply",
    };

    let mut prompt = format!(
        "Generate a {} {} {} for {} named {} on {}. Write it in {}.",
        req.tone, req.length, header, req.recipient, req.receiver_name, req.platform, req.language
    );

    match req.mode {
        Mode::Create => {
            prompt.push_str(" The message should convey: ");
        }
        Mode::Reply => {
            prompt.push_str(" Reply to the following message: ");
        }
    }
    prompt.push_str(&req.body);
    prompt
}

/// Build the prompt for an edit round-trip.
pub fn build_edit_prompt(req: &EditRequest) -> String {
    format!(
        "Edit the following message according to this request: {}. Keep it in {}.\n\nOriginal message: {}",
        req.instruction, req.language, req.original
    )
}

/// The full argument tuple of one completion cycle.
///
/// Two keys compare equal exactly when they would build the same prompt, so
/// the key doubles as the cache identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PromptKey {
    Generate(GenerationRequest),
    Edit(EditRequest),
}

impl PromptKey {
    pub fn prompt(&self) -> String {
        match self {
            PromptKey::Generate(req) => build_generation_prompt(req),
            PromptKey::Edit(req) => build_edit_prompt(req),
        }
    }

    /// SHA256 digest of the canonical JSON form, hex encoded.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(self).unwrap_or_default());
        hex::encode(hasher.finalize())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PromptKey::Generate(req) => match req.mode {
                Mode::Create => "create",
                Mode::Reply => "reply",
            },
            PromptKey::Edit(_) => "edit",
        }
    }
}

impl From<GenerationRequest> for PromptKey {
    fn from(req: GenerationRequest) -> Self {
        PromptKey::Generate(req)
    }
}

impl From<EditRequest> for PromptKey {
    fn from(req: EditRequest) -> Self {
        PromptKey::Edit(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Language, Length, Platform, Recipient, Tone};
    use proptest::prelude::*;

    fn thank_alex() -> GenerationRequest {
        GenerationRequest {
            mode: Mode::Create,
            recipient: Recipient::Colleague,
            platform: Platform::Email,
            tone: Tone::Professional,
            length: Length::Short,
            receiver_name: "Alex".to_string(),
            body: "thank them for help".to_string(),
            language: Language::English,
        }
    }

    #[test]
    fn test_create_prompt_names_every_field() {
        let prompt = build_generation_prompt(&thank_alex());
        let needles = [
            "Professional",
            "Short",
            "Colleague",
            "Alex",
            "Email",
            "thank them for help",
            "English",
        ];
        for needle in needles {
            assert!(prompt.contains(needle), "prompt missing {needle:?}: {prompt}");
        }
        assert!(prompt.contains("message"));
    }

    #[test]
    fn test_reply_prompt_embeds_original() {
        let mut req = thank_alex();
        req.mode = Mode::Reply;
        req.body = "Can you review my PR?".to_string();
        req.language = Language::Japanese;

        let prompt = build_generation_prompt(&req);
        assert!(prompt.contains("reply"));
        assert!(prompt.contains("Japanese"));
        assert!(prompt.ends_with("Can you review my PR?"));
    }

    #[test]
    fn test_unknown_labels_become_free_text() {
        let mut req = thank_alex();
        req.tone = Tone::from("Pirate-themed");
        req.platform = Platform::from("Carrier Pigeon");

        let prompt = build_generation_prompt(&req);
        assert!(prompt.contains("Pirate-themed"));
        assert!(prompt.contains("Carrier Pigeon"));
    }

    #[test]
    fn test_edit_prompt_references_text_and_instruction() {
        let req = EditRequest {
            original: "Dear Alex, thank you so much for all your help.".to_string(),
            instruction: "make it shorter".to_string(),
            language: Language::English,
        };
        let prompt = build_edit_prompt(&req);
        assert!(prompt.contains("make it shorter"));
        assert!(prompt.contains("Dear Alex, thank you so much for all your help."));
    }

    #[test]
    fn test_edit_and_generate_keys_differ() {
        let generate = PromptKey::from(thank_alex());
        let edit = PromptKey::from(EditRequest {
            original: "thank them for help".to_string(),
            instruction: "make it shorter".to_string(),
            language: Language::English,
        });
        assert_ne!(generate.digest(), edit.digest());
        assert_eq!(generate.kind(), "create");
        assert_eq!(edit.kind(), "edit");
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = PromptKey::from(thank_alex()).digest();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    proptest! {
        #[test]
        fn prop_prompt_is_deterministic(
            name in ".*",
            body in ".*",
            tone in "[A-Za-z ]{0,16}",
            reply in any::<bool>(),
        ) {
            let req = GenerationRequest {
                mode: if reply { Mode::Reply } else { Mode::Create },
                recipient: Recipient::Friend,
                platform: Platform::Instagram,
                tone: Tone::from(tone.as_str()),
                length: Length::Medium,
                receiver_name: name,
                body,
                language: Language::English,
            };
            let key = PromptKey::from(req.clone());

            prop_assert_eq!(build_generation_prompt(&req), build_generation_prompt(&req));
            prop_assert_eq!(key.digest(), PromptKey::from(req).digest());
        }
    }
}
