//! Prompt builder for the two correction modes.
//!
//! [`PromptBuilder::build_chat`] returns the `(system_msg, user_msg)` pair
//! for any OpenAI-compatible `/v1/chat/completions` endpoint.  Both modes
//! instruct the model to reply with only the corrected text — the transport
//! carries plain text end to end, no structured diff.

use crate::config::CorrectionMode;

// ---------------------------------------------------------------------------
// System instructions
// ---------------------------------------------------------------------------

/// Basic — typos, grammar, capitalisation; meaning untouched.
const SYSTEM_INSTRUCTION_BASIC: &str = "\
You are a live typing-correction assistant.
Task: Fix the text the user just typed.

Rules:
1. Fix spelling mistakes, typos and obvious grammar errors.
2. Preserve the original meaning, tone and word order.
3. Preserve technical terms, proper nouns and code snippets exactly.
4. Reply with ONLY the corrected text — no explanation, no quotes.
5. If the text is already correct, return it unchanged.";

/// Fact-checking — everything Basic does, plus factual slips.
const SYSTEM_INSTRUCTION_FACT: &str = "\
You are a live typing-correction assistant with fact checking.
Task: Fix the text the user just typed.

Rules:
1. Fix spelling mistakes, typos and obvious grammar errors.
2. Correct clearly wrong factual statements (dates, names, figures) with
   the minimal possible edit.
3. Preserve the original meaning, tone and word order otherwise.
4. Reply with ONLY the corrected text — no explanation, no quotes.
5. If the text is already correct, return it unchanged.";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds chat-format correction prompts.
///
/// ```
/// use typefix::config::CorrectionMode;
/// use typefix::llm::PromptBuilder;
///
/// let (system, user) = PromptBuilder::new().build_chat("teh cat", CorrectionMode::Basic);
/// assert!(system.contains("typing-correction"));
/// assert!(user.contains("teh cat"));
/// ```
#[derive(Debug, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the `(system, user)` message pair for `mode`.
    pub fn build_chat(&self, text: &str, mode: CorrectionMode) -> (String, String) {
        let system = match mode {
            CorrectionMode::Basic => SYSTEM_INSTRUCTION_BASIC,
            CorrectionMode::FactChecking => SYSTEM_INSTRUCTION_FACT,
        };
        (system.to_string(), text.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_mode_has_no_fact_checking() {
        let (system, user) = PromptBuilder::new().build_chat("teh cat", CorrectionMode::Basic);
        assert!(!system.contains("fact"));
        assert_eq!(user, "teh cat");
    }

    #[test]
    fn fact_checking_mode_mentions_facts() {
        let (system, _) =
            PromptBuilder::new().build_chat("teh cat", CorrectionMode::FactChecking);
        assert!(system.contains("fact checking"));
    }

    #[test]
    fn user_message_is_verbatim() {
        let raw = "  spaced   and weird\ttext ";
        let (_, user) = PromptBuilder::new().build_chat(raw, CorrectionMode::Basic);
        assert_eq!(user, raw);
    }
}
