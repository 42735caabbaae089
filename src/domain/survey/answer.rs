//! Respondent prompts and answer reconciliation.
//!
//! Pure helpers behind the answering step: building the chat prompt for a
//! question record, and coercing the model's reply onto the record's option
//! set.

use super::question::QuestionRecord;

/// System message framing the model as a survey respondent.
pub const RESPONDENT_SYSTEM_PROMPT: &str =
    "You are a helpful survey respondent who provides honest and thoughtful answers.";

/// Answer substituted for free-text questions when the provider fails.
pub const FREE_TEXT_FALLBACK: &str = "Error occurred while processing the question";

/// Token budget for a reply picking one option.
pub const CHOICE_MAX_TOKENS: u32 = 150;

/// Token budget for a free-text reply.
pub const FREE_TEXT_MAX_TOKENS: u32 = 300;

/// Prompt for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespondentPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

impl RespondentPrompt {
    pub fn for_question(record: &QuestionRecord) -> Self {
        let label = record.label().unwrap_or_default();
        let choices = record
            .offers_choices()
            .then(|| record.options().unwrap_or_default().join(", "));

        let (user, max_tokens) = match choices {
            Some(options_text) => (
                format!(
                    "You are a helpful survey respondent. Please answer the following question.\n\n\
                     Question: {}\n\n\
                     Available options: {}\n\n\
                     Please respond with ONLY one of the available options listed above. \
                     Do not include any additional text, explanations, or formatting. \
                     Just provide the exact text of your chosen option.",
                    label, options_text
                ),
                CHOICE_MAX_TOKENS,
            ),
            None => (
                format!(
                    "You are a helpful survey respondent. Please answer the following question.\n\n\
                     Question: {}\n\n\
                     Please provide a clear response to this question. \
                     Be concise but thorough in your answer.",
                    label
                ),
                FREE_TEXT_MAX_TOKENS,
            ),
        };

        Self {
            system: RESPONDENT_SYSTEM_PROMPT.to_string(),
            user,
            max_tokens,
        }
    }
}

/// Coerces a raw model reply into an acceptable answer.
///
/// Free-text questions accept the trimmed reply as is. For questions with
/// choices: an exact option match wins, then a case-insensitive match (which
/// returns the option's own spelling), then the first option.
pub fn reconcile_answer(record: &QuestionRecord, reply: &str) -> String {
    let answer = reply.trim();
    if !record.offers_choices() {
        return answer.to_string();
    }

    let options = record.options().unwrap_or_default();
    if let Some(exact) = options.iter().find(|o| o.as_str() == answer) {
        return exact.clone();
    }

    let lowered = answer.to_lowercase();
    options
        .iter()
        .find(|o| o.to_lowercase() == lowered)
        .or_else(|| options.first())
        .cloned()
        .unwrap_or_else(|| answer.to_string())
}

/// Answer recorded when the provider could not answer at all.
pub fn fallback_answer(record: &QuestionRecord) -> String {
    if record.offers_choices() {
        if let Some(first) = record.options().and_then(|o| o.first()) {
            return first.clone();
        }
    }
    FREE_TEXT_FALLBACK.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(options: &[&str]) -> QuestionRecord {
        QuestionRecord::new(
            "q1",
            Some("mc".to_string()),
            Some("Favourite color?".to_string()),
            Some(options.iter().map(|s| s.to_string()).collect()),
        )
    }

    fn free_text() -> QuestionRecord {
        QuestionRecord::new("why", Some("text".to_string()), Some("Why?".to_string()), None)
    }

    #[test]
    fn choice_prompt_lists_options() {
        let prompt = RespondentPrompt::for_question(&choice(&["Red", "Blue"]));
        assert!(prompt.user.contains("Question: Favourite color?"));
        assert!(prompt.user.contains("Available options: Red, Blue"));
        assert_eq!(prompt.max_tokens, 150);
        assert_eq!(prompt.system, RESPONDENT_SYSTEM_PROMPT);
    }

    #[test]
    fn free_text_prompt_has_larger_budget() {
        let prompt = RespondentPrompt::for_question(&free_text());
        assert!(!prompt.user.contains("Available options"));
        assert!(prompt.user.contains("Be concise but thorough"));
        assert_eq!(prompt.max_tokens, 300);
    }

    #[test]
    fn options_on_free_text_types_are_not_offered() {
        let record = QuestionRecord::new(
            "n",
            Some("number".to_string()),
            Some("How many?".to_string()),
            Some(vec!["1".to_string()]),
        );
        let prompt = RespondentPrompt::for_question(&record);
        assert_eq!(prompt.max_tokens, 300);
    }

    #[test]
    fn exact_match_is_kept() {
        assert_eq!(reconcile_answer(&choice(&["Red", "Blue"]), "  Blue\n"), "Blue");
    }

    #[test]
    fn case_insensitive_match_returns_canonical_option() {
        assert_eq!(reconcile_answer(&choice(&["Red", "Blue"]), "bLUE"), "Blue");
    }

    #[test]
    fn unmatched_reply_falls_back_to_first_option() {
        assert_eq!(
            reconcile_answer(&choice(&["Red", "Blue"]), "I like green"),
            "Red"
        );
    }

    #[test]
    fn free_text_reply_is_trimmed() {
        assert_eq!(reconcile_answer(&free_text(), "  Because.  "), "Because.");
    }

    #[test]
    fn fallback_for_choices_is_first_option() {
        assert_eq!(fallback_answer(&choice(&["Red", "Blue"])), "Red");
    }

    #[test]
    fn fallback_for_free_text_is_error_message() {
        assert_eq!(fallback_answer(&free_text()), FREE_TEXT_FALLBACK);
    }
}
