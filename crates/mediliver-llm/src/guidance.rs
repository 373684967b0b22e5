//! Fixed messages shown in place of a model answer.

/// Shown when the guidance call fails.
pub const FALLBACK_MESSAGE: &str = "I'm sorry, I encountered an error. Could you please try again?";

/// Shown when the model answers with nothing.
pub const EMPTY_ANSWER_MESSAGE: &str =
    "I'm sorry, I didn't quite catch that. Could you please repeat your question?";

/// Shown when a prescription photo could not be read.
pub const SCAN_RETRY_MESSAGE: &str =
    "Failed to read prescription. Please try again or take a clearer photo.";

/// The answer to show for a model reply.
pub fn finalize_answer(answer: &str) -> String {
    let answer = answer.trim();
    if answer.is_empty() {
        EMPTY_ANSWER_MESSAGE.to_string()
    } else {
        answer.to_string()
    }
}
