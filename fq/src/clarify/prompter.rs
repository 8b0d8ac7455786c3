//! Prompter trait and scripted test double
//!
//! The prompter abstracts the blocking human interaction the resolution
//! loop depends on, so the same loop can run against a console, a web
//! channel, or a scripted test double.

use eyre::Result;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Blocking human-interaction capability
///
/// Methods block until an answer is available. In the networked variant
/// they block the background task that owns the workflow, not the process.
pub trait Prompter: Send + Sync {
    /// Display a message without collecting an answer
    fn show(&self, message: &str);

    /// Collect one free-text line
    fn ask_text(&self, prompt: &str) -> Result<String>;

    /// Collect a yes/no answer; anything other than y/yes is no
    fn ask_yes_no(&self, prompt: &str) -> Result<bool>;

    /// Block until the human signals an out-of-band action is complete
    fn wait_for_ready(&self, prompt: &str) -> Result<()>;
}

/// Prompter that plays back scripted answers (for tests)
///
/// `ask_text` and `ask_yes_no` consume the same answer queue in order.
/// Everything shown is recorded for assertions.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    shown: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a prompter preloaded with answers
    pub fn with_answers(answers: &[&str]) -> Self {
        let prompter = Self::new();
        for a in answers {
            prompter.push_answer(a);
        }
        prompter
    }

    /// Queue one answer
    pub fn push_answer(&self, answer: &str) {
        self.answers.lock().unwrap().push_back(answer.to_string());
    }

    /// All messages shown or asked so far, in order
    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().unwrap().clone()
    }

    fn next_answer(&self, prompt: &str) -> Result<String> {
        self.shown.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| eyre::eyre!("No scripted answer left for prompt: {prompt}"))
    }
}

impl Prompter for ScriptedPrompter {
    fn show(&self, message: &str) {
        self.shown.lock().unwrap().push(message.to_string());
    }

    fn ask_text(&self, prompt: &str) -> Result<String> {
        self.next_answer(prompt)
    }

    fn ask_yes_no(&self, prompt: &str) -> Result<bool> {
        let answer = self.next_answer(prompt)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    fn wait_for_ready(&self, prompt: &str) -> Result<()> {
        self.shown.lock().unwrap().push(prompt.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_answers_in_order() {
        let prompter = ScriptedPrompter::with_answers(&["first", "yes", "no"]);
        assert_eq!(prompter.ask_text("a?").unwrap(), "first");
        assert!(prompter.ask_yes_no("b?").unwrap());
        assert!(!prompter.ask_yes_no("c?").unwrap());
    }

    #[test]
    fn test_exhausted_script_errors() {
        let prompter = ScriptedPrompter::new();
        assert!(prompter.ask_text("anything?").is_err());
    }

    #[test]
    fn test_shown_records_messages() {
        let prompter = ScriptedPrompter::with_answers(&["x"]);
        prompter.show("hello");
        let _ = prompter.ask_text("question?");
        assert_eq!(prompter.shown(), vec!["hello".to_string(), "question?".to_string()]);
    }
}
