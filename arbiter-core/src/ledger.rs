//! # Oracle Ledger
//!
//! Durable mapping from question keys to [`Question`] records and from answer
//! keys to [`Answer`] records. The ledger owns record lifetimes: questions
//! and their answers are created by `ask`/`answer` and destroyed together,
//! atomically, by resolution.
//!
//! Record absence is expressed by map absence. The original design used a
//! zero-valued key as an absence sentinel, which collides with a legitimate
//! all-zero hash; an explicit presence check avoids that ambiguity.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A posed question, keyed by the hash of its initial computation state
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Question {
    /// Creation timestamp (Unix seconds)
    pub ask_time: u64,

    /// Answer-window duration in seconds, strictly positive
    pub timeout: u64,

    /// Identity of the asker
    pub asker: String,

    /// Answer keys submitted against this question, in submission order
    pub answer_keys: Vec<String>,

    /// Handler id invoked with the accepted image on success resolution
    pub success_handler: String,

    /// Handler id invoked on failure resolution
    pub fail_handler: String,
}

impl Question {
    /// Whether new answers are still accepted.
    ///
    /// Submission closes after the first third of the timeout window,
    /// leaving the remaining two thirds for falsification review.
    pub fn answer_window_open(&self, now: u64) -> bool {
        now < self.ask_time.saturating_add(self.timeout / 3)
    }

    /// When success resolution becomes legal. Saturating, so oversized
    /// timeouts pin the deadline at the end of time instead of wrapping.
    pub fn resolvable_at(&self) -> u64 {
        self.ask_time.saturating_add(self.timeout)
    }

    /// When failure resolution becomes legal
    pub fn failable_at(&self) -> u64 {
        self.ask_time.saturating_add(self.timeout.saturating_mul(2))
    }

    /// Whether the full answer window has elapsed, making success
    /// resolution legal
    pub fn resolvable(&self, now: u64) -> bool {
        now >= self.resolvable_at()
    }

    /// Whether the extended grace window has elapsed, making failure
    /// resolution legal. Never earlier than [`Self::resolvable`].
    pub fn failable(&self, now: u64) -> bool {
        now >= self.failable_at()
    }
}

/// A candidate answer, keyed by the hash of the claimed final-state image
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    /// Identity of the submitter, entitled to the stake refund
    pub answerer: String,

    /// Set by the court, one-way
    pub falsified: bool,

    /// Key of the owning question
    pub question_key: String,
}

/// In-memory question/answer store with atomic cleanup
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct OracleLedger {
    questions: HashMap<String, Question>,
    answers: HashMap<String, Answer>,
}

impl OracleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a question by key
    pub fn question(&self, key: &str) -> Option<&Question> {
        self.questions.get(key)
    }

    /// Look up an answer by key
    pub fn answer(&self, key: &str) -> Option<&Answer> {
        self.answers.get(key)
    }

    pub fn question_exists(&self, key: &str) -> bool {
        self.questions.contains_key(key)
    }

    /// Answer keys are globally unique, not scoped to one question
    pub fn answer_exists(&self, key: &str) -> bool {
        self.answers.contains_key(key)
    }

    /// Number of open questions
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Number of live answers across all questions
    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    /// All open question keys, unordered
    pub fn question_keys(&self) -> impl Iterator<Item = &String> {
        self.questions.keys()
    }

    /// Insert a freshly created question
    pub(crate) fn insert_question(&mut self, key: String, question: Question) {
        self.questions.insert(key, question);
    }

    /// Record a new answer under its question
    pub(crate) fn insert_answer(&mut self, question_key: &str, answer_key: String, answer: Answer) {
        if let Some(question) = self.questions.get_mut(question_key) {
            question.answer_keys.push(answer_key.clone());
        }
        self.answers.insert(answer_key, answer);
    }

    /// Mark an answer falsified. Returns the updated record.
    pub(crate) fn falsify_answer(&mut self, key: &str) -> Option<&Answer> {
        let answer = self.answers.get_mut(key)?;
        answer.falsified = true;
        Some(answer)
    }

    /// Delete a question together with every answer it owns.
    ///
    /// Returns the removed question, or `None` if the key was absent. No
    /// answer outlives its question.
    pub(crate) fn remove_question(&mut self, key: &str) -> Option<Question> {
        let question = self.questions.remove(key)?;
        for answer_key in &question.answer_keys {
            self.answers.remove(answer_key);
        }
        Some(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_question(ask_time: u64, timeout: u64) -> Question {
        Question {
            ask_time,
            timeout,
            asker: "alice".to_string(),
            answer_keys: Vec::new(),
            success_handler: "on_success".to_string(),
            fail_handler: "on_fail".to_string(),
        }
    }

    #[test]
    fn test_answer_window_boundaries() {
        let question = open_question(0, 100);
        // First third of the window: open up to but excluding t = 33
        assert!(question.answer_window_open(0));
        assert!(question.answer_window_open(32));
        assert!(!question.answer_window_open(33));
        assert!(!question.answer_window_open(100));
    }

    #[test]
    fn test_resolution_windows() {
        let question = open_question(50, 100);
        assert!(!question.resolvable(149));
        assert!(question.resolvable(150));
        assert!(!question.failable(249));
        assert!(question.failable(250));
        // Failure is never legal before success would have been
        for now in 0..300 {
            if question.failable(now) {
                assert!(question.resolvable(now));
            }
        }
    }

    #[test]
    fn test_windows_saturate_on_oversized_timeout() {
        let question = open_question(100, u64::MAX);
        assert!(question.answer_window_open(200));
        assert_eq!(question.resolvable_at(), u64::MAX);
        assert_eq!(question.failable_at(), u64::MAX);
        assert!(!question.resolvable(200));
        assert!(!question.failable(200));
    }

    #[test]
    fn test_remove_question_deletes_answers() {
        let mut ledger = OracleLedger::new();
        let mut question = open_question(0, 100);
        question.answer_keys = vec!["a1".to_string(), "a2".to_string()];
        ledger.insert_question("q1".to_string(), question);
        for key in ["a1", "a2"] {
            ledger.answers.insert(
                key.to_string(),
                Answer {
                    answerer: "bob".to_string(),
                    falsified: false,
                    question_key: "q1".to_string(),
                },
            );
        }

        assert_eq!(ledger.answer_count(), 2);
        let removed = ledger.remove_question("q1");
        assert!(removed.is_some());
        assert_eq!(ledger.question_count(), 0);
        assert_eq!(ledger.answer_count(), 0);
        // Second removal finds nothing
        assert!(ledger.remove_question("q1").is_none());
    }
}
