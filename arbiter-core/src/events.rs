//! Oracle notification events.
//!
//! Every externally observable state transition appends one event to the
//! oracle's journal. Consumers drain the journal with
//! [`crate::Oracle::take_events`]; the same transitions are mirrored to
//! `tracing` logs.

use serde::{Deserialize, Serialize};

/// Notification emitted by an oracle state transition
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OracleEvent {
    /// A new question was asked
    NewQuestion {
        question_key: String,
        /// Hex encoding of the asker-supplied seed
        seed: String,
        asker: String,
    },

    /// A staked answer was submitted against an open question
    NewAnswer {
        question_key: String,
        answer_key: String,
    },

    /// The court declared an answer incorrect
    AnswerFalsified {
        question_key: String,
        answer_key: String,
    },

    /// The question was resolved and all of its records deleted.
    ///
    /// `successful` is true only when a surviving answer was accepted and its
    /// success handler ran without error; a failure resolution, or a success
    /// resolution whose handler failed, reports false.
    Resolved {
        question_key: String,
        successful: bool,
    },
}

impl OracleEvent {
    /// Question key the event refers to
    pub fn question_key(&self) -> &str {
        match self {
            Self::NewQuestion { question_key, .. }
            | Self::NewAnswer { question_key, .. }
            | Self::AnswerFalsified { question_key, .. }
            | Self::Resolved { question_key, .. } => question_key,
        }
    }
}
