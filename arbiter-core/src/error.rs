//! Error types for arbiter-core

use thiserror::Error;

/// Result type alias for oracle operations
pub type Result<T> = std::result::Result<T, OracleError>;

/// Error types for oracle operations
///
/// Every precondition violation fails the whole operation atomically: no
/// record is created or deleted and no currency moves.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    /// A question with the same key is still open
    #[error("question {0} already exists")]
    DuplicateQuestion(String),

    /// The answer window duration must be strictly positive
    #[error("invalid timeout: {0}")]
    InvalidTimeout(u64),

    /// The attached value does not cover the configured stake size
    #[error("insufficient stake: supplied {supplied}, required {required}")]
    InsufficientStake { supplied: u64, required: u64 },

    /// The caller's account cannot cover the attached value
    #[error("insufficient funds for account {account}: balance {balance}, required {required}")]
    InsufficientFunds {
        account: String,
        balance: u64,
        required: u64,
    },

    /// No open question under this key
    #[error("question {0} not found")]
    QuestionNotFound(String),

    /// An answer with the same key already exists (answer keys are global)
    #[error("answer {0} already exists")]
    DuplicateAnswer(String),

    /// Answers are only accepted during the first third of the timeout window
    #[error("answer window closed for question {0}")]
    AnswerWindowClosed(String),

    /// The question already holds the maximum number of answers
    #[error("answer slots full for question {0}")]
    AnswerSlotsFull(String),

    /// No answer record under this key
    #[error("answer {0} not found")]
    AnswerNotFound(String),

    /// Only the court identity may falsify answers
    #[error("unauthorized: {0} is not the court")]
    Unauthorized(String),

    /// The required timeout window has not elapsed yet
    #[error("too early to resolve: now {now}, resolvable at {resolvable_at}")]
    TooEarlyToResolve { now: u64, resolvable_at: u64 },

    /// The submitted image does not hash to the answer key
    #[error("image hash mismatch: expected {expected}, got {actual}")]
    ImageHashMismatch { expected: String, actual: String },

    /// The answer was falsified by the court
    #[error("answer {0} already falsified")]
    AnswerAlreadyFalsified(String),

    /// Hex decoding errors
    #[error("hex decoding error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Callback handler errors (surfaced by handlers, isolated by dispatch)
    #[error("handler error: {0}")]
    Handler(String),
}

impl From<&str> for OracleError {
    fn from(msg: &str) -> Self {
        Self::Handler(msg.to_string())
    }
}

impl From<String> for OracleError {
    fn from(msg: String) -> Self {
        Self::Handler(msg)
    }
}
