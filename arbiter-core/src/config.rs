//! Oracle configuration.
//!
//! All parameters are fixed when the oracle is constructed and immutable
//! thereafter.

use crate::{DEFAULT_MAX_ANSWERS, DEFAULT_STAKE_SIZE};
use serde::{Deserialize, Serialize};

/// Deployment-time oracle parameters
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OracleConfig {
    /// Currency amount required per answer, refunded on honest resolution or
    /// paid to the prosecutor on falsification
    pub stake_size: u64,

    /// Maximum number of answers accepted per question
    pub max_answers: usize,

    /// Identity of the arbitration authority; the only caller allowed to
    /// falsify answers
    pub court: String,
}

impl OracleConfig {
    pub fn new(stake_size: u64, max_answers: usize, court: impl Into<String>) -> Self {
        Self {
            stake_size,
            max_answers,
            court: court.into(),
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            stake_size: DEFAULT_STAKE_SIZE,
            max_answers: DEFAULT_MAX_ANSWERS,
            court: "court".to_string(),
        }
    }
}
