//! # Question/Answer State Machine
//!
//! Implements the optimistic oracle lifecycle: an asker poses a question
//! identified by the hash of an initial computation state, answerers stake
//! funds on candidate final-state hashes, the court may falsify any answer
//! before it is accepted, and after fixed timeout windows anyone may resolve
//! the question deterministically.
//!
//! All operations are atomic end-to-end: every precondition is checked before
//! the first mutation, so a failing call leaves the ledger, the bank, and the
//! event journal untouched. Resolution deletes all records and refunds the
//! stake *before* invoking any externally supplied handler, so a re-entering
//! handler can never observe a half-resolved question.

use crate::{
    bank::Bank,
    callback::CallbackRegistry,
    config::OracleConfig,
    error::Result,
    events::OracleEvent,
    ledger::{Answer, OracleLedger, Question},
    utils, OracleError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Optimistic dispute-resolution oracle.
///
/// Owns the question/answer ledger, the stake accounting, and the event
/// journal. Callback handlers live outside the oracle in a
/// [`CallbackRegistry`] and are passed into the resolution calls.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Oracle {
    config: OracleConfig,
    ledger: OracleLedger,
    bank: Bank,
    events: Vec<OracleEvent>,
}

impl Oracle {
    pub fn new(config: OracleConfig) -> Self {
        Self {
            config,
            ledger: OracleLedger::new(),
            bank: Bank::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Read-only view of the question/answer store
    pub fn ledger(&self) -> &OracleLedger {
        &self.ledger
    }

    /// Read-only view of the stake accounting
    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    /// Credit an account so it can stake answers
    pub fn deposit(&mut self, account: &str, amount: u64) {
        self.bank.deposit(account, amount);
    }

    /// Look up a question by key
    pub fn get_question(&self, key: &str) -> Option<&Question> {
        self.ledger.question(key)
    }

    /// Look up an answer by key
    pub fn get_answer(&self, key: &str) -> Option<&Answer> {
        self.ledger.answer(key)
    }

    /// Drain the event journal
    pub fn take_events(&mut self) -> Vec<OracleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pose a new question.
    ///
    /// The question key is the SHA256 digest of `seed`. Fails with
    /// `DuplicateQuestion` while a prior question with the same key is still
    /// open; a key becomes reusable once its question is resolved. No stake
    /// is taken at ask time.
    ///
    /// Returns the derived question key.
    pub fn ask(
        &mut self,
        asker: &str,
        seed: &[u8],
        timeout: u64,
        success_handler: &str,
        fail_handler: &str,
        now: u64,
    ) -> Result<String> {
        if timeout == 0 {
            return Err(OracleError::InvalidTimeout(timeout));
        }
        let question_key = utils::question_key(seed);
        if self.ledger.question_exists(&question_key) {
            return Err(OracleError::DuplicateQuestion(question_key));
        }

        self.ledger.insert_question(
            question_key.clone(),
            Question {
                ask_time: now,
                timeout,
                asker: asker.to_string(),
                answer_keys: Vec::new(),
                success_handler: success_handler.to_string(),
                fail_handler: fail_handler.to_string(),
            },
        );

        info!(
            question_key,
            asker,
            timeout,
            ask_time = now,
            "new question asked"
        );
        self.events.push(OracleEvent::NewQuestion {
            question_key: question_key.clone(),
            seed: hex::encode(seed),
            asker: asker.to_string(),
        });
        Ok(question_key)
    }

    /// Submit a staked candidate answer.
    ///
    /// `answer_key` is the hash of the claimed final-state image; the image
    /// itself is only revealed at resolution time. `stake` is the full value
    /// attached by the caller and must cover the configured stake size; the
    /// whole amount is locked into the pool. Submission is only accepted
    /// during the first third of the answer window, leaving the remaining two
    /// thirds for falsification review.
    pub fn answer(
        &mut self,
        answerer: &str,
        question_key: &str,
        answer_key: &str,
        stake: u64,
        now: u64,
    ) -> Result<()> {
        if stake < self.config.stake_size {
            return Err(OracleError::InsufficientStake {
                supplied: stake,
                required: self.config.stake_size,
            });
        }
        let question = self
            .ledger
            .question(question_key)
            .ok_or_else(|| OracleError::QuestionNotFound(question_key.to_string()))?;
        if self.ledger.answer_exists(answer_key) {
            return Err(OracleError::DuplicateAnswer(answer_key.to_string()));
        }
        if !question.answer_window_open(now) {
            return Err(OracleError::AnswerWindowClosed(question_key.to_string()));
        }
        if question.answer_keys.len() >= self.config.max_answers {
            return Err(OracleError::AnswerSlotsFull(question_key.to_string()));
        }

        // Last fallible step before the ledger mutation
        self.bank.lock_stake(answerer, stake)?;
        self.ledger.insert_answer(
            question_key,
            answer_key.to_string(),
            Answer {
                answerer: answerer.to_string(),
                falsified: false,
                question_key: question_key.to_string(),
            },
        );

        info!(question_key, answer_key, answerer, stake, "new answer submitted");
        self.events.push(OracleEvent::NewAnswer {
            question_key: question_key.to_string(),
            answer_key: answer_key.to_string(),
        });
        Ok(())
    }

    /// Declare an answer incorrect. Restricted to the court identity.
    ///
    /// Pays one stake-size unit from the pool to `prosecutor` as the
    /// challenge reward; the payment is unconditional since validity of the
    /// falsification is the court's exclusive responsibility. An answer can
    /// be falsified exactly once and the flag never reverts.
    pub fn falsify(&mut self, caller: &str, answer_key: &str, prosecutor: &str) -> Result<()> {
        let answer = self
            .ledger
            .answer(answer_key)
            .ok_or_else(|| OracleError::AnswerNotFound(answer_key.to_string()))?;
        if caller != self.config.court {
            return Err(OracleError::Unauthorized(caller.to_string()));
        }
        if answer.falsified {
            return Err(OracleError::AnswerAlreadyFalsified(answer_key.to_string()));
        }
        let question_key = answer.question_key.clone();

        self.bank.release_stake(prosecutor, self.config.stake_size)?;
        self.ledger.falsify_answer(answer_key);

        info!(question_key, answer_key, prosecutor, "answer falsified by court");
        self.events.push(OracleEvent::AnswerFalsified {
            question_key,
            answer_key: answer_key.to_string(),
        });
        Ok(())
    }

    /// Accept a surviving answer and terminate its question. Permissionless.
    ///
    /// `image` must hash to `answer_key`, proving it is the final state
    /// originally committed to. Legal once the full answer window has
    /// elapsed and the answer is unfalsified; a falsification that lands
    /// before this call is processed is honored, one that lands after finds
    /// the records already deleted.
    ///
    /// All records of the question are deleted and the answerer's stake
    /// refunded before the success handler runs; a failing handler only
    /// degrades the resolution notification and never rolls either back.
    ///
    /// Returns whether the success handler ran cleanly.
    pub fn resolve_success(
        &mut self,
        answer_key: &str,
        image: &[u8],
        now: u64,
        handlers: &mut CallbackRegistry,
    ) -> Result<bool> {
        // An absent answer means its owning question was already resolved
        // (or never posed); the question is the unit of resolution, so both
        // lookups report the question as missing.
        let answer = self
            .ledger
            .answer(answer_key)
            .ok_or_else(|| OracleError::QuestionNotFound(answer_key.to_string()))?;
        let question_key = answer.question_key.clone();
        let question = self
            .ledger
            .question(&question_key)
            .ok_or_else(|| OracleError::QuestionNotFound(question_key.clone()))?;
        if !question.resolvable(now) {
            return Err(OracleError::TooEarlyToResolve {
                now,
                resolvable_at: question.resolvable_at(),
            });
        }
        let image_hash = utils::answer_key(image);
        if image_hash != answer_key {
            return Err(OracleError::ImageHashMismatch {
                expected: answer_key.to_string(),
                actual: image_hash,
            });
        }
        if answer.falsified {
            return Err(OracleError::AnswerAlreadyFalsified(answer_key.to_string()));
        }

        // Capture everything needed, then commit. The refund is the only
        // fallible step and runs first, so a failure leaves the ledger
        // untouched; all records are deleted before any external
        // interaction (reentrancy boundary).
        let answerer = answer.answerer.clone();
        let success_handler = question.success_handler.clone();
        self.bank.release_stake(&answerer, self.config.stake_size)?;
        self.ledger.remove_question(&question_key);

        let successful = handlers.dispatch_success(&success_handler, &question_key, image);
        info!(
            question_key,
            answer_key,
            answerer,
            handler_ok = successful,
            "question resolved with accepted answer"
        );
        self.events.push(OracleEvent::Resolved {
            question_key,
            successful,
        });
        Ok(successful)
    }

    /// Give up on a question after the extended grace window. Permissionless.
    ///
    /// Legal once twice the timeout has elapsed, strictly later than success
    /// resolution becomes possible. Deletes every record of the question;
    /// stakes of leftover unresolved answers stay in the pool. The failure
    /// handler runs after cleanup and its outcome never surfaces: this path
    /// always reports an unsuccessful resolution.
    pub fn resolve_fail(
        &mut self,
        question_key: &str,
        now: u64,
        handlers: &mut CallbackRegistry,
    ) -> Result<()> {
        let question = self
            .ledger
            .question(question_key)
            .ok_or_else(|| OracleError::QuestionNotFound(question_key.to_string()))?;
        if !question.failable(now) {
            return Err(OracleError::TooEarlyToResolve {
                now,
                resolvable_at: question.failable_at(),
            });
        }

        let fail_handler = question.fail_handler.clone();
        let leftover_answers = question.answer_keys.len();
        self.ledger.remove_question(question_key);

        let handler_ok = handlers.dispatch_failure(&fail_handler, question_key);
        debug!(question_key, handler_ok, leftover_answers, "failure handler dispatched");
        info!(question_key, leftover_answers, "question resolved as failed");
        self.events.push(OracleEvent::Resolved {
            question_key: question_key.to_string(),
            successful: false,
        });
        Ok(())
    }
}
