//! Common test utilities for arbiter-core tests.
//!
//! Provides shared oracle fixtures, funded test accounts, and a recording
//! resolution handler used across module and integration tests.

use crate::callback::{CallbackRegistry, ResolutionHandler};
use crate::config::OracleConfig;
use crate::error::Result;
use crate::oracle::Oracle;
use std::cell::RefCell;
use std::rc::Rc;

/// Stake size used by test oracles
pub const STAKE: u64 = 100;

/// Maximum answers per question in test oracles
pub const MAX_ANSWERS: usize = 3;

/// Starting balance of every funded test account
pub const STARTING_BALANCE: u64 = 1000;

/// Accounts funded by [`funded_oracle`]
pub const TEST_ACCOUNTS: [&str; 4] = ["alice", "bob", "carol", "dave"];

/// Create a test oracle with the standard config and funded accounts.
///
/// The court identity is "court"; it holds no funds since falsification
/// rewards are paid from the pool.
pub fn funded_oracle() -> Oracle {
    let config = OracleConfig::new(STAKE, MAX_ANSWERS, "court");
    let mut oracle = Oracle::new(config);
    for account in TEST_ACCOUNTS {
        oracle.deposit(account, STARTING_BALANCE);
    }
    oracle
}

/// Registry with succeeding handlers under the conventional test ids
/// "on_success" and "on_fail"
pub fn noop_registry() -> CallbackRegistry {
    let mut registry = CallbackRegistry::new();
    let calls = Rc::new(RefCell::new(Vec::new()));
    registry.register("on_success", Box::new(RecordingHandler::succeeding(calls.clone())));
    registry.register("on_fail", Box::new(RecordingHandler::succeeding(calls)));
    registry
}

/// Resolution handler that records every invocation into a shared log.
///
/// Entries have the form `success:<question_key>` or `failure:<question_key>`.
/// The failing variant records the call and then returns an error, for
/// exercising callback isolation.
pub struct RecordingHandler {
    calls: Rc<RefCell<Vec<String>>>,
    fail: bool,
}

impl RecordingHandler {
    pub fn succeeding(calls: Rc<RefCell<Vec<String>>>) -> Self {
        Self { calls, fail: false }
    }

    pub fn failing(calls: Rc<RefCell<Vec<String>>>) -> Self {
        Self { calls, fail: true }
    }
}

impl ResolutionHandler for RecordingHandler {
    fn on_success(&mut self, question_key: &str, _image: &[u8]) -> Result<()> {
        self.calls.borrow_mut().push(format!("success:{question_key}"));
        if self.fail {
            return Err("handler refused the result".into());
        }
        Ok(())
    }

    fn on_failure(&mut self, question_key: &str) -> Result<()> {
        self.calls.borrow_mut().push(format!("failure:{question_key}"));
        if self.fail {
            return Err("handler refused the result".into());
        }
        Ok(())
    }
}
