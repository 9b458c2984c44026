//! # Arbiter Core
//!
//! Core library for an optimistic dispute-resolution oracle.
//!
//! An asker poses a question identified by the hash of an initial computation
//! state. Answerers stake funds on candidate final-state hashes, a designated
//! court may falsify any submitted answer, and after fixed timeout windows
//! the oracle resolves deterministically: it either accepts a surviving
//! unfalsified answer (refunding the answerer's stake and invoking the
//! asker's success handler) or declares failure after an extended grace
//! period.
//!
//! ## Features
//!
//! - **Question lifecycle**: ask, answer under stake, falsify, resolve
//! - **Stake accounting**: stakes locked per answer, paid to prosecutors on
//!   falsification, refunded on honest resolution
//! - **Callback dispatch**: asker-supplied handlers invoked at resolution,
//!   with failures isolated from the oracle's own state transition
//! - **Event journal**: every transition emits a notification event
//!
//! ## Examples
//!
//! ```rust
//! use arbiter_core::{CallbackRegistry, Oracle, OracleConfig};
//! use arbiter_core::utils::answer_key;
//!
//! let mut oracle = Oracle::new(OracleConfig::new(100, 8, "court"));
//! let mut handlers = CallbackRegistry::new();
//! oracle.deposit("bob", 500);
//!
//! // Ask at t = 0 with a 90 second answer window
//! let question_key = oracle.ask("alice", b"initial state", 90, "cb", "cb", 0)?;
//!
//! // Bob stakes 100 on his claimed final state
//! let key = answer_key(b"final state");
//! oracle.answer("bob", &question_key, &key, 100, 10)?;
//!
//! // Anyone may resolve once the window has elapsed
//! oracle.resolve_success(&key, b"final state", 90, &mut handlers)?;
//! assert!(oracle.get_question(&question_key).is_none());
//! Ok::<(), arbiter_core::OracleError>(())
//! ```

pub mod bank;
pub mod callback;
pub mod config;
pub mod error;
pub mod events;
pub mod ledger;
pub mod oracle;
pub mod test_utils;
pub mod utils;

pub use bank::Bank;
pub use callback::{CallbackRegistry, ResolutionHandler};
pub use config::OracleConfig;
pub use error::{OracleError, Result};
pub use events::OracleEvent;
pub use ledger::{Answer, OracleLedger, Question};
pub use oracle::Oracle;

/// Default stake size (currency units per answer)
pub const DEFAULT_STAKE_SIZE: u64 = 1000;

/// Default maximum number of answers per question
pub const DEFAULT_MAX_ANSWERS: usize = 8;
