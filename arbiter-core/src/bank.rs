//! # Stake Accounting
//!
//! Per-account balances plus the pool of locked stakes. Every oracle
//! operation either moves currency completely or not at all; the sum of all
//! balances and the pool is invariant under oracle operations.

use crate::{error::Result, OracleError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Currency ledger backing the oracle's stake lifecycle
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Bank {
    balances: HashMap<String, u64>,
    /// Stakes currently locked by unresolved answers, plus any surplus from
    /// over-staked submissions or unrefunded answers
    pool: u64,
}

impl Bank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account with freshly issued funds
    pub fn deposit(&mut self, account: &str, amount: u64) {
        *self.balances.entry(account.to_string()).or_insert(0) += amount;
    }

    /// Current balance of an account
    pub fn balance(&self, account: &str) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Currency currently held by the pool
    pub fn pool(&self) -> u64 {
        self.pool
    }

    /// Sum of all balances plus the pool
    pub fn total(&self) -> u64 {
        self.balances.values().sum::<u64>() + self.pool
    }

    /// Move the full attached value from the account into the pool.
    ///
    /// Fails without any transfer when the account cannot cover it.
    pub(crate) fn lock_stake(&mut self, account: &str, amount: u64) -> Result<()> {
        let balance = self.balance(account);
        if balance < amount {
            return Err(OracleError::InsufficientFunds {
                account: account.to_string(),
                balance,
                required: amount,
            });
        }
        self.balances.insert(account.to_string(), balance - amount);
        self.pool += amount;
        Ok(())
    }

    /// Pay one stake-size unit out of the pool to an account.
    ///
    /// Used for the prosecutor reward on falsification and the answerer
    /// refund on success resolution.
    pub(crate) fn release_stake(&mut self, account: &str, amount: u64) -> Result<()> {
        if self.pool < amount {
            return Err(OracleError::InsufficientFunds {
                account: "pool".to_string(),
                balance: self.pool,
                required: amount,
            });
        }
        self.pool -= amount;
        self.deposit(account, amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_and_balance() {
        let mut bank = Bank::new();
        assert_eq!(bank.balance("alice"), 0);
        bank.deposit("alice", 500);
        bank.deposit("alice", 100);
        assert_eq!(bank.balance("alice"), 600);
        assert_eq!(bank.total(), 600);
    }

    #[test]
    fn test_lock_and_release_stake() {
        let mut bank = Bank::new();
        bank.deposit("bob", 1000);

        bank.lock_stake("bob", 400).unwrap();
        assert_eq!(bank.balance("bob"), 600);
        assert_eq!(bank.pool(), 400);

        bank.release_stake("carol", 300).unwrap();
        assert_eq!(bank.balance("carol"), 300);
        assert_eq!(bank.pool(), 100);

        // Conservation across the whole sequence
        assert_eq!(bank.total(), 1000);
    }

    #[test]
    fn test_lock_stake_underfunded() {
        let mut bank = Bank::new();
        bank.deposit("bob", 50);
        let err = bank.lock_stake("bob", 100).unwrap_err();
        assert!(matches!(err, OracleError::InsufficientFunds { .. }));
        // Nothing moved
        assert_eq!(bank.balance("bob"), 50);
        assert_eq!(bank.pool(), 0);
    }

    #[test]
    fn test_release_stake_empty_pool() {
        let mut bank = Bank::new();
        let err = bank.release_stake("carol", 10).unwrap_err();
        assert!(matches!(err, OracleError::InsufficientFunds { .. }));
        assert_eq!(bank.balance("carol"), 0);
    }
}
