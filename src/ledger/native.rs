//! Native balance ledger
//!
//! Tracks the base-asset balance of every account, including wallets.
//! Deposits are unconditional credits; outgoing transfers are balance-checked.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised when moving value on a ledger
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),
    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

/// Account -> native balance map
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NativeLedger {
    balances: HashMap<String, u128>,
}

impl NativeLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Get the balance of an account (zero if never seen)
    pub fn balance_of(&self, account: &str) -> u128 {
        *self.balances.get(account).unwrap_or(&0)
    }

    /// Credit an account unconditionally
    pub fn deposit(&mut self, account: &str, amount: u128) {
        *self.balances.entry(account.to_string()).or_insert(0) += amount;
        log::debug!("Deposited {} to {}", amount, account);
    }

    /// Move native value between accounts
    ///
    /// # Errors
    /// Fails if `from` holds less than `amount`; balances are untouched on
    /// failure.
    pub fn transfer(&mut self, from: &str, to: &str, amount: u128) -> Result<(), AssetError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(AssetError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }

        *self.balances.entry(from.to_string()).or_insert(0) -= amount;
        *self.balances.entry(to.to_string()).or_insert(0) += amount;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_and_balance() {
        let mut ledger = NativeLedger::new();
        assert_eq!(ledger.balance_of("alice"), 0);

        ledger.deposit("alice", 500);
        ledger.deposit("alice", 250);
        assert_eq!(ledger.balance_of("alice"), 750);
    }

    #[test]
    fn test_transfer() {
        let mut ledger = NativeLedger::new();
        ledger.deposit("alice", 100);

        ledger.transfer("alice", "bob", 40).unwrap();
        assert_eq!(ledger.balance_of("alice"), 60);
        assert_eq!(ledger.balance_of("bob"), 40);
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let mut ledger = NativeLedger::new();
        ledger.deposit("alice", 10);

        let result = ledger.transfer("alice", "bob", 11);
        assert!(matches!(
            result,
            Err(AssetError::InsufficientBalance { have: 10, need: 11 })
        ));

        // Nothing moved
        assert_eq!(ledger.balance_of("alice"), 10);
        assert_eq!(ledger.balance_of("bob"), 0);
    }
}
