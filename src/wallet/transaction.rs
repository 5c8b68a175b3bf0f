//! Proposed transfer records
//!
//! A [`Transaction`] is an outgoing transfer proposal owned by exactly one
//! wallet, collecting signer confirmations until it reaches quorum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A proposed outgoing transfer awaiting confirmations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction id, stable for the wallet's lifetime (1-based)
    pub id: u64,
    /// Destination account
    pub receiver: String,
    /// Token contract address, or `None` for a native-currency transfer
    pub token_address: Option<String>,
    /// Transfer quantity
    pub amount: u128,
    /// Whether the transfer has been dispatched (terminal once true)
    pub executed: bool,
    /// Confirmations: signer -> confirmed
    confirmations: HashMap<String, bool>,
    /// Number of signers with a true confirmation
    confirmation_count: u32,
    /// When the transaction was proposed
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a fresh proposal with no confirmations
    pub fn new(id: u64, receiver: String, token_address: Option<String>, amount: u128) -> Self {
        Self {
            id,
            receiver,
            token_address,
            amount,
            executed: false,
            confirmations: HashMap::new(),
            confirmation_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Whether `signer` currently confirms this transaction
    pub fn is_confirmed_by(&self, signer: &str) -> bool {
        *self.confirmations.get(signer).unwrap_or(&false)
    }

    /// Number of active confirmations
    pub fn confirmation_count(&self) -> u32 {
        self.confirmation_count
    }

    /// Signers whose confirmation is currently true
    pub fn confirmed_by(&self) -> Vec<&str> {
        self.confirmations
            .iter()
            .filter(|(_, &confirmed)| confirmed)
            .map(|(signer, _)| signer.as_str())
            .collect()
    }

    /// Record a confirmation. Caller has already validated the signer.
    pub(crate) fn confirm(&mut self, signer: &str) {
        self.confirmations.insert(signer.to_string(), true);
        self.confirmation_count += 1;
    }

    /// Withdraw a confirmation. Caller has already validated the signer.
    pub(crate) fn revoke(&mut self, signer: &str) {
        self.confirmations.insert(signer.to_string(), false);
        self.confirmation_count -= 1;
    }
}

/// Event returned when a transaction is proposed
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionCreated {
    /// Wallet the transaction belongs to
    pub wallet: String,
    /// Id of the new transaction
    pub tx_id: u64,
    /// Destination account
    pub receiver: String,
    /// Token contract address, `None` for native currency
    pub token_address: Option<String>,
    /// Transfer quantity
    pub amount: u128,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction_has_no_confirmations() {
        let tx = Transaction::new(1, "receiver".to_string(), None, 100);

        assert_eq!(tx.id, 1);
        assert!(!tx.executed);
        assert_eq!(tx.confirmation_count(), 0);
        assert!(!tx.is_confirmed_by("anyone"));
        assert!(tx.confirmed_by().is_empty());
    }

    #[test]
    fn test_confirm_and_revoke() {
        let mut tx = Transaction::new(1, "receiver".to_string(), None, 100);

        tx.confirm("alice");
        tx.confirm("bob");
        assert_eq!(tx.confirmation_count(), 2);
        assert!(tx.is_confirmed_by("alice"));

        tx.revoke("alice");
        assert_eq!(tx.confirmation_count(), 1);
        assert!(!tx.is_confirmed_by("alice"));
        assert!(tx.is_confirmed_by("bob"));
        assert_eq!(tx.confirmed_by(), vec!["bob"]);
    }
}
