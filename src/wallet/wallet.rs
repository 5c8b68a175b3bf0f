//! Multisig wallet state machine
//!
//! Holds the fixed signer set, the confirmation threshold and the append-only
//! transaction registry. Execution is triggered by the confirmation that
//! reaches the threshold and is all-or-nothing: a failed transfer rolls the
//! whole call back.

use crate::ledger::{AssetError, AssetResolver, NativeLedger};
use crate::wallet::transaction::{Transaction, TransactionCreated};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors related to wallet operations
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Transaction {0} already executed")]
    AlreadyExecuted(u64),
    #[error("Transaction {tx_id} already confirmed by {signer}")]
    AlreadyConfirmed { tx_id: u64, signer: String },
    #[error("Transaction {tx_id} not confirmed by {signer}")]
    NotConfirmed { tx_id: u64, signer: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Transfer failed: {0}")]
    TransferFailed(#[from] AssetError),
}

/// An M-of-N multisig wallet
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultisigWallet {
    /// Unique wallet address
    address: String,
    /// Human-readable wallet name
    name: String,
    /// Authorized signers, fixed at construction
    signers: Vec<String>,
    /// Confirmations required to execute a transaction (M in M-of-N)
    required_confirmations: u32,
    /// Proposed transactions; ids are 1-based, `transactions[i]` has id `i + 1`
    transactions: Vec<Transaction>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl MultisigWallet {
    /// Create a new wallet
    ///
    /// # Errors
    /// Fails with [`WalletError::InvalidConfiguration`] if `signers` is empty
    /// or contains a duplicate, or if `required_confirmations` is not in
    /// `1..=signers.len()`.
    pub fn new(
        signers: Vec<String>,
        required_confirmations: u32,
        name: &str,
    ) -> Result<Self, WalletError> {
        if signers.is_empty() {
            return Err(WalletError::InvalidConfiguration(
                "signer set is empty".to_string(),
            ));
        }

        // Check for duplicates; a duplicate signer would be counted twice
        // toward the threshold
        let mut sorted_signers = signers.clone();
        sorted_signers.sort();
        for i in 1..sorted_signers.len() {
            if sorted_signers[i] == sorted_signers[i - 1] {
                return Err(WalletError::InvalidConfiguration(format!(
                    "duplicate signer: {}",
                    sorted_signers[i]
                )));
            }
        }

        if required_confirmations == 0 || required_confirmations as usize > signers.len() {
            return Err(WalletError::InvalidConfiguration(format!(
                "required confirmations {} out of range 1..={}",
                required_confirmations,
                signers.len()
            )));
        }

        let created_at = Utc::now();
        let address = Self::generate_address(name, &signers, created_at);

        Ok(Self {
            address,
            name: name.to_string(),
            signers,
            required_confirmations,
            transactions: Vec::new(),
            created_at,
        })
    }

    /// Generate a wallet address from name, signers and creation time
    fn generate_address(name: &str, signers: &[String], created_at: DateTime<Utc>) -> String {
        let input = format!(
            "wallet:{}:{}:{}",
            name,
            signers.join(","),
            created_at.timestamp_nanos_opt().unwrap_or(0)
        );
        let hash = Sha256::digest(input.as_bytes());
        format!("0x{}", &hex::encode(hash)[..40])
    }

    /// Get the wallet address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Get the wallet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the authorized signers
    pub fn signers(&self) -> &[String] {
        &self.signers
    }

    /// Get the confirmation threshold
    pub fn required_confirmations(&self) -> u32 {
        self.required_confirmations
    }

    /// Check whether an account is an authorized signer
    pub fn is_signer(&self, account: &str) -> bool {
        self.signers.iter().any(|s| s == account)
    }

    /// Number of transactions ever proposed
    ///
    /// Ids are 1-based, so this is also the highest valid transaction id.
    pub fn tx_count(&self) -> u64 {
        self.transactions.len() as u64
    }

    /// Read a transaction by id (1-based)
    pub fn transaction(&self, tx_id: u64) -> Result<&Transaction, WalletError> {
        if tx_id == 0 || tx_id > self.transactions.len() as u64 {
            return Err(WalletError::NotFound(format!("transaction {}", tx_id)));
        }
        Ok(&self.transactions[(tx_id - 1) as usize])
    }

    /// List all transactions
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Propose an outgoing transfer
    ///
    /// The proposer must be a signer but is not auto-confirmed; approving is
    /// a separate act, including for the proposer.
    ///
    /// # Arguments
    /// * `caller` - Authenticated principal proposing the transfer
    /// * `receiver` - Destination account
    /// * `token_address` - Token contract to draw from, or `None` for native
    /// * `amount` - Transfer quantity
    pub fn create_transaction(
        &mut self,
        caller: &str,
        receiver: &str,
        token_address: Option<String>,
        amount: u128,
    ) -> Result<TransactionCreated, WalletError> {
        if !self.is_signer(caller) {
            return Err(WalletError::Unauthorized(caller.to_string()));
        }

        let tx_id = self.transactions.len() as u64 + 1;
        let tx = Transaction::new(tx_id, receiver.to_string(), token_address.clone(), amount);
        self.transactions.push(tx);

        log::info!(
            "Wallet {}: transaction {} proposed by {} ({} -> {})",
            self.address,
            tx_id,
            caller,
            amount,
            receiver
        );

        Ok(TransactionCreated {
            wallet: self.address.clone(),
            tx_id,
            receiver: receiver.to_string(),
            token_address,
            amount,
            timestamp: Utc::now(),
        })
    }

    /// Confirm a transaction, executing it if this confirmation reaches quorum
    ///
    /// Execution dispatches the transfer through `native` (sentinel token
    /// address `None`) or through the asset resolved from `assets`. The
    /// `executed` flag is set before the asset call is issued; if the call
    /// fails, the flag, the confirmation and the count are all rolled back
    /// and the whole operation fails with [`WalletError::TransferFailed`].
    ///
    /// # Errors
    /// `Unauthorized` if `caller` is not a signer, `NotFound` for an unknown
    /// id, `AlreadyExecuted` for a terminal transaction, `AlreadyConfirmed`
    /// if `caller` already confirmed it.
    pub fn sign_transaction(
        &mut self,
        caller: &str,
        tx_id: u64,
        native: &mut NativeLedger,
        assets: &mut dyn AssetResolver,
    ) -> Result<&Transaction, WalletError> {
        if !self.is_signer(caller) {
            return Err(WalletError::Unauthorized(caller.to_string()));
        }
        if tx_id == 0 || tx_id > self.transactions.len() as u64 {
            return Err(WalletError::NotFound(format!("transaction {}", tx_id)));
        }

        let required = self.required_confirmations;
        let wallet_address = self.address.clone();
        let tx = &mut self.transactions[(tx_id - 1) as usize];

        if tx.executed {
            return Err(WalletError::AlreadyExecuted(tx_id));
        }
        if tx.is_confirmed_by(caller) {
            return Err(WalletError::AlreadyConfirmed {
                tx_id,
                signer: caller.to_string(),
            });
        }

        tx.confirm(caller);
        log::debug!(
            "Wallet {}: transaction {} confirmed by {} ({}/{})",
            wallet_address,
            tx_id,
            caller,
            tx.confirmation_count(),
            required
        );

        if tx.confirmation_count() == required {
            // Mark terminal before dispatching so any observer during the
            // asset call sees the transaction as executed
            tx.executed = true;

            let result = match &tx.token_address {
                None => native.transfer(&wallet_address, &tx.receiver, tx.amount),
                Some(token) => match assets.asset_mut(token) {
                    Some(asset) => asset.transfer(&wallet_address, &tx.receiver, tx.amount),
                    None => Err(AssetError::UnknownAsset(token.clone())),
                },
            };

            if let Err(err) = result {
                // Roll back the entire call: the confirmation just recorded
                // and the executed flag
                tx.executed = false;
                tx.revoke(caller);
                log::warn!(
                    "Wallet {}: transaction {} execution failed, rolled back: {}",
                    wallet_address,
                    tx_id,
                    err
                );
                return Err(WalletError::TransferFailed(err));
            }

            log::info!(
                "Wallet {}: transaction {} executed ({} -> {})",
                wallet_address,
                tx_id,
                tx.amount,
                tx.receiver
            );
        }

        Ok(&self.transactions[(tx_id - 1) as usize])
    }

    /// Withdraw a previously given confirmation
    ///
    /// Never triggers execution; only crossing the threshold upward does.
    ///
    /// # Errors
    /// `Unauthorized` if `caller` is not a signer, `NotFound` for an unknown
    /// id, `AlreadyExecuted` for a terminal transaction, `NotConfirmed` if
    /// `caller` has no active confirmation on it.
    pub fn unsign_transaction(
        &mut self,
        caller: &str,
        tx_id: u64,
    ) -> Result<&Transaction, WalletError> {
        if !self.is_signer(caller) {
            return Err(WalletError::Unauthorized(caller.to_string()));
        }
        if tx_id == 0 || tx_id > self.transactions.len() as u64 {
            return Err(WalletError::NotFound(format!("transaction {}", tx_id)));
        }

        let tx = &mut self.transactions[(tx_id - 1) as usize];

        if tx.executed {
            return Err(WalletError::AlreadyExecuted(tx_id));
        }
        if !tx.is_confirmed_by(caller) {
            return Err(WalletError::NotConfirmed {
                tx_id,
                signer: caller.to_string(),
            });
        }

        tx.revoke(caller);
        log::debug!(
            "Wallet {}: transaction {} unconfirmed by {} ({} left)",
            self.address,
            tx_id,
            caller,
            tx.confirmation_count()
        );

        Ok(&self.transactions[(tx_id - 1) as usize])
    }
}
