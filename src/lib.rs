//! Quorum-Wallet: M-of-N multisig wallets in Rust
//!
//! This crate provides shared accounts controlled by a fixed signer set,
//! where any outgoing transfer needs a quorum of independent confirmations:
//! - Multisig wallets with propose / sign / unsign operations
//! - Automatic, atomic execution in the call that reaches the threshold
//! - Native-currency and fungible-token transfers behind one capability trait
//! - A factory that creates wallets and catalogs them per signer
//! - JSON persistence and a CLI over the stored state
//!
//! # Example
//!
//! ```rust
//! use quorum_wallet::factory::WalletFactory;
//! use quorum_wallet::ledger::{NativeLedger, TokenRegistry};
//!
//! let mut factory = WalletFactory::new("deployer");
//! let mut native = NativeLedger::new();
//! let mut tokens = TokenRegistry::new();
//!
//! // 2-of-3 wallet
//! let signers = vec!["alice".to_string(), "bob".to_string(), "carol".to_string()];
//! let event = factory.create_multisig_wallet(signers, 2, "Treasury").unwrap();
//! native.deposit(&event.wallet, 100);
//!
//! // Propose, then confirm until quorum executes the transfer
//! let wallet = factory.wallet_mut(&event.wallet).unwrap();
//! let tx = wallet.create_transaction("alice", "dave", None, 40).unwrap();
//! wallet.sign_transaction("alice", tx.tx_id, &mut native, &mut tokens).unwrap();
//! wallet.sign_transaction("bob", tx.tx_id, &mut native, &mut tokens).unwrap();
//!
//! assert!(wallet.transaction(tx.tx_id).unwrap().executed);
//! assert_eq!(native.balance_of("dave"), 40);
//! ```

pub mod cli;
pub mod factory;
pub mod ledger;
pub mod storage;
pub mod wallet;

// Re-export commonly used types
pub use factory::{WalletCreated, WalletFactory};
pub use ledger::{AssetError, AssetResolver, FungibleAsset, NativeLedger, SimpleToken, TokenRegistry};
pub use storage::{Storage, StorageConfig, SystemState};
pub use wallet::{MultisigWallet, Transaction, TransactionCreated, WalletError};
