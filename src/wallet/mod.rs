//! Multi-signature wallets with quorum-triggered execution
//!
//! A wallet is owned by a fixed signer set and a confirmation threshold.
//! Any signer may propose an outgoing transfer; the transfer is dispatched
//! automatically and atomically in the call that collects the final required
//! confirmation.
//!
//! # Example
//!
//! ```ignore
//! use quorum_wallet::wallet::MultisigWallet;
//!
//! // 3-of-5 wallet
//! let mut wallet = MultisigWallet::new(signers, 3, "Treasury")?;
//!
//! let event = wallet.create_transaction("alice", "carol", None, 100)?;
//! wallet.sign_transaction("bob", event.tx_id, &mut native, &mut tokens)?;
//! wallet.sign_transaction("dave", event.tx_id, &mut native, &mut tokens)?;
//! // third confirmation executes the transfer in the same call
//! wallet.sign_transaction("erin", event.tx_id, &mut native, &mut tokens)?;
//! ```

pub mod transaction;
pub mod wallet;

pub use transaction::{Transaction, TransactionCreated};
pub use wallet::{MultisigWallet, WalletError};
