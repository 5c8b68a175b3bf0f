//! Wallet factory
//!
//! Creates multisig wallets, records which wallets each signer participates
//! in, and holds the owner-settable system info string.

pub mod factory;

pub use factory::{WalletCreated, WalletFactory};
