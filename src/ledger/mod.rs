//! Asset ledgers consumed by multisig wallets
//!
//! Two kinds of value can leave a wallet: the native balance tracked by
//! [`NativeLedger`], and fungible tokens held by any [`FungibleAsset`]
//! provider resolved through an [`AssetResolver`].

pub mod native;
pub mod token;

pub use native::{AssetError, NativeLedger};
pub use token::{AssetResolver, FungibleAsset, SimpleToken, TokenRegistry};
