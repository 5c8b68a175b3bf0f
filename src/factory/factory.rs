//! Factory for multisig wallets
//!
//! Owns every wallet it creates and a per-signer registry of wallet
//! addresses. Wallet creation is unrestricted; the system info string is
//! writable only by the factory owner.

use crate::wallet::{MultisigWallet, WalletError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Event returned when a wallet is created
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletCreated {
    /// Address of the new wallet
    pub wallet: String,
    /// Wallet name
    pub name: String,
    /// Authorized signers
    pub signers: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Factory that creates and catalogs multisig wallets
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletFactory {
    /// Identity that deployed the factory, immutable
    owner: String,
    /// Per-signer append-only list of wallet addresses
    registry: HashMap<String, Vec<String>>,
    /// Created wallets by address
    wallets: HashMap<String, MultisigWallet>,
    /// Owner-settable global metadata
    current_system_info: String,
}

impl WalletFactory {
    /// Create a factory owned by `owner`
    pub fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            registry: HashMap::new(),
            wallets: HashMap::new(),
            current_system_info: String::new(),
        }
    }

    /// Get the factory owner
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Create a new multisig wallet and register it under every signer
    ///
    /// Open to any caller. Construction failures propagate unchanged and
    /// leave the registry untouched.
    pub fn create_multisig_wallet(
        &mut self,
        signers: Vec<String>,
        required_confirmations: u32,
        name: &str,
    ) -> Result<WalletCreated, WalletError> {
        let wallet = MultisigWallet::new(signers, required_confirmations, name)?;
        let address = wallet.address().to_string();

        for signer in wallet.signers() {
            self.registry
                .entry(signer.clone())
                .or_default()
                .push(address.clone());
        }

        let event = WalletCreated {
            wallet: address.clone(),
            name: wallet.name().to_string(),
            signers: wallet.signers().to_vec(),
            timestamp: Utc::now(),
        };

        log::info!(
            "Wallet created: {} ({}-of-{}) at {}",
            event.name,
            required_confirmations,
            event.signers.len(),
            address
        );

        self.wallets.insert(address, wallet);

        Ok(event)
    }

    /// Look up the `index`-th wallet address a signer participates in
    pub fn wallets(&self, signer: &str, index: usize) -> Result<&str, WalletError> {
        self.registry
            .get(signer)
            .and_then(|addresses| addresses.get(index))
            .map(|address| address.as_str())
            .ok_or_else(|| WalletError::NotFound(format!("wallet {} of signer {}", index, signer)))
    }

    /// All wallet addresses a signer participates in
    pub fn wallets_of(&self, signer: &str) -> &[String] {
        self.registry
            .get(signer)
            .map(|addresses| addresses.as_slice())
            .unwrap_or(&[])
    }

    /// Get a created wallet by address
    pub fn wallet(&self, address: &str) -> Option<&MultisigWallet> {
        self.wallets.get(address)
    }

    /// Get a mutable wallet by address
    pub fn wallet_mut(&mut self, address: &str) -> Option<&mut MultisigWallet> {
        self.wallets.get_mut(address)
    }

    /// Number of wallets created by this factory
    pub fn wallet_count(&self) -> usize {
        self.wallets.len()
    }

    /// Overwrite the system info string (owner only)
    pub fn set_current_system_info(&mut self, caller: &str, info: &str) -> Result<(), WalletError> {
        if caller != self.owner {
            return Err(WalletError::Unauthorized(caller.to_string()));
        }
        self.current_system_info = info.to_string();
        log::info!("System info updated by {}", caller);
        Ok(())
    }

    /// Read the system info string
    pub fn current_system_info(&self) -> &str {
        &self.current_system_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_signers() -> Vec<String> {
        vec![
            "alice".to_string(),
            "bob".to_string(),
            "carol".to_string(),
            "dave".to_string(),
            "erin".to_string(),
        ]
    }

    #[test]
    fn test_create_wallet_registers_every_signer() {
        let mut factory = WalletFactory::new("deployer");

        let event = factory
            .create_multisig_wallet(sample_signers(), 3, "My Awesome Multisig")
            .unwrap();

        for signer in sample_signers() {
            assert_eq!(factory.wallets(&signer, 0).unwrap(), event.wallet);
        }
        assert_eq!(factory.wallet_count(), 1);

        let wallet = factory.wallet(&event.wallet).unwrap();
        assert_eq!(wallet.signers(), sample_signers().as_slice());
        assert_eq!(wallet.required_confirmations(), 3);
        assert_eq!(wallet.name(), "My Awesome Multisig");
    }

    #[test]
    fn test_registry_appends_in_creation_order() {
        let mut factory = WalletFactory::new("deployer");

        let first = factory
            .create_multisig_wallet(sample_signers(), 2, "First")
            .unwrap();
        let second = factory
            .create_multisig_wallet(sample_signers(), 3, "Second")
            .unwrap();

        assert_eq!(factory.wallets("alice", 0).unwrap(), first.wallet);
        assert_eq!(factory.wallets("alice", 1).unwrap(), second.wallet);
        assert_eq!(factory.wallets_of("alice").len(), 2);
    }

    #[test]
    fn test_registry_index_out_of_range() {
        let mut factory = WalletFactory::new("deployer");
        factory
            .create_multisig_wallet(sample_signers(), 3, "W")
            .unwrap();

        assert!(matches!(
            factory.wallets("alice", 1),
            Err(WalletError::NotFound(_))
        ));
        assert!(matches!(
            factory.wallets("stranger", 0),
            Err(WalletError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_construction_leaves_registry_untouched() {
        let mut factory = WalletFactory::new("deployer");

        let result = factory.create_multisig_wallet(sample_signers(), 6, "W");
        assert!(matches!(
            result,
            Err(WalletError::InvalidConfiguration(_))
        ));
        assert_eq!(factory.wallet_count(), 0);
        assert!(factory.wallets_of("alice").is_empty());
    }

    #[test]
    fn test_system_info_owner_only() {
        let mut factory = WalletFactory::new("deployer");
        assert_eq!(factory.current_system_info(), "");

        let result = factory.set_current_system_info("mallory", "hijacked");
        assert!(matches!(result, Err(WalletError::Unauthorized(_))));
        assert_eq!(factory.current_system_info(), "");

        factory
            .set_current_system_info("deployer", "System info string")
            .unwrap();
        assert_eq!(factory.current_system_info(), "System info string");
    }
}
