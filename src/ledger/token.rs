//! Fungible token support
//!
//! Defines the [`FungibleAsset`] capability that wallets dispatch token
//! transfers through, a mintable [`SimpleToken`] reference implementation,
//! and a [`TokenRegistry`] that deploys tokens under generated addresses.

use crate::ledger::native::AssetError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Capability interface every token provider implements
///
/// A wallet dispatching a token transfer depends only on this trait, not on
/// any concrete token type.
pub trait FungibleAsset {
    /// Move `amount` of this asset from `from` to `to`
    fn transfer(&mut self, from: &str, to: &str, amount: u128) -> Result<(), AssetError>;

    /// Read the holdings of `holder`
    fn balance_of(&self, holder: &str) -> u128;
}

/// Resolves a token address to its asset provider
pub trait AssetResolver {
    /// Look up the asset deployed at `address`, if any
    fn asset_mut(&mut self, address: &str) -> Option<&mut dyn FungibleAsset>;
}

/// A mintable fungible token
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimpleToken {
    /// Token address within the registry
    pub address: String,
    /// Token name (e.g. "Simple Token")
    pub name: String,
    /// Token symbol (e.g. "STK")
    pub symbol: String,
    /// Balances: holder -> amount
    balances: HashMap<String, u128>,
}

impl SimpleToken {
    /// Create a token with no holders
    pub fn new(address: String, name: String, symbol: String) -> Self {
        Self {
            address,
            name,
            symbol,
            balances: HashMap::new(),
        }
    }

    /// Mint new supply to a holder
    pub fn mint(&mut self, to: &str, amount: u128) {
        *self.balances.entry(to.to_string()).or_insert(0) += amount;
        log::debug!("Minted {} {} to {}", amount, self.symbol, to);
    }

    /// Get the holdings of `holder` (zero if never seen)
    pub fn balance_of(&self, holder: &str) -> u128 {
        *self.balances.get(holder).unwrap_or(&0)
    }

    /// Move tokens between holders
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

impl FungibleAsset for SimpleToken {
    fn transfer(&mut self, from: &str, to: &str, amount: u128) -> Result<(), AssetError> {
        SimpleToken::transfer(self, from, to, amount)
    }

    fn balance_of(&self, holder: &str) -> u128 {
        SimpleToken::balance_of(self, holder)
    }
}

/// Registry of deployed tokens, keyed by address
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TokenRegistry {
    /// All tokens by address
    tokens: HashMap<String, SimpleToken>,
    /// Deployment counter for address generation
    nonce: u64,
}

impl TokenRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tokens: HashMap::new(),
            nonce: 0,
        }
    }

    /// Deploy a new token and return its address
    pub fn create_token(&mut self, name: &str, symbol: &str) -> String {
        let address = self.generate_address(symbol);
        self.nonce += 1;

        let token = SimpleToken::new(address.clone(), name.to_string(), symbol.to_string());
        self.tokens.insert(address.clone(), token);

        log::info!("Token created: {} ({}) at {}", name, symbol, address);

        address
    }

    /// Generate a token address from symbol and deployment nonce
    fn generate_address(&self, symbol: &str) -> String {
        let input = format!("token:{}:{}", symbol, self.nonce);
        let hash = Sha256::digest(input.as_bytes());
        format!("0x{}", &hex::encode(hash)[..40])
    }

    /// Get a token by address
    pub fn get(&self, address: &str) -> Option<&SimpleToken> {
        self.tokens.get(address)
    }

    /// Get a mutable token by address
    pub fn get_mut(&mut self, address: &str) -> Option<&mut SimpleToken> {
        self.tokens.get_mut(address)
    }

    /// Get token count
    pub fn count(&self) -> usize {
        self.tokens.len()
    }

    /// List all tokens
    pub fn list(&self) -> Vec<&SimpleToken> {
        self.tokens.values().collect()
    }
}

impl AssetResolver for TokenRegistry {
    fn asset_mut(&mut self, address: &str) -> Option<&mut dyn FungibleAsset> {
        self.tokens
            .get_mut(address)
            .map(|t| t as &mut dyn FungibleAsset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_and_transfer() {
        let mut token = SimpleToken::new("0xTEST".to_string(), "Test".to_string(), "TST".into());

        token.mint("alice", 1000);
        assert_eq!(token.balance_of("alice"), 1000);

        token.transfer("alice", "bob", 300).unwrap();
        assert_eq!(token.balance_of("alice"), 700);
        assert_eq!(token.balance_of("bob"), 300);
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let mut token = SimpleToken::new("0xTEST".to_string(), "Test".to_string(), "TST".into());
        token.mint("alice", 100);

        let result = token.transfer("alice", "bob", 101);
        assert!(matches!(
            result,
            Err(AssetError::InsufficientBalance { .. })
        ));
        assert_eq!(token.balance_of("alice"), 100);
    }

    #[test]
    fn test_registry_deploys_unique_addresses() {
        let mut registry = TokenRegistry::new();

        let a = registry.create_token("Token A", "TKA");
        let b = registry.create_token("Token B", "TKA");

        assert_ne!(a, b);
        assert_eq!(registry.count(), 2);
        assert!(a.starts_with("0x"));
        assert_eq!(a.len(), 42);
    }

    #[test]
    fn test_registry_resolves_assets() {
        let mut registry = TokenRegistry::new();
        let address = registry.create_token("Token", "TKN");

        registry.get_mut(&address).unwrap().mint("alice", 50);

        let asset = registry.asset_mut(&address).unwrap();
        asset.transfer("alice", "bob", 20).unwrap();
        assert_eq!(asset.balance_of("bob"), 20);

        assert!(registry.asset_mut("0xmissing").is_none());
    }
}
