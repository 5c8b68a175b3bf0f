//! JSON persistence for the whole system state
//!
//! Writes go to a temporary file first and are moved into place with an
//! atomic rename, so a crash mid-save never corrupts the stored state.

use crate::factory::WalletFactory;
use crate::ledger::{NativeLedger, TokenRegistry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufReader, BufWriter};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Everything the CLI persists between invocations
#[derive(Debug, Serialize, Deserialize)]
pub struct SystemState {
    pub factory: WalletFactory,
    pub native: NativeLedger,
    pub tokens: TokenRegistry,
}

impl SystemState {
    /// Fresh state with a factory owned by `owner`
    pub fn new(owner: &str) -> Self {
        Self {
            factory: WalletFactory::new(owner),
            native: NativeLedger::new(),
            tokens: TokenRegistry::new(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: std::path::PathBuf,
    pub state_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: std::path::PathBuf::from(".quorum_wallet"),
            state_file: "state.json".to_string(),
        }
    }
}

/// System state storage manager
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager, ensuring the data directory exists
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self, StorageError> {
        Self::new(StorageConfig::default())
    }

    /// Get the state file path
    fn state_path(&self) -> std::path::PathBuf {
        self.config.data_dir.join(&self.config.state_file)
    }

    /// Whether state has been saved before
    pub fn exists(&self) -> bool {
        self.state_path().exists()
    }

    /// Save the system state to disk
    pub fn save(&self, state: &SystemState) -> Result<(), StorageError> {
        let temp_path = self.config.data_dir.join("state.tmp");
        let file = fs::File::create(&temp_path)?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, state)?;

        // Atomic rename
        fs::rename(&temp_path, self.state_path())?;

        log::debug!("State saved to {:?}", self.state_path());

        Ok(())
    }

    /// Load the system state from disk
    pub fn load(&self) -> Result<SystemState, StorageError> {
        let path = self.state_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "state file not found".to_string(),
            ));
        }

        let file = fs::File::open(&path)?;
        let reader = BufReader::new(file);
        let state = serde_json::from_reader(reader)?;

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_in(dir: &TempDir) -> Storage {
        Storage::new(StorageConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        let mut state = SystemState::new("deployer");
        state.native.deposit("alice", 100);
        let token = state.tokens.create_token("Simple Token", "STK");
        state.tokens.get_mut(&token).unwrap().mint("alice", 7);
        let event = state
            .factory
            .create_multisig_wallet(
                vec!["alice".to_string(), "bob".to_string()],
                2,
                "Treasury",
            )
            .unwrap();

        assert!(!storage.exists());
        storage.save(&state).unwrap();
        assert!(storage.exists());

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.factory.owner(), "deployer");
        assert_eq!(loaded.native.balance_of("alice"), 100);
        assert_eq!(loaded.tokens.get(&token).unwrap().balance_of("alice"), 7);

        let wallet = loaded.factory.wallet(&event.wallet).unwrap();
        assert_eq!(wallet.name(), "Treasury");
        assert_eq!(wallet.required_confirmations(), 2);
    }

    #[test]
    fn test_load_missing_state_fails() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        assert!(matches!(
            storage.load(),
            Err(StorageError::InvalidData(_))
        ));
    }

    #[test]
    fn test_pending_confirmations_survive_reload() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        let mut state = SystemState::new("deployer");
        let signers: Vec<String> = ["alice", "bob", "carol"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let event = state
            .factory
            .create_multisig_wallet(signers, 3, "Treasury")
            .unwrap();
        state.native.deposit(&event.wallet, 10);

        {
            let wallet = state.factory.wallet_mut(&event.wallet).unwrap();
            wallet.create_transaction("alice", "recv", None, 4).unwrap();
        }
        let SystemState {
            factory,
            native,
            tokens,
        } = &mut state;
        factory
            .wallet_mut(&event.wallet)
            .unwrap()
            .sign_transaction("alice", 1, native, tokens)
            .unwrap();

        storage.save(&state).unwrap();
        let mut loaded = storage.load().unwrap();

        // The partially confirmed transaction picks up where it left off
        let SystemState {
            factory,
            native,
            tokens,
        } = &mut loaded;
        let wallet = factory.wallet_mut(&event.wallet).unwrap();
        assert_eq!(wallet.transaction(1).unwrap().confirmation_count(), 1);
        wallet.sign_transaction("bob", 1, native, tokens).unwrap();
        wallet.sign_transaction("carol", 1, native, tokens).unwrap();
        assert!(wallet.transaction(1).unwrap().executed);
        assert_eq!(native.balance_of("recv"), 4);
    }
}
