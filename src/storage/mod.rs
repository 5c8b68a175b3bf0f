//! System state persistence
//!
//! Saves the factory, the native ledger and the token registry as one JSON
//! document so CLI invocations operate on durable state.

pub mod persistence;

pub use persistence::{Storage, StorageConfig, StorageError, SystemState};
