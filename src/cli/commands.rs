//! CLI commands for quorum wallets
//!
//! Every invocation loads the persisted system state, applies one operation
//! and saves the state back. Mutating commands take the acting principal
//! explicitly via `--from`; there is no ambient caller identity.

use crate::storage::{Storage, StorageConfig, SystemState};
use std::path::PathBuf;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state: persisted system state plus its storage
pub struct AppState {
    pub state: SystemState,
    pub storage: Storage,
}

impl AppState {
    /// Load previously initialized state
    pub fn load(data_dir: PathBuf) -> CliResult<Self> {
        let storage = Storage::new(StorageConfig {
            data_dir,
            ..Default::default()
        })?;

        if !storage.exists() {
            return Err("no state found; run `quorum-wallet init --owner <account>` first".into());
        }

        let state = storage.load()?;
        Ok(Self { state, storage })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.state)?;
        Ok(())
    }
}

/// Initialize a new system state
pub fn cmd_init(data_dir: PathBuf, owner: &str, force: bool) -> CliResult<()> {
    let storage = Storage::new(StorageConfig {
        data_dir: data_dir.clone(),
        ..Default::default()
    })?;

    if storage.exists() && !force {
        println!("State already exists at {:?}", data_dir);
        println!("Use --force to reinitialize (this discards existing data)");
        return Ok(());
    }

    let state = SystemState::new(owner);
    storage.save(&state)?;

    println!("Initialized quorum-wallet state");
    println!("   Data directory: {:?}", data_dir);
    println!("   Factory owner:  {}", owner);

    Ok(())
}

/// Credit an account with native currency
pub fn cmd_deposit(state: &mut AppState, account: &str, amount: u128) -> CliResult<()> {
    state.state.native.deposit(account, amount);
    println!(
        "Deposited {} to {} (balance: {})",
        amount,
        account,
        state.state.native.balance_of(account)
    );
    Ok(())
}

/// Show an account's native balance
pub fn cmd_balance(state: &AppState, account: &str) -> CliResult<()> {
    println!("{}: {}", account, state.state.native.balance_of(account));
    Ok(())
}

/// Deploy a new token
pub fn cmd_token_create(state: &mut AppState, name: &str, symbol: &str) -> CliResult<()> {
    let address = state.state.tokens.create_token(name, symbol);
    println!("Token {} ({}) deployed at {}", name, symbol, address);
    Ok(())
}

/// Mint token supply to a holder
pub fn cmd_token_mint(state: &mut AppState, token: &str, to: &str, amount: u128) -> CliResult<()> {
    let token = state
        .state
        .tokens
        .get_mut(token)
        .ok_or_else(|| format!("no token at {}", token))?;
    token.mint(to, amount);
    println!("Minted {} {} to {}", amount, token.symbol, to);
    Ok(())
}

/// Show a holder's token balance
pub fn cmd_token_balance(state: &AppState, token: &str, holder: &str) -> CliResult<()> {
    let token = state
        .state
        .tokens
        .get(token)
        .ok_or_else(|| format!("no token at {}", token))?;
    println!("{}: {} {}", holder, token.balance_of(holder), token.symbol);
    Ok(())
}

/// Create a multisig wallet through the factory
pub fn cmd_wallet_create(
    state: &mut AppState,
    signers: Vec<String>,
    required: u32,
    name: &str,
) -> CliResult<()> {
    let event = state
        .state
        .factory
        .create_multisig_wallet(signers, required, name)?;

    println!("Wallet \"{}\" created", event.name);
    println!("   Address:  {}", event.wallet);
    println!(
        "   Quorum:   {}-of-{}",
        required,
        event.signers.len()
    );
    println!("   Signers:  {}", event.signers.join(", "));

    Ok(())
}

/// List the wallets a signer participates in
pub fn cmd_wallet_list(state: &AppState, signer: &str) -> CliResult<()> {
    let wallets = state.state.factory.wallets_of(signer);
    if wallets.is_empty() {
        println!("{} participates in no wallets", signer);
        return Ok(());
    }

    println!("Wallets of {}:", signer);
    for (index, address) in wallets.iter().enumerate() {
        match state.state.factory.wallet(address) {
            Some(wallet) => println!(
                "   [{}] {} \"{}\" ({}-of-{})",
                index,
                address,
                wallet.name(),
                wallet.required_confirmations(),
                wallet.signers().len()
            ),
            None => println!("   [{}] {}", index, address),
        }
    }

    Ok(())
}

/// Show a wallet and its transactions
pub fn cmd_wallet_show(state: &AppState, address: &str) -> CliResult<()> {
    let wallet = state
        .state
        .factory
        .wallet(address)
        .ok_or_else(|| format!("no wallet at {}", address))?;

    println!("Wallet \"{}\" at {}", wallet.name(), wallet.address());
    println!(
        "   Quorum:   {}-of-{}",
        wallet.required_confirmations(),
        wallet.signers().len()
    );
    println!("   Signers:  {}", wallet.signers().join(", "));
    println!(
        "   Balance:  {}",
        state.state.native.balance_of(wallet.address())
    );
    println!("   Transactions: {}", wallet.tx_count());

    for tx in wallet.transactions() {
        let asset = tx.token_address.as_deref().unwrap_or("native");
        let status = if tx.executed {
            "executed".to_string()
        } else {
            format!(
                "{}/{} confirmations",
                tx.confirmation_count(),
                wallet.required_confirmations()
            )
        };
        println!(
            "   [{}] {} {} -> {} ({})",
            tx.id, tx.amount, asset, tx.receiver, status
        );
    }

    Ok(())
}

/// Set the factory's system info string (owner only)
pub fn cmd_set_info(state: &mut AppState, from: &str, info: &str) -> CliResult<()> {
    state.state.factory.set_current_system_info(from, info)?;
    println!("System info set");
    Ok(())
}

/// Show the factory's system info string
pub fn cmd_info(state: &AppState) -> CliResult<()> {
    println!("{}", state.state.factory.current_system_info());
    Ok(())
}

/// Propose an outgoing transfer from a wallet
pub fn cmd_tx_propose(
    state: &mut AppState,
    wallet: &str,
    from: &str,
    receiver: &str,
    token: Option<String>,
    amount: u128,
) -> CliResult<()> {
    let wallet = state
        .state
        .factory
        .wallet_mut(wallet)
        .ok_or_else(|| format!("no wallet at {}", wallet))?;

    let event = wallet.create_transaction(from, receiver, token, amount)?;

    let asset = event.token_address.as_deref().unwrap_or("native");
    println!(
        "Transaction {} proposed: {} {} -> {}",
        event.tx_id, event.amount, asset, event.receiver
    );

    Ok(())
}

/// Confirm a transaction, executing it if quorum is reached
pub fn cmd_tx_sign(state: &mut AppState, wallet: &str, from: &str, tx_id: u64) -> CliResult<()> {
    let SystemState {
        factory,
        native,
        tokens,
    } = &mut state.state;

    let wallet = factory
        .wallet_mut(wallet)
        .ok_or_else(|| format!("no wallet at {}", wallet))?;
    let required = wallet.required_confirmations();

    let tx = wallet.sign_transaction(from, tx_id, native, tokens)?;

    if tx.executed {
        println!(
            "Transaction {} confirmed by {} and executed ({} -> {})",
            tx_id, from, tx.amount, tx.receiver
        );
    } else {
        println!(
            "Transaction {} confirmed by {} ({}/{})",
            tx_id,
            from,
            tx.confirmation_count(),
            required
        );
    }

    Ok(())
}

/// Withdraw a confirmation from a transaction
pub fn cmd_tx_unsign(state: &mut AppState, wallet: &str, from: &str, tx_id: u64) -> CliResult<()> {
    let wallet = state
        .state
        .factory
        .wallet_mut(wallet)
        .ok_or_else(|| format!("no wallet at {}", wallet))?;

    let tx = wallet.unsign_transaction(from, tx_id)?;
    println!(
        "Transaction {} unconfirmed by {} ({} left)",
        tx_id,
        from,
        tx.confirmation_count()
    );

    Ok(())
}
