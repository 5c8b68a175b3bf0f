//! quorum-wallet CLI
//!
//! Command-line interface for creating multisig wallets and driving their
//! propose/sign/execute lifecycle against persisted state.

use clap::{Parser, Subcommand};
use quorum_wallet::cli::{self, AppState};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "quorum-wallet")]
#[command(version = "0.1.0")]
#[command(about = "M-of-N multisig wallets with quorum-triggered transfers", long_about = None)]
struct Cli {
    /// Data directory for persisted state
    #[arg(short, long, default_value = ".quorum_wallet")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize system state with a factory owner
    Init {
        /// Account that owns the wallet factory
        #[arg(long)]
        owner: String,

        /// Discard any existing state
        #[arg(long)]
        force: bool,
    },

    /// Credit an account with native currency
    Deposit {
        /// Account to credit (may be a wallet address)
        #[arg(long)]
        account: String,

        #[arg(long)]
        amount: u128,
    },

    /// Show an account's native balance
    Balance {
        #[arg(long)]
        account: String,
    },

    /// Token operations
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },

    /// Wallet and factory operations
    Wallet {
        #[command(subcommand)]
        action: WalletCommands,
    },

    /// Transaction operations
    Tx {
        #[command(subcommand)]
        action: TxCommands,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Deploy a new mintable token
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        symbol: String,
    },

    /// Mint token supply to a holder
    Mint {
        /// Token address
        #[arg(long)]
        token: String,

        #[arg(long)]
        to: String,

        #[arg(long)]
        amount: u128,
    },

    /// Show a holder's token balance
    Balance {
        #[arg(long)]
        token: String,

        #[arg(long)]
        holder: String,
    },
}

#[derive(Subcommand)]
enum WalletCommands {
    /// Create a multisig wallet through the factory
    Create {
        /// Authorized signers (repeat for each)
        #[arg(long = "signer", required = true)]
        signers: Vec<String>,

        /// Confirmations required to execute a transaction
        #[arg(long)]
        required: u32,

        #[arg(long)]
        name: String,
    },

    /// List the wallets a signer participates in
    List {
        #[arg(long)]
        signer: String,
    },

    /// Show a wallet and its transactions
    Show {
        /// Wallet address
        address: String,
    },

    /// Set the factory system info string (owner only)
    SetInfo {
        /// Acting principal
        #[arg(long)]
        from: String,

        #[arg(long)]
        info: String,
    },

    /// Show the factory system info string
    Info,
}

#[derive(Subcommand)]
enum TxCommands {
    /// Propose an outgoing transfer (signers only)
    Propose {
        /// Wallet address
        #[arg(long)]
        wallet: String,

        /// Acting principal
        #[arg(long)]
        from: String,

        #[arg(long)]
        receiver: String,

        /// Token address; omit for a native-currency transfer
        #[arg(long)]
        token: Option<String>,

        #[arg(long)]
        amount: u128,
    },

    /// Confirm a transaction; executes it when quorum is reached
    Sign {
        #[arg(long)]
        wallet: String,

        #[arg(long)]
        from: String,

        /// Transaction id
        #[arg(long)]
        id: u64,
    },

    /// Withdraw a confirmation
    Unsign {
        #[arg(long)]
        wallet: String,

        #[arg(long)]
        from: String,

        #[arg(long)]
        id: u64,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> cli::CliResult<()> {
    match cli.command {
        Commands::Init { owner, force } => {
            return cli::commands::cmd_init(cli.data_dir, &owner, force);
        }
        command => {
            let mut state = AppState::load(cli.data_dir)?;

            match command {
                Commands::Init { .. } => unreachable!(),
                Commands::Deposit { account, amount } => {
                    cli::commands::cmd_deposit(&mut state, &account, amount)?;
                }
                Commands::Balance { account } => {
                    cli::commands::cmd_balance(&state, &account)?;
                }
                Commands::Token { action } => match action {
                    TokenCommands::Create { name, symbol } => {
                        cli::commands::cmd_token_create(&mut state, &name, &symbol)?;
                    }
                    TokenCommands::Mint { token, to, amount } => {
                        cli::commands::cmd_token_mint(&mut state, &token, &to, amount)?;
                    }
                    TokenCommands::Balance { token, holder } => {
                        cli::commands::cmd_token_balance(&state, &token, &holder)?;
                    }
                },
                Commands::Wallet { action } => match action {
                    WalletCommands::Create {
                        signers,
                        required,
                        name,
                    } => {
                        cli::commands::cmd_wallet_create(&mut state, signers, required, &name)?;
                    }
                    WalletCommands::List { signer } => {
                        cli::commands::cmd_wallet_list(&state, &signer)?;
                    }
                    WalletCommands::Show { address } => {
                        cli::commands::cmd_wallet_show(&state, &address)?;
                    }
                    WalletCommands::SetInfo { from, info } => {
                        cli::commands::cmd_set_info(&mut state, &from, &info)?;
                    }
                    WalletCommands::Info => {
                        cli::commands::cmd_info(&state)?;
                    }
                },
                Commands::Tx { action } => match action {
                    TxCommands::Propose {
                        wallet,
                        from,
                        receiver,
                        token,
                        amount,
                    } => {
                        cli::commands::cmd_tx_propose(
                            &mut state, &wallet, &from, &receiver, token, amount,
                        )?;
                    }
                    TxCommands::Sign { wallet, from, id } => {
                        cli::commands::cmd_tx_sign(&mut state, &wallet, &from, id)?;
                    }
                    TxCommands::Unsign { wallet, from, id } => {
                        cli::commands::cmd_tx_unsign(&mut state, &wallet, &from, id)?;
                    }
                },
            }

            state.save()?;
        }
    }

    Ok(())
}
