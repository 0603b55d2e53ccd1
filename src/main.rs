use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use aedc::deploy::{ConfigError, DeployConfig};
use aedc::identity::{IdentityError, Keypair};
use aedc::ledger::{Amount, TokenError, TokenLedger};
use aedc::snapshot::{LedgerSnapshot, SnapshotError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("refusing to overwrite {} (pass --force)", .0.display())]
    LedgerExists(PathBuf),
}

#[derive(Parser)]
#[command(
    name = "aedc",
    version,
    about = "AED Coin ledger tooling: owner-gated mint/burn over a JSON ledger file"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate an Ed25519 keypair and write sk.hex / pk.hex
    Keygen {
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Create a fresh ledger owned by the given account
    Init {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        ledger: PathBuf,
        #[arg(long)]
        force: bool,
    },
    /// Mint new units to an account (owner only)
    Mint {
        #[arg(long)]
        ledger: PathBuf,
        /// Secret key of the caller; the caller account is derived from it
        #[arg(long)]
        sk_hex: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: Amount,
    },
    /// Burn units held by an account (owner only)
    Burn {
        #[arg(long)]
        ledger: PathBuf,
        /// Secret key of the caller; the caller account is derived from it
        #[arg(long)]
        sk_hex: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        amount: Amount,
    },
    /// Print an account balance (0 for unseen accounts)
    Balance {
        #[arg(long)]
        ledger: PathBuf,
        #[arg(long)]
        account: String,
    },
    /// Print the total supply
    Supply {
        #[arg(long)]
        ledger: PathBuf,
    },
    /// Recompute and check the ledger snapshot digest
    Verify {
        #[arg(long)]
        ledger: PathBuf,
    },
    /// Deployment configuration helpers
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write a starter deployment configuration
    Init {
        #[arg(long)]
        out: PathBuf,
    },
    /// Validate an existing deployment configuration
    Check { path: PathBuf },
}

fn load_ledger(path: &Path) -> Result<TokenLedger, CliError> {
    Ok(LedgerSnapshot::load(path)?.into_ledger()?)
}

fn store_ledger(state: &TokenLedger, path: &Path) -> Result<(), CliError> {
    Ok(LedgerSnapshot::capture(state).save(path)?)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Keygen { out_dir } => {
            let kp = Keypair::generate();
            kp.write_files(&out_dir)?;
            println!(
                "keypair written → {} (account {})",
                out_dir.display(),
                kp.account_id()
            );
        }
        Command::Init {
            owner,
            ledger,
            force,
        } => {
            if ledger.exists() && !force {
                return Err(CliError::LedgerExists(ledger));
            }
            let state = TokenLedger::new(owner);
            store_ledger(&state, &ledger)?;
            println!(
                "ledger created → {} (owner {})",
                ledger.display(),
                state.owner()
            );
        }
        Command::Mint {
            ledger,
            sk_hex,
            to,
            amount,
        } => {
            let mut state = load_ledger(&ledger)?;
            let caller = Keypair::from_secret_hex(&sk_hex)?.account_id();
            state.mint(&caller, &to, amount)?;
            store_ledger(&state, &ledger)?;
            println!(
                "minted {amount} → {to} (balance {}, supply {})",
                state.balance_of(&to),
                state.total_supply()
            );
        }
        Command::Burn {
            ledger,
            sk_hex,
            from,
            amount,
        } => {
            let mut state = load_ledger(&ledger)?;
            let caller = Keypair::from_secret_hex(&sk_hex)?.account_id();
            state.burn(&caller, &from, amount)?;
            store_ledger(&state, &ledger)?;
            println!(
                "burned {amount} ← {from} (balance {}, supply {})",
                state.balance_of(&from),
                state.total_supply()
            );
        }
        Command::Balance { ledger, account } => {
            let state = load_ledger(&ledger)?;
            println!("{}", state.balance_of(&account));
        }
        Command::Supply { ledger } => {
            let state = load_ledger(&ledger)?;
            println!("{}", state.total_supply());
        }
        Command::Verify { ledger } => {
            load_ledger(&ledger)?;
            println!("verify: OK (digest & supply match)");
        }
        Command::Config(ConfigCommand::Init { out }) => {
            DeployConfig::template().save(&out)?;
            println!("config written → {}", out.display());
        }
        Command::Config(ConfigCommand::Check { path }) => {
            let config = DeployConfig::load(&path)?;
            config.validate()?;
            println!("config: OK ({} networks)", config.networks.len());
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        process::exit(2);
    }
}
