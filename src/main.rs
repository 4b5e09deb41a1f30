//! Bundle Vault CLI
//!
//! Command-line interface for sealing secrets and driving the bundle
//! pipeline against a simulated sink.

use bundle_vault::observers::{AuditLogObserver, Observers, TracingObserver};
use bundle_vault::sink::SimulatedSink;
use bundle_vault::vault::generate_strong_password;
use bundle_vault::wallet::{OperationKind, SealedWallet, WalletOperation};
use bundle_vault::{
    BundleScheduler, Config, EncryptedSecret, Error, Result, SecretVault, SubmissionSink,
    PRIVATE_KEY_ENV, VAULT_PASSWORD_ENV,
};
use clap::{Parser, Subcommand};
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bundle-vault")]
#[command(about = "Password-sealed key vault and paced bundle submission")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a secret under a password
    Encrypt {
        /// Secret to encrypt (read from stdin if omitted)
        #[arg(long)]
        plaintext: Option<String>,

        /// Password (defaults to $BUNDLE_VAULT_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Decrypt a sealed secret
    Decrypt {
        /// Sealed secret JSON file (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Password (defaults to $BUNDLE_VAULT_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Seal the private key in $PRIVATE_KEY as a wallet record
    SealWallet {
        /// Wallet label
        #[arg(short, long)]
        label: String,

        /// Public address of the wallet
        #[arg(long)]
        public_key: String,

        /// Password (defaults to $BUNDLE_VAULT_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Generate a strong random password
    Password,

    /// Push wallet operations through the scheduler with a simulated sink
    Simulate {
        /// Number of wallets
        #[arg(short, long, default_value_t = 3)]
        wallets: usize,

        /// Operations per wallet
        #[arg(short, long, default_value_t = 4)]
        ops: usize,

        /// Operation kind
        #[arg(short, long, value_enum, default_value_t = OperationKind::Buy)]
        kind: OperationKind,

        /// Token mint/address
        #[arg(long, default_value = "So11111111111111111111111111111111111111112")]
        token: String,

        /// Amount in base units
        #[arg(long, default_value = "1000000")]
        amount: String,

        /// Write every run event to stdout as JSONL
        #[arg(long)]
        audit: bool,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let registry = tracing_subscriber::registry().with(filter);
    if cli.log_json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }

    // Load config
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Encrypt {
            plaintext,
            password,
        } => {
            let vault = SecretVault::new(&config.vault)?;
            let plaintext = match plaintext {
                Some(p) => SecretString::from(p),
                None => SecretString::from(read_input(None)?.trim_end().to_string()),
            };
            let sealed = vault.encrypt_secret(plaintext.expose_secret(), &resolve_password(password)?)?;
            println!("{}", serde_json::to_string_pretty(&sealed)?);
        }
        Commands::Decrypt { input, password } => {
            let vault = SecretVault::new(&config.vault)?;
            let sealed: EncryptedSecret = serde_json::from_str(&read_input(input)?)?;
            let plaintext = vault.decrypt_secret(&sealed, &resolve_password(password)?)?;
            println!("{}", plaintext.expose_secret());
        }
        Commands::SealWallet {
            label,
            public_key,
            password,
        } => {
            let vault = SecretVault::new(&config.vault)?;
            let private_key = std::env::var(PRIVATE_KEY_ENV)
                .map(SecretString::from)
                .map_err(|_| Error::Config(format!("{} is not set", PRIVATE_KEY_ENV)))?;
            let wallet = SealedWallet::seal(
                &vault,
                label,
                public_key,
                &private_key,
                &resolve_password(password)?,
            )?;
            println!("{}", serde_json::to_string_pretty(&wallet)?);
        }
        Commands::Password => {
            println!("{}", generate_strong_password().expose_secret());
        }
        Commands::Simulate {
            wallets,
            ops,
            kind,
            token,
            amount,
            audit,
        } => {
            run_simulate(config, wallets, ops, kind, token, amount, audit).await?;
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

/// `--password` wins over the environment
fn resolve_password(password: Option<String>) -> Result<SecretString> {
    password
        .or_else(|| std::env::var(VAULT_PASSWORD_ENV).ok())
        .map(SecretString::from)
        .ok_or_else(|| {
            Error::Config(format!(
                "no password given: pass --password or set {}",
                VAULT_PASSWORD_ENV
            ))
        })
}

fn read_input(path: Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(path)?),
        _ => Ok(std::io::read_to_string(std::io::stdin())?),
    }
}

async fn run_simulate(
    config: Config,
    wallets: usize,
    per_wallet: usize,
    kind: OperationKind,
    token: String,
    amount: String,
    audit: bool,
) -> Result<()> {
    config.validate()?;

    let sink = Arc::new(SimulatedSink::new(&config.simulation));
    let mut observers = Observers::new().with(TracingObserver);
    if audit {
        observers = observers.with(AuditLogObserver::new(std::io::stdout()));
    }

    let scheduler = BundleScheduler::new(sink.clone() as Arc<dyn SubmissionSink<WalletOperation>>)
        .with_observers(observers);

    // Ctrl-C stops the run after the bundle in flight
    let cancel = scheduler.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling run");
            cancel.cancel();
        }
    });

    let labels: Vec<String> = (1..=wallets).map(|i| format!("wallet_{}", i)).collect();
    let operations = WalletOperation::fan_out(&labels, per_wallet, kind, &token, &amount);

    tracing::info!(
        wallets,
        per_wallet,
        kind = kind.name(),
        bundle_size = config.bundles.bundle_size,
        "Starting simulation"
    );

    let summary = scheduler.run(operations, &config.bundles).await?;
    tracing::info!(accepted = sink.accepted(), "Simulated sink finished");

    if !audit {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
