//! Message Signer CLI
//!
//! Command-line interface for signing messages with a wallet and verifying
//! signed messages.

use clap::{Parser, Subcommand};
use message_signer::audit::{AuditLog, Operation};
use message_signer::wallet::EnvWalletProvider;
use message_signer::{Config, Error, Result, VerifyResult, WalletSession};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "msg-signer")]
#[command(about = "Sign messages with a wallet and verify signed messages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect the wallet and print its address
    Address,

    /// Sign a message with the connected wallet
    Sign {
        /// Message to sign
        #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
        message: Option<String>,

        /// Read the message to sign from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Verify a signed message (reads stdin when no input is given)
    Verify {
        /// Path to the signed message JSON
        #[arg(short, long, conflicts_with = "json")]
        input: Option<PathBuf>,

        /// Signed message JSON given inline
        #[arg(long)]
        json: Option<String>,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let audit = config.audit_log_path.as_ref().map(AuditLog::new);

    match cli.command {
        Commands::Address => run_address(&config, audit.as_ref()).await,
        Commands::Sign { message, file } => {
            let message = match (message, file) {
                (Some(message), _) => message,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => {
                    return Err(Error::MalformedInput("No message given".to_string()));
                }
            };
            run_sign(&config, audit.as_ref(), &message).await
        }
        Commands::Verify { input, json } => {
            let text = match (input, json) {
                (_, Some(json)) => json,
                (Some(path), None) => std::fs::read_to_string(path)?,
                (None, None) => std::io::read_to_string(std::io::stdin())?,
            };
            run_verify(audit.as_ref(), &text).await
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn new_session(config: &Config) -> WalletSession {
    let provider = EnvWalletProvider::new(config.wallet.private_key_env.clone());
    tracing::debug!(var = provider.var_name(), "Using wallet key from environment");
    WalletSession::new(Arc::new(provider))
}

async fn run_address(config: &Config, audit: Option<&AuditLog>) -> Result<ExitCode> {
    let mut session = new_session(config);

    let outcome = session.connect().await;
    if let Some(audit) = audit {
        audit
            .record(Operation::Connect, session.current_address(), &outcome, "success")
            .await;
    }

    println!("{}", outcome?.to_checksum(None));
    Ok(ExitCode::SUCCESS)
}

async fn run_sign(config: &Config, audit: Option<&AuditLog>, message: &str) -> Result<ExitCode> {
    let mut session = new_session(config);

    let outcome = match session.ensure_connected().await {
        Ok(_) => message_signer::sign(&session, message).await,
        Err(e) => Err(e),
    };
    if let Some(audit) = audit {
        audit
            .record(Operation::Sign, session.current_address(), &outcome, "success")
            .await;
    }

    let signed = outcome?;
    println!("{}", signed.to_json_pretty(config.export.indent)?);
    Ok(ExitCode::SUCCESS)
}

async fn run_verify(audit: Option<&AuditLog>, text: &str) -> Result<ExitCode> {
    let outcome = message_signer::verify_json(text);

    if let Some(audit) = audit {
        let (address, status) = match &outcome {
            Ok(VerifyResult::Valid { recovered }) => (Some(*recovered), "valid"),
            Ok(VerifyResult::Mismatch { claimed, .. }) => (Some(*claimed), "mismatch"),
            Err(_) => (None, "error"),
        };
        audit.record(Operation::Verify, address, &outcome, status).await;
    }

    let result = outcome?;
    tracing::info!(recovered = %result.recovered(), valid = result.is_valid(), "Verification complete");
    println!("{}", result.notice());

    Ok(if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
