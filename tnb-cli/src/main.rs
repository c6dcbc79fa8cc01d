//! TNB CLI
//!
//! Command-line client for managing account keys and reading bank nodes.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "tnb")]
#[command(about = "TNB CLI - manage account keys and query bank nodes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding key files
    #[arg(long, global = true)]
    key_dir: Option<String>,

    /// Bank address (falls back to TNB_BANK_ADDRESS)
    #[arg(long, global = true)]
    bank: Option<String>,

    /// Use HTTPS for the bank
    #[arg(long, global = true)]
    https: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new account key
    Keygen {
        /// Key name
        #[arg(short, long, default_value = "default")]
        name: String,
    },

    /// Show the account number of a key
    Whoami {
        /// Key name
        #[arg(short, long, default_value = "default")]
        name: String,
    },

    /// Sign a message
    Sign {
        /// Message text, signed as UTF-8
        message: String,

        /// Key name
        #[arg(short, long, default_value = "default")]
        name: String,
    },

    /// Verify a signature
    Verify {
        /// Message text
        message: String,

        /// Hex-encoded signature
        signature: String,

        /// Account number of the signer
        account: String,
    },

    /// List accounts known to the bank
    Accounts {
        /// Maximum number of accounts to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Ordering, e.g. "-trust" or "created_date"
        #[arg(short, long)]
        order: Option<String>,
    },

    /// List blocks received by the bank
    Blocks {
        /// Maximum number of blocks to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Only blocks sent by this account
        #[arg(short, long)]
        sender: Option<String>,
    },

    /// Show the bank configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("tnb_cli=debug,tnb_lib=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("tnb_cli=info,tnb_lib=warn")
            .init();
    }

    // Key directory
    let key_dir = if let Some(dir) = cli.key_dir {
        std::path::PathBuf::from(dir)
    } else {
        dirs::data_local_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("tnb")
            .join("keys")
    };
    tracing::debug!(key_dir = %key_dir.display(), "using key directory");

    // Dispatch commands
    match cli.command {
        Commands::Keygen { name } => {
            commands::keygen::run(&key_dir, &name, cli.verbose)?;
        }
        Commands::Whoami { name } => {
            commands::whoami::run(&key_dir, &name)?;
        }
        Commands::Sign { message, name } => {
            commands::sign::run(&key_dir, &name, &message)?;
        }
        Commands::Verify {
            message,
            signature,
            account,
        } => {
            commands::verify::run(&message, &signature, &account)?;
        }
        Commands::Accounts { limit, order } => {
            let config = commands::client_config(cli.bank, cli.https)?;
            commands::accounts::run(config, limit, order.as_deref(), cli.verbose).await?;
        }
        Commands::Blocks { limit, sender } => {
            let config = commands::client_config(cli.bank, cli.https)?;
            commands::blocks::run(config, limit, sender.as_deref(), cli.verbose).await?;
        }
        Commands::Config => {
            let config = commands::client_config(cli.bank, cli.https)?;
            commands::config::run(config).await?;
        }
    }

    Ok(())
}
