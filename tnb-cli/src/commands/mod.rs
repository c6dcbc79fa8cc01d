//! CLI command implementations

pub mod accounts;
pub mod blocks;
pub mod config;
pub mod keygen;
pub mod sign;
pub mod verify;
pub mod whoami;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use tnb_lib::{Bank, ClientConfig, Keypair};

use crate::ui;

/// Get the path of the key file called `name`
pub fn key_path(key_dir: &Path, name: &str) -> PathBuf {
    key_dir.join(format!("{}.key", name))
}

/// Load the key called `name`
pub fn load_keypair(key_dir: &Path, name: &str) -> anyhow::Result<Keypair> {
    let path = key_path(key_dir, name);
    Keypair::load(&path).with_context(|| format!("failed to load key '{}'", name))
}

/// Build the bank configuration from flags, falling back to the environment
pub fn client_config(bank: Option<String>, https: bool) -> anyhow::Result<ClientConfig> {
    let config = match bank {
        Some(address) => ClientConfig::new(address),
        None => match ClientConfig::from_env() {
            Some(config) => config,
            None => bail!("no bank address: pass --bank or set TNB_BANK_ADDRESS"),
        },
    };

    Ok(if https { config.with_https(true) } else { config })
}

/// Connect to the bank, showing a spinner while waiting
pub async fn connect(config: ClientConfig) -> anyhow::Result<Bank> {
    let address = config.base_url();
    let spinner = ui::spinner(&format!("Connecting to {}...", address));
    let bank = Bank::connect(config).await;
    spinner.finish_and_clear();

    bank.with_context(|| format!("failed to connect to {}", address))
}
