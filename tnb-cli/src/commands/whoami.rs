//! Whoami command - show the account number of a key

use anyhow::Result;
use std::path::Path;

use crate::ui;

pub fn run(key_dir: &Path, name: &str) -> Result<()> {
    match super::load_keypair(key_dir, name) {
        Ok(keypair) => {
            ui::header("Account");
            ui::key_value("Name", name);
            ui::key_value("Account Number", &keypair.account_number());
        }
        Err(_) => {
            ui::error(&format!("No key named '{}'", name));
            ui::info("Run 'tnb keygen' to create one");
        }
    }

    Ok(())
}
