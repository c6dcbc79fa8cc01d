//! Keygen command - create a new account key

use anyhow::{bail, Context, Result};
use std::path::Path;
use tnb_lib::{Keypair, TnbError};

use crate::ui;

pub fn run(key_dir: &Path, name: &str, verbose: bool) -> Result<()> {
    ui::header("Generate Account Key");

    std::fs::create_dir_all(key_dir)
        .with_context(|| format!("failed to create {}", key_dir.display()))?;

    let path = super::key_path(key_dir, name);
    if verbose {
        ui::info(&format!("Writing key to {}", path.display()));
    }

    let keypair = Keypair::generate();
    match keypair.write_key_file(&path) {
        Ok(()) => {}
        Err(TnbError::KeyfileExists(_)) => {
            ui::error(&format!("Key '{}' already exists", name));
            ui::info("Pick another name with --name");
            bail!("key '{}' already exists", name);
        }
        Err(e) => return Err(e).context("failed to write key file"),
    }

    ui::success(&format!("Key '{}' created", name));
    ui::key_value("Account Number", &keypair.account_number());
    ui::key_value("Key File", &path.display().to_string());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_keygen_refuses_existing_key() {
        let dir = TempDir::new().unwrap();
        run(dir.path(), "alice", false).unwrap();
        let first = std::fs::read_to_string(crate::commands::key_path(dir.path(), "alice")).unwrap();

        let err = run(dir.path(), "alice", false).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let after = std::fs::read_to_string(crate::commands::key_path(dir.path(), "alice")).unwrap();
        assert_eq!(first, after);
    }
}
