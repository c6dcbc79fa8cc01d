//! Verify command - check a signature against an account number

use anyhow::{bail, Result};
use tnb_lib::Keypair;

use crate::ui;

pub fn run(message: &str, signature: &str, account: &str) -> Result<()> {
    match Keypair::verify_hex(message.as_bytes(), signature.trim(), account) {
        Ok(()) => {
            ui::success("Signature is valid");
            Ok(())
        }
        Err(e) if e.is_keysign() => {
            ui::error(&e.to_string());
            bail!("verification failed")
        }
        Err(e) => Err(e.into()),
    }
}
