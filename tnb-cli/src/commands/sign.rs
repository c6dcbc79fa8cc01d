//! Sign command - sign a message with a stored key

use anyhow::Result;
use std::path::Path;

pub fn run(key_dir: &Path, name: &str, message: &str) -> Result<()> {
    let keypair = super::load_keypair(key_dir, name)?;
    println!("{}", keypair.sign_hex(message.as_bytes()));
    Ok(())
}
