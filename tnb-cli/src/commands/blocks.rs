//! Blocks command - list blocks received by the bank

use anyhow::Result;
use tnb_lib::{ClientConfig, ListOptions, PaginatedIterator, TnbError};

use crate::ui;

pub async fn run(config: ClientConfig, limit: usize, sender: Option<&str>, verbose: bool) -> Result<()> {
    let bank = super::connect(config).await?;

    ui::header("Blocks");
    let mut blocks = bank.fetch_blocks(ListOptions::default().with_limit(limit), sender)?;

    let mut shown = 0;
    let mut rejected = 0;
    loop {
        match blocks.next().await {
            Ok(block) => {
                shown += 1;
                let detail = match &block.message {
                    Some(message) => format!("{} txs, signature ok", message.txs.len()),
                    None => format!("from {}", block.sender),
                };
                ui::row(shown, &block.id, &detail);
            }
            Err(TnbError::IteratorEmpty) => break,
            Err(e @ TnbError::SignatureVerifyFailed(_)) => {
                rejected += 1;
                ui::error(&format!("Skipping block: {}", e));
            }
            Err(e) => return Err(e.into()),
        }
    }

    if shown == 0 && rejected == 0 {
        ui::info("No blocks");
    }
    if verbose || rejected > 0 {
        ui::info(&format!("{} shown, {} failed verification", shown, rejected));
    }

    Ok(())
}
