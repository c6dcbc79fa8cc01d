//! Accounts command - list accounts known to the bank

use anyhow::{bail, Result};
use tnb_lib::ordering::{AccountOrder, Ordering};
use tnb_lib::{ClientConfig, ListOptions, PaginatedIterator, TnbError};

use crate::ui;

fn parse_order(order: Option<&str>) -> Result<AccountOrder> {
    let Some(order) = order else {
        return Ok(AccountOrder::default());
    };

    match AccountOrder::from_query(order) {
        Some(order) => Ok(order),
        None => {
            let choices: Vec<&str> = AccountOrder::ALL.iter().map(|o| o.as_query()).collect();
            bail!("unknown ordering '{}', expected one of: {}", order, choices.join(", "))
        }
    }
}

pub async fn run(config: ClientConfig, limit: usize, order: Option<&str>, verbose: bool) -> Result<()> {
    let ordering = parse_order(order)?;
    let bank = super::connect(config).await?;

    ui::header(&format!("Accounts ({})", ordering));
    let mut accounts = bank.fetch_accounts(
        ListOptions::default()
            .with_ordering(ordering)
            .with_limit(limit),
    );

    let mut shown = 0;
    loop {
        match accounts.next().await {
            Ok(account) => {
                shown += 1;
                ui::row(shown, &account.account_number, &format!("trust {:.2}", account.trust));
            }
            Err(TnbError::IteratorEmpty) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if shown == 0 {
        ui::info("No accounts");
    }
    if verbose {
        ui::info(&format!("{} requests sent", bank.client().request_count()));
    }

    Ok(())
}
