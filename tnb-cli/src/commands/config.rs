//! Config command - show the bank configuration

use anyhow::Result;
use tnb_lib::ClientConfig;

use crate::ui;

pub async fn run(config: ClientConfig) -> Result<()> {
    let bank = super::connect(config).await?;
    let node = bank.config();

    ui::header("Bank");
    ui::key_value("Node Identifier", &node.node_identifier);
    ui::key_value("Account Number", &node.account_number);
    ui::key_value("Address", bank.client().base_url());
    ui::key_value("Version", &node.version);
    ui::key_value("Transaction Fee", &node.default_transaction_fee.to_string());

    match &node.primary_validator {
        Some(validator) => {
            ui::header("Primary Validator");
            ui::key_value("Node Identifier", &validator.node_identifier);
            ui::key_value("Address", &validator.address());
            ui::key_value("Transaction Fee", &validator.default_transaction_fee.to_string());
            ui::key_value("Trust", &format!("{:.2}", validator.trust));
        }
        None => ui::info("No primary validator configured"),
    }

    Ok(())
}
