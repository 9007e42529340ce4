//! `list-tradeoffers` command.

use std::sync::Arc;

use async_trait::async_trait;

use crate::console::cli::CliState;
use crate::console::command::{CommandInfo, Execution};
use crate::console::commands::with_engine;
use crate::console::registry::CommandRegistry;
use crate::console::table::Table;
use crate::domain::AccountHandle;
use crate::ports::BotEngine;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(ListTradeOffersCommand));
}

struct ListTradeOffersCommand;

impl CommandInfo for ListTradeOffersCommand {
    fn name(&self) -> &'static str {
        "list-tradeoffers"
    }

    fn description(&self) -> &'static str {
        "list pending trade offers"
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(ListTradeOffersExecution)
    }
}

struct ListTradeOffersExecution;

#[async_trait]
impl Execution for ListTradeOffersExecution {
    async fn execute(
        &self,
        _cli: &mut CliState,
        account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        let Some(account) = account else {
            return Ok(());
        };
        let offers =
            with_engine(account, |engine: &mut dyn BotEngine| Box::pin(async move { engine.trade_offers().await }))
                .await?;

        if offers.is_empty() {
            println!("{}: no pending trade offers", account.name());
            return Ok(());
        }

        let mut table = Table::new(4);
        for offer in &offers {
            table.add_row(vec![
                offer.id.to_string(),
                offer.direction.to_string(),
                offer.partner.clone(),
                format!("give {} / receive {}", offer.items_to_give, offer.items_to_receive),
            ]);
        }
        println!("{}: {} trade offer(s)", account.name(), offers.len());
        table.print();
        Ok(())
    }
}
