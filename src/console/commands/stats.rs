//! `stats` command: aggregate library and inventory numbers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::console::cli::CliState;
use crate::console::command::{CommandInfo, Execution};
use crate::console::commands::helpers::format_playtime;
use crate::console::commands::with_engine;
use crate::console::registry::CommandRegistry;
use crate::domain::AccountHandle;
use crate::ports::BotEngine;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(StatsCommand));
}

struct StatsCommand;

impl CommandInfo for StatsCommand {
    fn name(&self) -> &'static str {
        "stats"
    }

    fn description(&self) -> &'static str {
        "summarize the account's library and inventory"
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(StatsExecution)
    }
}

struct StatsExecution;

#[async_trait]
impl Execution for StatsExecution {
    async fn execute(
        &self,
        _cli: &mut CliState,
        account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        let Some(account) = account else {
            return Ok(());
        };
        let (games, licenses, items) = with_engine(account, |engine: &mut dyn BotEngine| {
            Box::pin(async move {
                let games = engine.owned_games().await;
                let licenses = engine.licenses().await;
                let items = engine.inventory().await;
                (games, licenses, items)
            })
        })
        .await?;

        let total_playtime: u32 = games.iter().map(|game| game.playtime_minutes).sum();
        let played = games.iter().filter(|game| game.playtime_minutes > 0).count();
        let farmable = games.iter().filter(|game| game.cards_remaining > 0).count();
        let tradable = items.iter().filter(|item| item.tradable).count();

        println!("{}:", account.name());
        println!("   games    : {} ({played} played)", games.len());
        println!("   playtime : {}", format_playtime(total_playtime));
        println!("   farmable : {farmable}");
        println!("   licenses : {}", licenses.len());
        println!("   items    : {} ({tradable} tradable)", items.len());
        Ok(())
    }
}
