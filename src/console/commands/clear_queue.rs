//! `clear-queue` command: dismiss the store discovery queue.

use std::sync::Arc;

use async_trait::async_trait;

use crate::console::cli::CliState;
use crate::console::command::{CommandInfo, Execution};
use crate::console::commands::with_engine;
use crate::console::registry::CommandRegistry;
use crate::domain::AccountHandle;
use crate::ports::BotEngine;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(ClearQueueCommand));
}

struct ClearQueueCommand;

impl CommandInfo for ClearQueueCommand {
    fn name(&self) -> &'static str {
        "clear-queue"
    }

    fn description(&self) -> &'static str {
        "clear the account's discovery queue"
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(ClearQueueExecution)
    }
}

struct ClearQueueExecution;

#[async_trait]
impl Execution for ClearQueueExecution {
    async fn execute(
        &self,
        _cli: &mut CliState,
        account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        let Some(account) = account else {
            return Ok(());
        };
        let result = with_engine(account, |engine: &mut dyn BotEngine| {
            Box::pin(async move { engine.clear_discovery_queue().await })
        })
        .await?;

        match result {
            Ok(cleared) => println!("{}: cleared {cleared} queue entries", account.name()),
            Err(error) => println!("{}: {error}", account.name()),
        }
        Ok(())
    }
}
