//! `status` command: one line per configured account.

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
    registry.register(Arc::new(StatusCommand));
}

struct StatusCommand;

impl CommandInfo for StatusCommand {
    fn name(&self) -> &'static str {
        "status"
    }

    fn description(&self) -> &'static str {
        "list all accounts and their session state"
    }

    fn global(&self) -> bool {
        true
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(StatusExecution)
    }
}

struct StatusExecution;

#[async_trait]
impl Execution for StatusExecution {
    async fn execute(
        &self,
        cli: &mut CliState,
        _account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        let accounts = cli.directory.accounts();
        if accounts.is_empty() {
            println!("no accounts configured");
            return Ok(());
        }

        let mut table = Table::new(3);
        for account in &accounts {
            let detail = if account.is_running() {
                match with_engine(account, |engine: &mut dyn BotEngine| {
                    Box::pin(async move { (engine.login_status(), engine.playing().len()) })
                })
                .await
                {
                    Ok((status, playing)) if playing > 0 => {
                        format!("{status}, playing {playing} game(s)")
                    }
                    Ok((status, _)) => status.to_string(),
                    Err(_) => "stopping".to_string(),
                }
            } else {
                String::new()
            };

            let state = if account.is_running() { "running" } else { "stopped" };
            table.add_row(vec![account.name().to_string(), state.to_string(), detail]);
        }
        table.print();
        Ok(())
    }
}
