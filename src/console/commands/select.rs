//! `select` command: change the current account.

use std::sync::Arc;

use async_trait::async_trait;

use crate::console::cli::CliState;
use crate::console::command::{CommandInfo, Execution};
use crate::console::registry::CommandRegistry;
use crate::domain::AccountHandle;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(SelectCommand));
}

struct SelectCommand;

impl CommandInfo for SelectCommand {
    fn name(&self) -> &'static str {
        "select"
    }

    fn description(&self) -> &'static str {
        "make the targeted account the current one"
    }

    fn needs_session(&self) -> bool {
        false
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(SelectExecution)
    }
}

struct SelectExecution;

#[async_trait]
impl Execution for SelectExecution {
    async fn execute(
        &self,
        cli: &mut CliState,
        account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        if let Some(account) = account {
            cli.current_account = Some(Arc::clone(account));
            println!("selected \"{}\"", account.name());
        }
        Ok(())
    }
}
