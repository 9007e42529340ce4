//! `quit` command: stop one account's session.

use std::sync::Arc;

use async_trait::async_trait;

use crate::console::cli::CliState;
use crate::console::command::{CommandInfo, Execution};
use crate::console::registry::CommandRegistry;
use crate::domain::AccountHandle;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(QuitCommand));
}

struct QuitCommand;

impl CommandInfo for QuitCommand {
    fn name(&self) -> &'static str {
        "quit"
    }

    fn description(&self) -> &'static str {
        "stop the targeted account's session"
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(QuitExecution)
    }
}

struct QuitExecution;

#[async_trait]
impl Execution for QuitExecution {
    async fn execute(
        &self,
        cli: &mut CliState,
        account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        let Some(account) = account else {
            return Ok(());
        };
        if let Some(session) = account.session() {
            session.stop().await;
        }
        account.detach_session();
        cli.deselect(account);
        println!("stopped \"{}\"", account.name());
        Ok(())
    }
}
