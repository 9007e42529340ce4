//! `launch` command: bring a configured account's session up.

use std::sync::Arc;

use async_trait::async_trait;

use crate::console::cli::CliState;
use crate::console::command::{CommandInfo, Execution};
use crate::console::registry::CommandRegistry;
use crate::domain::AccountHandle;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(LaunchCommand));
}

struct LaunchCommand;

impl CommandInfo for LaunchCommand {
    fn name(&self) -> &'static str {
        "launch"
    }

    fn description(&self) -> &'static str {
        "start the session of a stopped account"
    }

    // Launch has to reach accounts that are not running yet.
    fn needs_session(&self) -> bool {
        false
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(LaunchExecution)
    }
}

struct LaunchExecution;

#[async_trait]
impl Execution for LaunchExecution {
    async fn execute(
        &self,
        cli: &mut CliState,
        account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        let Some(account) = account else {
            return Ok(());
        };
        if cli.launcher.launch(account) {
            println!("launched \"{}\"", account.name());
            cli.current_account = Some(Arc::clone(account));
            println!("current account is now \"{}\"", account.name());
        } else {
            println!("\"{}\" is already running", account.name());
        }
        Ok(())
    }
}
