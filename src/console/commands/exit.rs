//! `EXIT` command: leave command mode and request process shutdown.

use std::sync::Arc;

use async_trait::async_trait;

use crate::console::cli::CliState;
use crate::console::command::{CommandInfo, Execution};
use crate::console::registry::CommandRegistry;
use crate::domain::AccountHandle;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(ExitCommand));
}

struct ExitCommand;

impl CommandInfo for ExitCommand {
    fn name(&self) -> &'static str {
        "EXIT"
    }

    fn description(&self) -> &'static str {
        "shut the whole process down"
    }

    fn global(&self) -> bool {
        true
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(ExitExecution)
    }
}

struct ExitExecution;

#[async_trait]
impl Execution for ExitExecution {
    async fn execute(
        &self,
        cli: &mut CliState,
        _account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        cli.quit = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::cli::{EngineFactory, Launcher};
    use crate::console::dispatch::dispatch_line;
    use crate::domain::AccountDirectory;
    use crate::ports::mocks::MockEngine;
    use crate::ports::BotEngine;
    use std::time::Duration;

    #[tokio::test]
    async fn test_exit_sets_quit_flag() {
        let mut registry = CommandRegistry::new();
        register(&mut registry);
        let factory: EngineFactory =
            Arc::new(|_name: &str| Box::new(MockEngine::new()) as Box<dyn BotEngine>);
        let mut state = CliState::new(
            Arc::new(registry),
            Arc::new(AccountDirectory::in_memory()),
            Launcher::new(factory),
            Duration::from_secs(2),
            Duration::from_secs(1),
        );

        dispatch_line(&mut state, "EXIT").await;
        assert!(state.quit);
    }
}
