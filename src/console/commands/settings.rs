//! `set` command: per-account settings.
//!
//! Without arguments it lists the account's stored settings. With a name and
//! a value it stores one setting; name and value must be given together,
//! which the schema alone cannot express, so `init` enforces it.

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command as ClapCommand};

use crate::console::cli::CliState;
use crate::console::command::{base_command, CommandInfo, Execution, SchemaContext};
use crate::console::registry::CommandRegistry;
use crate::console::table::Table;
use crate::domain::AccountHandle;

const KNOWN_SETTINGS: [&str; 4] = ["idle-playtime", "auto-accept-trades", "farm-order", "locale"];

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(SetCommand));
}

struct SetCommand;

impl CommandInfo for SetCommand {
    fn name(&self) -> &'static str {
        "set"
    }

    fn description(&self) -> &'static str {
        "show or change the account's settings"
    }

    // Settings live in the data file, not the session.
    fn needs_session(&self) -> bool {
        false
    }

    fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
        base_command("set")
            .arg(Arg::new("name").value_name("name").help("setting to change"))
            .arg(Arg::new("value").value_name("value").help("new value"))
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(SetExecution { change: None })
    }
}

struct SetExecution {
    change: Option<(String, String)>,
}

#[async_trait]
impl Execution for SetExecution {
    fn init(&mut self, matches: &ArgMatches) -> bool {
        let name = matches.get_one::<String>("name").cloned();
        let value = matches.get_one::<String>("value").cloned();
        match (name, value) {
            (Some(name), Some(value)) => {
                self.change = Some((name, value));
                true
            }
            (None, None) => true,
            // Name and value must be given together, or neither.
            _ => false,
        }
    }

    async fn execute(
        &self,
        _cli: &mut CliState,
        account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        let Some(account) = account else {
            return Ok(());
        };
        match &self.change {
            Some((name, value)) => {
                if !KNOWN_SETTINGS.contains(&name.as_str()) {
                    println!("{}: unknown setting \"{name}\"", account.name());
                    return Ok(());
                }
                let name = name.clone();
                let value = value.clone();
                account.update_data(move |data| {
                    data.settings.insert(name, value);
                    true
                })?;
                println!("{}: setting stored", account.name());
            }
            None => {
                let settings = account.settings();
                if settings.is_empty() {
                    println!("{}: no settings stored", account.name());
                    return Ok(());
                }
                let mut table = Table::new(2);
                for (name, value) in settings {
                    table.add_row(vec![name, value]);
                }
                println!("{}:", account.name());
                table.print();
            }
        }
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

    fn state(directory: Arc<AccountDirectory>) -> CliState {
        let mut registry = CommandRegistry::new();
        register(&mut registry);
        let factory: EngineFactory =
            Arc::new(|_name: &str| Box::new(MockEngine::new()) as Box<dyn BotEngine>);
        CliState::new(
            Arc::new(registry),
            directory,
            Launcher::new(factory),
            Duration::from_secs(2),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn test_set_stores_known_setting() {
        let directory = Arc::new(AccountDirectory::in_memory());
        let account = directory.create("alpha").unwrap();
        let mut state = state(Arc::clone(&directory));
        state.current_account = Some(Arc::clone(&account));

        dispatch_line(&mut state, "set idle-playtime 30").await;
        assert_eq!(account.settings().get("idle-playtime").map(String::as_str), Some("30"));
    }

    #[tokio::test]
    async fn test_set_rejects_unknown_setting() {
        let directory = Arc::new(AccountDirectory::in_memory());
        let account = directory.create("alpha").unwrap();
        let mut state = state(Arc::clone(&directory));
        state.current_account = Some(Arc::clone(&account));

        dispatch_line(&mut state, "set frobnicate yes").await;
        assert!(account.settings().is_empty());
    }

    #[tokio::test]
    async fn test_name_without_value_is_a_usage_error() {
        let directory = Arc::new(AccountDirectory::in_memory());
        let account = directory.create("alpha").unwrap();
        let mut state = state(Arc::clone(&directory));
        state.current_account = Some(Arc::clone(&account));

        dispatch_line(&mut state, "set idle-playtime").await;
        assert!(account.settings().is_empty());
    }
}
