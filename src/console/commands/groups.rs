//! Group management commands.
//!
//! `create-group`, `add-group` and `remove-group` edit membership lists kept
//! in each member's data file; `list-groups` shows every group and its
//! members. A leading `@` on the group argument is accepted and stripped, so
//! the same spelling works here and in target prefixes.

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command as ClapCommand};

use crate::console::cli::CliState;
use crate::console::command::{base_command, CommandInfo, Execution, SchemaContext};
use crate::console::options::{bot_name_parser, BotName};
use crate::console::registry::CommandRegistry;
use crate::console::table::Table;
use crate::domain::AccountHandle;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(ChangeGroupCommand { mode: ChangeMode::Create }));
    registry.register(Arc::new(ChangeGroupCommand { mode: ChangeMode::Add }));
    registry.register(Arc::new(ChangeGroupCommand { mode: ChangeMode::Remove }));
    registry.register(Arc::new(ListGroupsCommand));
}

#[derive(Clone, Copy, PartialEq)]
enum ChangeMode {
    Create,
    Add,
    Remove,
}

struct ChangeGroupCommand {
    mode: ChangeMode,
}

impl CommandInfo for ChangeGroupCommand {
    fn name(&self) -> &'static str {
        match self.mode {
            ChangeMode::Create => "create-group",
            ChangeMode::Add => "add-group",
            ChangeMode::Remove => "remove-group",
        }
    }

    fn description(&self) -> &'static str {
        match self.mode {
            ChangeMode::Create => "create a group with the given member accounts",
            ChangeMode::Add => "add accounts to an existing group",
            ChangeMode::Remove => "remove accounts from a group",
        }
    }

    fn global(&self) -> bool {
        true
    }

    fn schema(&self, ctx: &SchemaContext) -> ClapCommand {
        base_command(self.name())
            .arg(
                Arg::new("group")
                    .value_name("group")
                    .required(true)
                    .help("group name, with or without a leading @"),
            )
            .arg(
                Arg::new("account")
                    .value_name("account")
                    .num_args(1..)
                    .required(true)
                    .value_parser(bot_name_parser(Arc::clone(&ctx.directory)))
                    .help("member accounts"),
            )
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(ChangeGroupExecution {
            mode: self.mode,
            group: String::new(),
            accounts: Vec::new(),
        })
    }
}

struct ChangeGroupExecution {
    mode: ChangeMode,
    group: String,
    accounts: Vec<BotName>,
}

#[async_trait]
impl Execution for ChangeGroupExecution {
    fn init(&mut self, matches: &ArgMatches) -> bool {
        let Some(group) = matches.get_one::<String>("group") else {
            return false;
        };
        self.group = group.trim_start_matches('@').to_string();
        if self.group.is_empty() || self.group == "*" {
            return false;
        }
        self.accounts = matches
            .get_many::<BotName>("account")
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        !self.accounts.is_empty()
    }

    async fn execute(
        &self,
        cli: &mut CliState,
        _account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        let group = &self.group;
        let exists = cli.directory.group_names().iter().any(|name| name == group);
        match self.mode {
            ChangeMode::Create if exists => {
                println!("group \"{group}\" already exists");
                return Ok(());
            }
            ChangeMode::Add | ChangeMode::Remove if !exists => {
                println!("group \"{group}\" not found");
                return Ok(());
            }
            _ => {}
        }

        for member in &self.accounts {
            let account = &member.0;
            let changed = match self.mode {
                ChangeMode::Create | ChangeMode::Add => account.update_data(|data| {
                    if data.groups.iter().any(|name| name == group) {
                        return false;
                    }
                    data.groups.push(group.clone());
                    true
                })?,
                ChangeMode::Remove => account.update_data(|data| {
                    let before = data.groups.len();
                    data.groups.retain(|name| name != group);
                    data.groups.len() != before
                })?,
            };

            match (self.mode, changed) {
                (ChangeMode::Remove, true) => {
                    println!("removed \"{}\" from group \"{group}\"", account.name())
                }
                (ChangeMode::Remove, false) => {
                    println!("\"{}\" is not in group \"{group}\"", account.name())
                }
                (_, true) => println!("added \"{}\" to group \"{group}\"", account.name()),
                (_, false) => {
                    println!("\"{}\" is already in group \"{group}\"", account.name())
                }
            }
        }
        Ok(())
    }
}

struct ListGroupsCommand;

impl CommandInfo for ListGroupsCommand {
    fn name(&self) -> &'static str {
        "list-groups"
    }

    fn description(&self) -> &'static str {
        "list every group and its members"
    }

    fn global(&self) -> bool {
        true
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(ListGroupsExecution)
    }
}

struct ListGroupsExecution;

#[async_trait]
impl Execution for ListGroupsExecution {
    async fn execute(
        &self,
        cli: &mut CliState,
        _account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        let names = cli.directory.group_names();
        if names.is_empty() {
            println!("no groups defined");
            return Ok(());
        }

        let mut table = Table::new(2);
        for name in names {
            let members: Vec<String> = cli
                .directory
                .group(&name)
                .iter()
                .map(|account| account.name().to_string())
                .collect();
            table.add_row(vec![format!("@{name}"), members.join(", ")]);
        }
        table.print();
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
    async fn test_create_then_add_then_remove() {
        let directory = Arc::new(AccountDirectory::in_memory());
        directory.create("alpha");
        directory.create("bravo");
        let mut state = state(Arc::clone(&directory));

        dispatch_line(&mut state, "create-group farmers alpha").await;
        assert!(directory.find("alpha").unwrap().in_group("farmers"));

        dispatch_line(&mut state, "add-group @farmers bravo").await;
        assert!(directory.find("bravo").unwrap().in_group("farmers"));

        dispatch_line(&mut state, "remove-group farmers alpha bravo").await;
        assert!(directory.group_names().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_missing_group_is_rejected() {
        let directory = Arc::new(AccountDirectory::in_memory());
        directory.create("alpha");
        let mut state = state(Arc::clone(&directory));

        dispatch_line(&mut state, "add-group ghosts alpha").await;
        assert!(!directory.find("alpha").unwrap().in_group("ghosts"));
    }

    #[tokio::test]
    async fn test_create_existing_group_is_rejected() {
        let directory = Arc::new(AccountDirectory::in_memory());
        directory.create("alpha");
        directory.create("bravo");
        let mut state = state(Arc::clone(&directory));

        dispatch_line(&mut state, "create-group farmers alpha").await;
        dispatch_line(&mut state, "create-group farmers bravo").await;
        assert!(!directory.find("bravo").unwrap().in_group("farmers"));
    }
}
