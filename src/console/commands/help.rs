//! `help` command: list every command, or show one command's usage.

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command as ClapCommand};

use crate::console::cli::CliState;
use crate::console::command::{base_command, print_usage, CommandInfo, Execution, SchemaContext};
use crate::console::registry::CommandRegistry;
use crate::console::table::Table;
use crate::domain::AccountHandle;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(HelpCommand));
}

struct HelpCommand;

impl CommandInfo for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }

    fn description(&self) -> &'static str {
        "show all commands, or the usage of one command"
    }

    fn global(&self) -> bool {
        true
    }

    fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
        base_command("help").arg(Arg::new("command").value_name("command").help("command to describe"))
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(HelpExecution { command: None })
    }
}

struct HelpExecution {
    command: Option<String>,
}

#[async_trait]
impl Execution for HelpExecution {
    fn init(&mut self, matches: &ArgMatches) -> bool {
        self.command = matches.get_one::<String>("command").cloned();
        true
    }

    async fn execute(
        &self,
        cli: &mut CliState,
        _account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        let ctx = SchemaContext {
            directory: Arc::clone(&cli.directory),
        };

        match &self.command {
            Some(name) => match cli.registry.find(name) {
                Some(command) => {
                    println!("{}", command.description());
                    print_usage(command.as_ref(), &ctx);
                }
                None => {
                    println!("unknown command: \"{name}\"");
                    cli.registry.print_listing();
                }
            },
            None => {
                let mut table = Table::new(2);
                for command in cli.registry.iter() {
                    table.add_row(vec![
                        command.name().to_string(),
                        command.description().to_string(),
                    ]);
                }
                table.print();
            }
        }
        Ok(())
    }
}
