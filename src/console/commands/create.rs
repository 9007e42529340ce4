//! `create` command: add a new account and select it.

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command as ClapCommand};

use crate::console::cli::CliState;
use crate::console::command::{base_command, CommandInfo, Execution, SchemaContext};
use crate::console::registry::CommandRegistry;
use crate::domain::AccountHandle;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(CreateCommand));
}

struct CreateCommand;

impl CommandInfo for CreateCommand {
    fn name(&self) -> &'static str {
        "create"
    }

    fn description(&self) -> &'static str {
        "create a new account and make it the current one"
    }

    fn global(&self) -> bool {
        true
    }

    fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
        base_command("create").arg(
            Arg::new("accountname")
                .value_name("accountname")
                .required(true)
                .help("name of the account to create"),
        )
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(CreateExecution {
            name: String::new(),
        })
    }
}

struct CreateExecution {
    name: String,
}

#[async_trait]
impl Execution for CreateExecution {
    fn init(&mut self, matches: &ArgMatches) -> bool {
        match matches.get_one::<String>("accountname") {
            Some(name) => {
                self.name = name.clone();
                true
            }
            None => false,
        }
    }

    async fn execute(
        &self,
        cli: &mut CliState,
        _account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        match cli.directory.create(&self.name) {
            Some(account) => {
                println!("created account \"{}\"", account.name());
                cli.launcher.launch(&account);
                cli.current_account = Some(account);
                println!("current account is now \"{}\"", self.name);
            }
            None => println!("account \"{}\" already exists", self.name),
        }
        Ok(())
    }
}
