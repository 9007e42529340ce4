//! `add-license` / `add-app` commands: license activation.
//!
//! `add-license` paces successive package activations on the same account,
//! since the remote side rate-limits bulk activation.

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command as ClapCommand};

use crate::console::cli::CliState;
use crate::console::command::{base_command, CommandInfo, Execution, SchemaContext};
use crate::console::commands::with_engine;
use crate::console::registry::CommandRegistry;
use crate::domain::AccountHandle;
use crate::ports::{AppId, BotEngine, PackageId};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(AddLicenseCommand));
    registry.register(Arc::new(AddAppCommand));
}

struct AddLicenseCommand;

impl CommandInfo for AddLicenseCommand {
    fn name(&self) -> &'static str {
        "add-license"
    }

    fn description(&self) -> &'static str {
        "activate one or more license packages"
    }

    fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
        base_command("add-license").arg(
            Arg::new("packageid")
                .value_name("packageid")
                .num_args(1..)
                .required(true)
                .value_parser(clap::value_parser!(u32))
                .help("package ids to activate"),
        )
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(AddLicenseExecution { packages: Vec::new() })
    }
}

struct AddLicenseExecution {
    packages: Vec<PackageId>,
}

#[async_trait]
impl Execution for AddLicenseExecution {
    fn init(&mut self, matches: &ArgMatches) -> bool {
        self.packages = matches
            .get_many::<u32>("packageid")
            .into_iter()
            .flatten()
            .map(|id| PackageId(*id))
            .collect();
        !self.packages.is_empty()
    }

    async fn execute(
        &self,
        cli: &mut CliState,
        account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        let Some(account) = account else {
            return Ok(());
        };
        for (index, package) in self.packages.clone().into_iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(cli.license_delay).await;
            }
            let result = with_engine(account, move |engine: &mut dyn BotEngine| {
                Box::pin(async move { engine.add_license(package).await })
            })
            .await?;

            match result {
                Ok(()) => println!("{}: added package {package}", account.name()),
                Err(error) => println!("{}: package {package}: {error}", account.name()),
            }
        }
        Ok(())
    }
}

struct AddAppCommand;

impl CommandInfo for AddAppCommand {
    fn name(&self) -> &'static str {
        "add-app"
    }

    fn description(&self) -> &'static str {
        "request free licenses for one or more apps"
    }

    fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
        base_command("add-app").arg(
            Arg::new("appid")
                .value_name("appid")
                .num_args(1..)
                .required(true)
                .value_parser(clap::value_parser!(u32))
                .help("app ids to request"),
        )
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(AddAppExecution { apps: Vec::new() })
    }
}

struct AddAppExecution {
    apps: Vec<AppId>,
}

#[async_trait]
impl Execution for AddAppExecution {
    fn init(&mut self, matches: &ArgMatches) -> bool {
        self.apps = matches
            .get_many::<u32>("appid")
            .into_iter()
            .flatten()
            .map(|id| AppId(*id))
            .collect();
        !self.apps.is_empty()
    }

    async fn execute(
        &self,
        _cli: &mut CliState,
        account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        let Some(account) = account else {
            return Ok(());
        };
        for app in self.apps.clone() {
            let result = with_engine(account, move |engine: &mut dyn BotEngine| {
                Box::pin(async move { engine.add_app(app).await })
            })
            .await?;

            match result {
                Ok(packages) => {
                    let granted: Vec<String> =
                        packages.iter().map(ToString::to_string).collect();
                    println!(
                        "{}: app {app} granted package(s) {}",
                        account.name(),
                        granted.join(", ")
                    );
                }
                Err(error) => println!("{}: app {app}: {error}", account.name()),
            }
        }
        Ok(())
    }
}
