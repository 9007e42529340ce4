//! `show-license` command: license details, optionally for one app.

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command as ClapCommand};

use crate::console::cli::CliState;
use crate::console::command::{base_command, CommandInfo, Execution, SchemaContext};
use crate::console::commands::helpers::{format_date, licenses_for_app};
use crate::console::commands::with_engine;
use crate::console::registry::CommandRegistry;
use crate::console::table::Table;
use crate::domain::AccountHandle;
use crate::ports::{AppId, BotEngine, LicenseInfo};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(ShowLicenseCommand));
}

struct ShowLicenseCommand;

impl CommandInfo for ShowLicenseCommand {
    fn name(&self) -> &'static str {
        "show-license"
    }

    fn description(&self) -> &'static str {
        "show licenses, or the licenses providing one app"
    }

    fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
        base_command("show-license").arg(
            Arg::new("appid")
                .value_name("appid")
                .value_parser(clap::value_parser!(u32))
                .help("only licenses granting this app"),
        )
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(ShowLicenseExecution { app: None })
    }
}

struct ShowLicenseExecution {
    app: Option<AppId>,
}

fn license_row(license: &LicenseInfo) -> Vec<String> {
    let apps: Vec<String> = license.apps.iter().map(ToString::to_string).collect();
    vec![
        license.package_id.to_string(),
        format_date(license.purchased),
        license
            .payment_method
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        apps.join(", "),
    ]
}

#[async_trait]
impl Execution for ShowLicenseExecution {
    fn init(&mut self, matches: &ArgMatches) -> bool {
        self.app = matches.get_one::<u32>("appid").map(|id| AppId(*id));
        true
    }

    async fn execute(
        &self,
        _cli: &mut CliState,
        account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        let Some(account) = account else {
            return Ok(());
        };
        let licenses =
            with_engine(account, |engine: &mut dyn BotEngine| Box::pin(async move { engine.licenses().await }))
                .await?;

        let mut table = Table::new(4);
        match self.app {
            Some(app) => {
                let matched = licenses_for_app(&licenses, app);
                if matched.is_empty() {
                    println!("{}: no license grants app {app}", account.name());
                    return Ok(());
                }
                for license in matched {
                    table.add_row(license_row(license));
                }
            }
            None => {
                if licenses.is_empty() {
                    println!("{}: no licenses", account.name());
                    return Ok(());
                }
                for license in &licenses {
                    table.add_row(license_row(license));
                }
            }
        }
        println!("{}: {} license(s)", account.name(), table.len());
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
    use crate::session::AccountSession;
    use std::time::Duration;

    #[tokio::test]
    async fn test_show_license_queries_the_session() {
        let mut registry = CommandRegistry::new();
        register(&mut registry);
        let directory = Arc::new(AccountDirectory::in_memory());
        let account = directory.create("alpha").unwrap();
        let engine = MockEngine::new().with_license(303386, vec![440]);
        let calls = engine.calls_handle();
        account.attach_session(AccountSession::spawn("alpha".into(), Box::new(engine)));

        let factory: EngineFactory =
            Arc::new(|_name: &str| Box::new(MockEngine::new()) as Box<dyn BotEngine>);
        let mut state = CliState::new(
            Arc::new(registry),
            directory,
            Launcher::new(factory),
            Duration::from_secs(2),
            Duration::from_secs(1),
        );
        state.current_account = Some(account);

        dispatch_line(&mut state, "show-license 440").await;
        assert_eq!(calls.lock().unwrap().clone(), vec!["licenses"]);
    }
}
