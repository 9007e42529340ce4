//! `list-cloud` / `list-files` commands: cloud storage inspection.

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};

use crate::console::cli::CliState;
use crate::console::command::{base_command, CommandInfo, Execution, SchemaContext};
use crate::console::commands::helpers::format_bytes;
use crate::console::commands::with_engine;
use crate::console::options::OptionRegex;
use crate::console::registry::CommandRegistry;
use crate::console::table::Table;
use crate::domain::AccountHandle;
use crate::ports::{AppId, BotEngine};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(ListCloudCommand));
    registry.register(Arc::new(ListFilesCommand));
}

struct ListCloudCommand;

impl CommandInfo for ListCloudCommand {
    fn name(&self) -> &'static str {
        "list-cloud"
    }

    fn description(&self) -> &'static str {
        "list apps with cloud storage"
    }

    fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
        base_command("list-cloud")
            .arg(
                Arg::new("name")
                    .value_name("regex")
                    .value_parser(OptionRegex::parse)
                    .help("only apps whose name matches this pattern"),
            )
            .arg(
                Arg::new("size")
                    .long("size")
                    .action(ArgAction::SetTrue)
                    .help("show total storage size"),
            )
            .arg(
                Arg::new("count")
                    .long("count")
                    .action(ArgAction::SetTrue)
                    .help("show file counts"),
            )
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(ListCloudExecution {
            name: None,
            size: false,
            count: false,
        })
    }
}

struct ListCloudExecution {
    name: Option<OptionRegex>,
    size: bool,
    count: bool,
}

#[async_trait]
impl Execution for ListCloudExecution {
    fn init(&mut self, matches: &ArgMatches) -> bool {
        self.name = matches.get_one::<OptionRegex>("name").cloned();
        self.size = matches.get_flag("size");
        self.count = matches.get_flag("count");
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
        let apps =
            with_engine(account, |engine: &mut dyn BotEngine| Box::pin(async move { engine.cloud_apps().await }))
                .await?;

        let mut table = Table::new(4);
        for app in &apps {
            if let Some(pattern) = &self.name {
                if !pattern.is_match(&app.name) {
                    continue;
                }
            }
            let mut row = vec![app.app_id.to_string(), app.name.clone()];
            if self.count {
                row.push(format!("{} file(s)", app.file_count));
            }
            if self.size {
                row.push(format_bytes(app.total_bytes));
            }
            table.add_row(row);
        }

        if table.is_empty() {
            println!("{}: no cloud storage found", account.name());
        } else {
            table.sort_by_column(1);
            table.print();
        }
        Ok(())
    }
}

struct ListFilesCommand;

impl CommandInfo for ListFilesCommand {
    fn name(&self) -> &'static str {
        "list-files"
    }

    fn description(&self) -> &'static str {
        "list the cloud files of one app"
    }

    fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
        base_command("list-files").arg(
            Arg::new("appid")
                .value_name("appid")
                .value_parser(clap::value_parser!(u32))
                .help("app whose files to list; all cloud apps if omitted"),
        )
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(ListFilesExecution { app: None })
    }
}

struct ListFilesExecution {
    app: Option<AppId>,
}

impl ListFilesExecution {
    async fn list_one(&self, account: &Arc<AccountHandle>, app: AppId) -> anyhow::Result<()> {
        let result = with_engine(account, move |engine: &mut dyn BotEngine| {
            Box::pin(async move { engine.cloud_files(app).await })
        })
        .await?;

        match result {
            Ok(files) if files.is_empty() => {
                println!("{}: app {app} has no cloud files", account.name());
            }
            Ok(files) => {
                let mut table = Table::new(2);
                for file in &files {
                    table.add_row(vec![file.name.clone(), format_bytes(file.size)]);
                }
                table.sort_by_column(0);
                println!("{}: {} file(s) for app {app}", account.name(), files.len());
                table.print();
            }
            Err(error) => println!("{}: {error}", account.name()),
        }
        Ok(())
    }
}

#[async_trait]
impl Execution for ListFilesExecution {
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
        match self.app {
            Some(app) => self.list_one(account, app).await?,
            None => {
                let apps = with_engine(account, |engine: &mut dyn BotEngine| {
                    Box::pin(async move { engine.cloud_apps().await })
                })
                .await?;
                if apps.is_empty() {
                    println!("{}: no cloud storage found", account.name());
                }
                for app in apps {
                    self.list_one(account, app.app_id).await?;
                }
            }
        }
        Ok(())
    }
}
