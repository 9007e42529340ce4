//! `list-inventory` / `send-inventory` commands.

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};

use crate::console::cli::CliState;
use crate::console::command::{base_command, CommandInfo, Execution, SchemaContext};
use crate::console::commands::with_engine;
use crate::console::options::{bot_name_parser, BotName, OptionRegex};
use crate::console::registry::CommandRegistry;
use crate::console::table::Table;
use crate::domain::AccountHandle;
use crate::ports::BotEngine;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(ListInventoryCommand));
    registry.register(Arc::new(SendInventoryCommand));
}

struct ListInventoryCommand;

impl CommandInfo for ListInventoryCommand {
    fn name(&self) -> &'static str {
        "list-inventory"
    }

    fn description(&self) -> &'static str {
        "list the account's inventory items"
    }

    fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
        base_command("list-inventory")
            .arg(
                Arg::new("tradable")
                    .long("tradable")
                    .action(ArgAction::SetTrue)
                    .help("only tradable items"),
            )
            .arg(
                Arg::new("items")
                    .long("items")
                    .value_name("regex")
                    .value_parser(OptionRegex::parse)
                    .help("only items whose name matches this pattern"),
            )
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(ListInventoryExecution {
            tradable: false,
            items: None,
        })
    }
}

struct ListInventoryExecution {
    tradable: bool,
    items: Option<OptionRegex>,
}

#[async_trait]
impl Execution for ListInventoryExecution {
    fn init(&mut self, matches: &ArgMatches) -> bool {
        self.tradable = matches.get_flag("tradable");
        self.items = matches.get_one::<OptionRegex>("items").cloned();
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
        let items =
            with_engine(account, |engine: &mut dyn BotEngine| Box::pin(async move { engine.inventory().await }))
                .await?;

        let mut table = Table::new(4);
        for item in &items {
            if self.tradable && !item.tradable {
                continue;
            }
            if let Some(pattern) = &self.items {
                if !pattern.is_match(&item.name) {
                    continue;
                }
            }
            table.add_row(vec![
                item.name.clone(),
                item.item_type.clone(),
                format!("x{}", item.amount),
                if item.tradable { "tradable" } else { "" }.to_string(),
            ]);
        }

        if table.is_empty() {
            println!("{}: no matching items", account.name());
        } else {
            table.sort_by_column(0);
            println!("{}: {} item(s)", account.name(), table.len());
            table.print();
        }
        Ok(())
    }
}

struct SendInventoryCommand;

impl CommandInfo for SendInventoryCommand {
    fn name(&self) -> &'static str {
        "send-inventory"
    }

    fn description(&self) -> &'static str {
        "offer all tradable items to another account"
    }

    fn schema(&self, ctx: &SchemaContext) -> ClapCommand {
        base_command("send-inventory").arg(
            Arg::new("recipient")
                .value_name("recipient")
                .required(true)
                .value_parser(bot_name_parser(Arc::clone(&ctx.directory)))
                .help("account that receives the trade offer"),
        )
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(SendInventoryExecution { recipient: None })
    }
}

struct SendInventoryExecution {
    recipient: Option<BotName>,
}

#[async_trait]
impl Execution for SendInventoryExecution {
    fn init(&mut self, matches: &ArgMatches) -> bool {
        self.recipient = matches.get_one::<BotName>("recipient").cloned();
        self.recipient.is_some()
    }

    async fn execute(
        &self,
        _cli: &mut CliState,
        account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()> {
        let (Some(account), Some(recipient)) = (account, &self.recipient) else {
            return Ok(());
        };
        if recipient.name() == account.name() {
            println!("{}: cannot send inventory to itself", account.name());
            return Ok(());
        }

        let recipient_name = recipient.name().to_string();
        let result = with_engine(account, move |engine: &mut dyn BotEngine| {
            Box::pin(async move { engine.send_inventory(&recipient_name).await })
        })
        .await?;

        match result {
            Ok(sent) => println!(
                "{}: offered {sent} item(s) to \"{}\"",
                account.name(),
                recipient.name()
            ),
            Err(error) => println!("{}: {error}", account.name()),
        }
        Ok(())
    }
}
