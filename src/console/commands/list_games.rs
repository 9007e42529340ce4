//! `list-games` command: filtered view of the account's game library.

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};

use crate::console::cli::CliState;
use crate::console::command::{base_command, CommandInfo, Execution, SchemaContext};
use crate::console::commands::helpers::{format_date, format_playtime};
use crate::console::commands::with_engine;
use crate::console::options::OptionRegexId;
use crate::console::registry::CommandRegistry;
use crate::console::table::Table;
use crate::domain::AccountHandle;
use crate::ports::BotEngine;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(ListGamesCommand));
}

struct ListGamesCommand;

impl CommandInfo for ListGamesCommand {
    fn name(&self) -> &'static str {
        "list-games"
    }

    fn description(&self) -> &'static str {
        "list the account's games, filtered by id or name pattern"
    }

    fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
        base_command("list-games")
            .arg(
                Arg::new("game")
                    .value_name("regex|appid")
                    .value_parser(OptionRegexId::parse)
                    .help("only games matching this id or name pattern"),
            )
            .arg(
                Arg::new("playtime")
                    .long("playtime")
                    .action(ArgAction::SetTrue)
                    .help("show total playtime"),
            )
            .arg(
                Arg::new("last-played")
                    .long("last-played")
                    .action(ArgAction::SetTrue)
                    .help("show the last-played date"),
            )
            .arg(
                Arg::new("no-dlc")
                    .long("no-dlc")
                    .action(ArgAction::SetTrue)
                    .help("hide DLC entries"),
            )
            .arg(
                Arg::new("adult")
                    .long("adult")
                    .action(ArgAction::SetTrue)
                    .help("only adult-rated games"),
            )
            .arg(
                Arg::new("early-access")
                    .long("early-access")
                    .action(ArgAction::SetTrue)
                    .help("only early-access games"),
            )
            .arg(
                Arg::new("farmable")
                    .long("farmable")
                    .action(ArgAction::SetTrue)
                    .help("only games with card drops remaining"),
            )
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(ListGamesExecution::default())
    }
}

#[derive(Default)]
struct ListGamesExecution {
    filter: Option<OptionRegexId>,
    playtime: bool,
    last_played: bool,
    no_dlc: bool,
    adult: bool,
    early_access: bool,
    farmable: bool,
}

#[async_trait]
impl Execution for ListGamesExecution {
    fn init(&mut self, matches: &ArgMatches) -> bool {
        self.filter = matches.get_one::<OptionRegexId>("game").cloned();
        self.playtime = matches.get_flag("playtime");
        self.last_played = matches.get_flag("last-played");
        self.no_dlc = matches.get_flag("no-dlc");
        self.adult = matches.get_flag("adult");
        self.early_access = matches.get_flag("early-access");
        self.farmable = matches.get_flag("farmable");
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
        let games =
            with_engine(account, |engine: &mut dyn BotEngine| Box::pin(async move { engine.owned_games().await }))
                .await?;

        let mut selected: Vec<_> = games
            .into_iter()
            .filter(|game| {
                if let Some(filter) = &self.filter {
                    if !filter.matches(&game.name, u64::from(game.app_id.0)) {
                        return false;
                    }
                }
                !(self.no_dlc && game.is_dlc)
                    && !(self.adult && !game.adult)
                    && !(self.early_access && !game.early_access)
                    && !(self.farmable && game.cards_remaining == 0)
            })
            .collect();

        // The playtime and last-played flags double as sort keys, most
        // recent or most played first; otherwise sort by name.
        if self.playtime {
            selected.sort_by(|a, b| b.playtime_minutes.cmp(&a.playtime_minutes));
        } else if self.last_played {
            selected.sort_by(|a, b| b.last_played.cmp(&a.last_played));
        } else {
            selected.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }

        if selected.is_empty() {
            println!("{}: no matching games", account.name());
            return Ok(());
        }

        let mut table = Table::new(4);
        for game in &selected {
            let mut row = vec![game.app_id.to_string(), game.name.clone()];
            if self.playtime {
                row.push(format_playtime(game.playtime_minutes));
            }
            if self.last_played {
                row.push(
                    game.last_played
                        .map(format_date)
                        .unwrap_or_else(|| "never".to_string()),
                );
            }
            table.add_row(row);
        }
        println!("{}: {} game(s)", account.name(), selected.len());
        table.print();
        Ok(())
    }
}
