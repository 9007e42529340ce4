//! `play-game` / `stop-game` commands.

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command as ClapCommand};

use crate::console::cli::CliState;
use crate::console::command::{base_command, CommandInfo, Execution, SchemaContext};
use crate::console::commands::with_engine;
use crate::console::registry::CommandRegistry;
use crate::domain::AccountHandle;
use crate::ports::{AppId, BotEngine};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(PlayGameCommand { mode: Mode::Play }));
    registry.register(Arc::new(PlayGameCommand { mode: Mode::Stop }));
}

#[derive(Clone, Copy)]
enum Mode {
    Play,
    Stop,
}

struct PlayGameCommand {
    mode: Mode,
}

impl CommandInfo for PlayGameCommand {
    fn name(&self) -> &'static str {
        match self.mode {
            Mode::Play => "play-game",
            Mode::Stop => "stop-game",
        }
    }

    fn description(&self) -> &'static str {
        match self.mode {
            Mode::Play => "start playing one or more games",
            Mode::Stop => "stop playing one or more games",
        }
    }

    fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
        base_command(self.name()).arg(
            Arg::new("appid")
                .value_name("appid")
                .num_args(1..)
                .required(true)
                .value_parser(clap::value_parser!(u32))
                .help("app ids to act on"),
        )
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(PlayGameExecution {
            mode: self.mode,
            apps: Vec::new(),
        })
    }
}

struct PlayGameExecution {
    mode: Mode,
    apps: Vec<AppId>,
}

#[async_trait]
impl Execution for PlayGameExecution {
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
            let mode = self.mode;
            let result = with_engine(account, move |engine: &mut dyn BotEngine| {
                Box::pin(async move {
                    match mode {
                        Mode::Play => engine.play_game(app).await,
                        Mode::Stop => engine.stop_game(app).await,
                    }
                })
            })
            .await?;

            match (result, self.mode) {
                (Ok(()), Mode::Play) => println!("{}: playing {app}", account.name()),
                (Ok(()), Mode::Stop) => println!("{}: stopped {app}", account.name()),
                (Err(error), _) => println!("{}: {app}: {error}", account.name()),
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
    use crate::session::AccountSession;
    use std::time::Duration;

    #[tokio::test]
    async fn test_play_then_stop_in_order() {
        let mut registry = CommandRegistry::new();
        register(&mut registry);
        let directory = Arc::new(AccountDirectory::in_memory());
        let account = directory.create("alpha").unwrap();
        let engine = MockEngine::new();
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

        dispatch_line(&mut state, "play-game 440 570").await;
        dispatch_line(&mut state, "stop-game 440").await;

        assert_eq!(
            calls.lock().unwrap().clone(),
            vec!["play_game 440", "play_game 570", "stop_game 440"]
        );
    }
}
