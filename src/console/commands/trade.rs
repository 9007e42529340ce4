//! `accept-trade` / `decline-trade` / `cancel-trade` commands.

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command as ClapCommand};

use crate::console::cli::CliState;
use crate::console::command::{base_command, CommandInfo, Execution, SchemaContext};
use crate::console::commands::with_engine;
use crate::console::registry::CommandRegistry;
use crate::domain::AccountHandle;
use crate::ports::{BotEngine, TradeAction, TradeOfferId};

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(TradeCommand { action: TradeAction::Accept }));
    registry.register(Arc::new(TradeCommand { action: TradeAction::Decline }));
    registry.register(Arc::new(TradeCommand { action: TradeAction::Cancel }));
}

struct TradeCommand {
    action: TradeAction,
}

impl CommandInfo for TradeCommand {
    fn name(&self) -> &'static str {
        match self.action {
            TradeAction::Accept => "accept-trade",
            TradeAction::Decline => "decline-trade",
            TradeAction::Cancel => "cancel-trade",
        }
    }

    fn description(&self) -> &'static str {
        match self.action {
            TradeAction::Accept => "accept an incoming trade offer",
            TradeAction::Decline => "decline an incoming trade offer",
            TradeAction::Cancel => "cancel an outgoing trade offer",
        }
    }

    fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
        base_command(self.name()).arg(
            Arg::new("tradeofferid")
                .value_name("tradeofferid")
                .required(true)
                .value_parser(clap::value_parser!(u64))
                .help("id of the trade offer"),
        )
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(TradeExecution {
            action: self.action,
            offer: TradeOfferId(0),
        })
    }
}

struct TradeExecution {
    action: TradeAction,
    offer: TradeOfferId,
}

#[async_trait]
impl Execution for TradeExecution {
    fn init(&mut self, matches: &ArgMatches) -> bool {
        match matches.get_one::<u64>("tradeofferid") {
            Some(id) => {
                self.offer = TradeOfferId(*id);
                true
            }
            None => false,
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
        let action = self.action;
        let offer = self.offer;
        let result = with_engine(account, move |engine: &mut dyn BotEngine| {
            Box::pin(async move { engine.respond_trade(offer, action).await })
        })
        .await?;

        match result {
            Ok(()) => {
                let done = match action {
                    TradeAction::Accept => "accepted",
                    TradeAction::Decline => "declined",
                    TradeAction::Cancel => "cancelled",
                };
                println!("{}: {done} trade offer {offer}", account.name());
            }
            Err(error) => println!("{}: {error}", account.name()),
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
    use crate::ports::{BotEngine, TradeDirection};
    use crate::session::AccountSession;
    use std::time::Duration;

    #[tokio::test]
    async fn test_each_verb_maps_to_its_action() {
        let mut registry = CommandRegistry::new();
        register(&mut registry);
        let directory = Arc::new(AccountDirectory::in_memory());
        let account = directory.create("alpha").unwrap();
        let engine = MockEngine::new().with_offer(7, TradeDirection::Incoming);
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

        dispatch_line(&mut state, "accept-trade 7").await;
        dispatch_line(&mut state, "decline-trade 8").await;
        dispatch_line(&mut state, "cancel-trade 9").await;

        assert_eq!(
            calls.lock().unwrap().clone(),
            vec![
                "respond_trade 7 accept",
                "respond_trade 8 decline",
                "respond_trade 9 cancel"
            ]
        );
    }

    #[tokio::test]
    async fn test_trade_failure_does_not_escape_the_dispatcher() {
        let mut registry = CommandRegistry::new();
        register(&mut registry);
        let directory = Arc::new(AccountDirectory::in_memory());
        let account = directory.create("alpha").unwrap();
        account.attach_session(AccountSession::spawn(
            "alpha".into(),
            Box::new(MockEngine::new().failing_trades()),
        ));

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

        // The failure is reported to the console, not propagated.
        dispatch_line(&mut state, "accept-trade 7").await;
    }
}
