//! `view-stream` command: register a broadcast view.

use std::sync::Arc;

use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command as ClapCommand};
use url::Url;

use crate::console::cli::CliState;
use crate::console::command::{base_command, CommandInfo, Execution, SchemaContext};
use crate::console::commands::with_engine;
use crate::console::options::parse_url;
use crate::console::registry::CommandRegistry;
use crate::domain::AccountHandle;
use crate::ports::BotEngine;

pub fn register(registry: &mut CommandRegistry) {
    registry.register(Arc::new(ViewStreamCommand));
}

struct ViewStreamCommand;

impl CommandInfo for ViewStreamCommand {
    fn name(&self) -> &'static str {
        "view-stream"
    }

    fn description(&self) -> &'static str {
        "watch a broadcast, or the default stream page"
    }

    fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
        base_command("view-stream").arg(
            Arg::new("url")
                .value_name("url")
                .value_parser(parse_url)
                .help("broadcast URL to watch"),
        )
    }

    fn make_execution(&self) -> Box<dyn Execution> {
        Box::new(ViewStreamExecution { url: None })
    }
}

struct ViewStreamExecution {
    url: Option<Url>,
}

#[async_trait]
impl Execution for ViewStreamExecution {
    fn init(&mut self, matches: &ArgMatches) -> bool {
        self.url = matches.get_one::<Url>("url").cloned();
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
        let url = self.url.clone();
        let result = with_engine(account, move |engine: &mut dyn BotEngine| {
            Box::pin(async move { engine.view_stream(url.as_ref()).await })
        })
        .await?;

        match result {
            Ok(()) => match &self.url {
                Some(url) => println!("{}: watching {url}", account.name()),
                None => println!("{}: watching the default stream", account.name()),
            },
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
    use crate::ports::BotEngine;
    use crate::session::AccountSession;
    use std::time::Duration;

    #[tokio::test]
    async fn test_invalid_url_never_reaches_the_engine() {
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

        dispatch_line(&mut state, "view-stream not-a-url").await;
        assert!(calls.lock().unwrap().is_empty());

        dispatch_line(&mut state, "view-stream https://example.com/live").await;
        assert_eq!(
            calls.lock().unwrap().clone(),
            vec!["view_stream https://example.com/live"]
        );
    }
}
