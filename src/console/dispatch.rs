//! Command line dispatch
//!
//! Turns one interactive line into command executions: tokenize, peel the
//! optional account prefix, look up the command, parse options, then run the
//! execution once per resolved target with pacing between live targets.
//! Diagnostics go to the console; a failed stage never aborts the loop.

use std::sync::Arc;

use crate::console::command::{print_usage, SchemaContext};
use crate::console::resolver::expand_account_name;
use crate::domain::AccountHandle;

use super::cli::CliState;

/// Parse and run one command line. All user-facing diagnostics are printed
/// here or in the stages this calls.
pub async fn dispatch_line(state: &mut CliState, line: &str) {
    let Some(tokens) = shlex::split(line) else {
        println!("cannot parse command line");
        return;
    };
    if tokens.is_empty() {
        return;
    }

    let mut tokens = tokens.into_iter();
    let first = tokens.next().unwrap_or_default();

    let (targets, command_name) = match first.strip_suffix(':') {
        Some(expr) => {
            let targets = expand_account_name(&state.directory, expr);
            if targets.is_empty() {
                return;
            }
            let Some(name) = tokens.next() else {
                return;
            };
            (Some(targets), name)
        }
        None => (None, first),
    };

    let Some(command) = state.registry.find(&command_name) else {
        println!("unknown command: \"{command_name}\"");
        state.registry.print_listing();
        return;
    };

    let ctx = SchemaContext {
        directory: Arc::clone(&state.directory),
    };
    let rest: Vec<String> = tokens.collect();
    let matches = match command.schema(&ctx).try_get_matches_from(rest) {
        Ok(matches) => matches,
        Err(error) => {
            let rendered = error.render().to_string();
            if let Some(reason) = rendered.lines().find(|line| !line.trim().is_empty()) {
                println!("{}", reason.trim());
            }
            print_usage(command.as_ref(), &ctx);
            return;
        }
    };

    let mut execution = command.make_execution();
    if !execution.init(&matches) {
        print_usage(command.as_ref(), &ctx);
        return;
    }

    if command.global() {
        if let Err(error) = execution.execute(state, None).await {
            println!("{}: {error:#}", command.name());
        }
        return;
    }

    let targets: Vec<Arc<AccountHandle>> = match targets {
        Some(targets) => targets,
        None => match &state.current_account {
            Some(current) => vec![Arc::clone(current)],
            None => {
                println!("no current account; select one first or specify an account name");
                return;
            }
        },
    };

    let mut first_target = true;
    for account in &targets {
        if command.needs_session() && !account.is_running() {
            tracing::debug!(account = account.name(), "skipping stopped account");
            continue;
        }
        if !first_target {
            tokio::time::sleep(state.fan_out_delay).await;
        }
        first_target = false;

        if let Err(error) = execution.execute(state, Some(account)).await {
            println!(
                "{}: {error:#} (account \"{}\")",
                command.name(),
                account.name()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::cli::Launcher;
    use crate::console::command::{base_command, CommandInfo, Execution};
    use crate::console::registry::CommandRegistry;
    use crate::domain::AccountDirectory;
    use crate::ports::mocks::MockEngine;
    use crate::ports::BotEngine;
    use crate::session::AccountSession;
    use async_trait::async_trait;
    use clap::{Arg, ArgMatches, Command as ClapCommand};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    type Record = Arc<Mutex<Vec<(Option<String>, Instant)>>>;

    struct RecordingCommand {
        name: &'static str,
        global: bool,
        needs_session: bool,
        record: Record,
    }

    impl CommandInfo for RecordingCommand {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            "recording test command"
        }

        fn global(&self) -> bool {
            self.global
        }

        fn needs_session(&self) -> bool {
            self.needs_session
        }

        fn make_execution(&self) -> Box<dyn Execution> {
            Box::new(RecordingExecution {
                record: Arc::clone(&self.record),
            })
        }
    }

    struct RecordingExecution {
        record: Record,
    }

    #[async_trait]
    impl Execution for RecordingExecution {
        async fn execute(
            &self,
            _cli: &mut CliState,
            account: Option<&Arc<AccountHandle>>,
        ) -> anyhow::Result<()> {
            self.record.lock().unwrap().push((
                account.map(|account| account.name().to_string()),
                Instant::now(),
            ));
            Ok(())
        }
    }

    struct LicenseCommand {
        record: Arc<Mutex<Vec<u32>>>,
    }

    impl CommandInfo for LicenseCommand {
        fn name(&self) -> &'static str {
            "add-license"
        }

        fn description(&self) -> &'static str {
            "activate licenses"
        }

        fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
            base_command("add-license").arg(
                Arg::new("packageid")
                    .value_name("package-id")
                    .num_args(1..)
                    .required(true)
                    .value_parser(clap::value_parser!(u32)),
            )
        }

        fn make_execution(&self) -> Box<dyn Execution> {
            Box::new(LicenseExecution {
                packages: Vec::new(),
                record: Arc::clone(&self.record),
            })
        }
    }

    struct LicenseExecution {
        packages: Vec<u32>,
        record: Arc<Mutex<Vec<u32>>>,
    }

    #[async_trait]
    impl Execution for LicenseExecution {
        fn init(&mut self, matches: &ArgMatches) -> bool {
            self.packages = matches
                .get_many::<u32>("packageid")
                .into_iter()
                .flatten()
                .copied()
                .collect();
            true
        }

        async fn execute(
            &self,
            _cli: &mut CliState,
            _account: Option<&Arc<AccountHandle>>,
        ) -> anyhow::Result<()> {
            self.record.lock().unwrap().extend(&self.packages);
            Ok(())
        }
    }

    fn state_with(registry: CommandRegistry, directory: Arc<AccountDirectory>) -> CliState {
        let factory: crate::console::cli::EngineFactory =
            Arc::new(|_name: &str| Box::new(MockEngine::new()) as Box<dyn BotEngine>);
        CliState::new(
            Arc::new(registry),
            directory,
            Launcher::new(factory),
            Duration::from_secs(2),
            Duration::from_secs(1),
        )
    }

    fn start_session(directory: &AccountDirectory, name: &str) {
        let account = directory.find(name).unwrap();
        account.attach_session(AccountSession::spawn(name.into(), Box::new(MockEngine::new())));
    }

    #[tokio::test]
    async fn test_global_command_runs_once_despite_prefix() {
        let record: Record = Record::default();
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(RecordingCommand {
            name: "help",
            global: true,
            needs_session: false,
            record: Arc::clone(&record),
        }));
        let directory = Arc::new(AccountDirectory::in_memory());
        directory.create("alpha");
        let mut state = state_with(registry, directory);

        dispatch_line(&mut state, "alpha: help").await;

        let calls = record.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fan_out_paces_live_targets() {
        let record: Record = Record::default();
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(RecordingCommand {
            name: "status",
            global: false,
            needs_session: true,
            record: Arc::clone(&record),
        }));

        let directory = Arc::new(AccountDirectory::in_memory());
        for name in ["a", "b", "c"] {
            directory.create(name);
            start_session(&directory, name);
            directory
                .find(name)
                .unwrap()
                .update_data(|data| {
                    data.groups.push("all".into());
                    true
                })
                .unwrap();
        }
        let mut state = state_with(registry, Arc::clone(&directory));

        let start = Instant::now();
        dispatch_line(&mut state, "@all: status").await;

        let calls = record.lock().unwrap();
        let names: Vec<Option<String>> = calls.iter().map(|(name, _)| name.clone()).collect();
        assert_eq!(
            names,
            vec![Some("a".into()), Some("b".into()), Some("c".into())]
        );
        let gaps: Vec<Duration> = calls.iter().map(|(_, at)| *at - start).collect();
        assert_eq!(gaps[0], Duration::ZERO);
        assert_eq!(gaps[1], Duration::from_secs(2));
        assert_eq!(gaps[2], Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_stopped_targets_are_skipped_without_delay() {
        let record: Record = Record::default();
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(RecordingCommand {
            name: "status",
            global: false,
            needs_session: true,
            record: Arc::clone(&record),
        }));

        let directory = Arc::new(AccountDirectory::in_memory());
        directory.create("up");
        directory.create("down");
        start_session(&directory, "up");
        for name in ["up", "down"] {
            directory
                .find(name)
                .unwrap()
                .update_data(|data| {
                    data.groups.push("g".into());
                    true
                })
                .unwrap();
        }
        let mut state = state_with(registry, Arc::clone(&directory));

        dispatch_line(&mut state, "@g: status").await;

        let calls = record.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Some("up".into()));
    }

    #[tokio::test]
    async fn test_no_current_account_prints_diagnostic_without_running() {
        let record: Record = Record::default();
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(RecordingCommand {
            name: "status",
            global: false,
            needs_session: true,
            record: Arc::clone(&record),
        }));
        let directory = Arc::new(AccountDirectory::in_memory());
        let mut state = state_with(registry, directory);

        dispatch_line(&mut state, "status").await;

        assert!(record.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_does_not_panic() {
        let directory = Arc::new(AccountDirectory::in_memory());
        let mut state = state_with(CommandRegistry::new(), directory);
        dispatch_line(&mut state, "frobnicate --hard").await;
    }

    #[tokio::test]
    async fn test_option_values_reach_the_execution() {
        let record = Arc::new(Mutex::new(Vec::new()));
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(LicenseCommand {
            record: Arc::clone(&record),
        }));

        let directory = Arc::new(AccountDirectory::in_memory());
        directory.create("alpha");
        start_session(&directory, "alpha");
        let mut state = state_with(registry, Arc::clone(&directory));
        state.current_account = directory.find("alpha");

        dispatch_line(&mut state, "add-license 440 730").await;

        assert_eq!(*record.lock().unwrap(), vec![440, 730]);
    }
}
