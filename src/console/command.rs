//! Command descriptors and executions
//!
//! A command is described by a [`CommandInfo`]: its unique name, whether it
//! is global or account-scoped, and its option schema (a `clap::Command`
//! built per invocation). Each invocation manufactures one [`Execution`]
//! holding the parsed option values; account-scoped fan-out reuses that same
//! execution for every resolved target.

use std::sync::Arc;

use async_trait::async_trait;
use clap::{ArgAction, ArgMatches, Command as ClapCommand};

use crate::console::cli::CliState;
use crate::domain::{AccountDirectory, AccountHandle};

/// Context available while building option schemas; account-reference
/// options resolve against the directory at parse time.
pub struct SchemaContext {
    pub directory: Arc<AccountDirectory>,
}

/// Static, immutable description of one interactive command.
pub trait CommandInfo: Send + Sync {
    /// Unique command name; the registry key.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Global commands run exactly once with no bound account.
    fn global(&self) -> bool {
        false
    }

    /// Whether execution needs a live session on the target account.
    /// Commands like `launch` opt out so they can act on stopped accounts.
    fn needs_session(&self) -> bool {
        true
    }

    /// Option schema. The default is a command without options.
    fn schema(&self, _ctx: &SchemaContext) -> ClapCommand {
        base_command(self.name())
    }

    fn make_execution(&self) -> Box<dyn Execution>;
}

/// Per-invocation holder of parsed option values and the leaf logic.
#[async_trait]
pub trait Execution: Send {
    /// Extract and validate typed fields from the parsed options. Returning
    /// false is treated like a parse failure; it lets commands reject option
    /// combinations the schema alone cannot express.
    fn init(&mut self, _matches: &ArgMatches) -> bool {
        true
    }

    /// Run the command for one target. `account` is always `Some` for
    /// account-scoped commands and always `None` for global ones.
    async fn execute(
        &self,
        cli: &mut CliState,
        account: Option<&Arc<AccountHandle>>,
    ) -> anyhow::Result<()>;
}

/// Schema skeleton shared by every command: tokens come pre-split from the
/// interactive line, and `help` is a command of its own rather than a flag.
pub fn base_command(name: &'static str) -> ClapCommand {
    ClapCommand::new(name)
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
}

/// Render the aligned usage block for one command.
pub fn print_usage(command: &dyn CommandInfo, ctx: &SchemaContext) {
    let mut header = String::new();
    if !command.global() {
        header.push_str("[<account>:] ");
    }
    header.push_str(command.name());
    println!("{header}");

    let schema = command.schema(ctx);
    let entries: Vec<(String, String)> = schema
        .get_arguments()
        .map(|arg| {
            let help = arg.get_help().map(ToString::to_string).unwrap_or_default();
            (format_parameter(arg), help)
        })
        .collect();

    let width = entries.iter().map(|(param, _)| param.len()).max().unwrap_or(0);
    for (param, help) in entries {
        println!("   {param:width$} : {help}");
    }
}

fn format_parameter(arg: &clap::Arg) -> String {
    let value_name = arg
        .get_value_names()
        .and_then(|names| names.first())
        .map(ToString::to_string)
        .unwrap_or_else(|| arg.get_id().to_string());

    if arg.is_positional() {
        let multi = arg
            .get_num_args()
            .map(|range| range.max_values() > 1)
            .unwrap_or(false);
        let suffix = if multi { "..." } else { "" };
        if arg.is_required_set() {
            format!("<{value_name}>{suffix}")
        } else {
            format!("[{value_name}]{suffix}")
        }
    } else {
        let long = arg
            .get_long()
            .map(|long| format!("--{long}"))
            .unwrap_or_else(|| arg.get_id().to_string());
        if matches!(arg.get_action(), ArgAction::SetTrue | ArgAction::SetFalse) {
            long
        } else {
            format!("{long} <{value_name}>")
        }
    }
}
