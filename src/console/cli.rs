//! Interactive console state and read loop
//!
//! [`CliState`] is the mutable state threaded through every command
//! execution: the account directory, the currently selected account, the
//! pacing delays, and the launcher that brings new sessions up. The read
//! loop keeps prompting until a blank line, end of input, cancellation, or
//! an explicit exit request.

use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncBufRead;
use tokio::sync::watch;

use crate::console::dispatch;
use crate::console::readline::{LineReader, ReadError};
use crate::console::registry::CommandRegistry;
use crate::domain::{AccountDirectory, AccountHandle};
use crate::ports::BotEngine;
use crate::session::AccountSession;

/// Manufactures execution backends for newly launched accounts.
pub type EngineFactory = Arc<dyn Fn(&str) -> Box<dyn BotEngine> + Send + Sync>;

pub struct Launcher {
    factory: EngineFactory,
}

impl Launcher {
    pub fn new(factory: EngineFactory) -> Self {
        Self { factory }
    }

    /// Bring up a session for `account`. Returns false if one is already
    /// running.
    pub fn launch(&self, account: &Arc<AccountHandle>) -> bool {
        if account.is_running() {
            return false;
        }
        let engine = (self.factory)(account.name());
        let session = AccountSession::spawn(account.name().to_string(), engine);
        account.attach_session(session);
        tracing::info!(account = account.name(), "session launched");
        true
    }
}

pub struct CliState {
    pub registry: Arc<CommandRegistry>,
    pub directory: Arc<AccountDirectory>,
    pub current_account: Option<Arc<AccountHandle>>,
    pub launcher: Launcher,
    pub fan_out_delay: Duration,
    pub license_delay: Duration,
    /// Set by the exit command; makes the read loop request process
    /// shutdown instead of merely leaving command mode.
    pub quit: bool,
}

impl CliState {
    pub fn new(
        registry: Arc<CommandRegistry>,
        directory: Arc<AccountDirectory>,
        launcher: Launcher,
        fan_out_delay: Duration,
        license_delay: Duration,
    ) -> Self {
        Self {
            registry,
            directory,
            current_account: None,
            launcher,
            fan_out_delay,
            license_delay,
            quit: false,
        }
    }

    /// Drop the selected account if it matches `account`.
    pub fn deselect(&mut self, account: &Arc<AccountHandle>) {
        if let Some(current) = &self.current_account {
            if Arc::ptr_eq(current, account) {
                self.current_account = None;
            }
        }
    }

    fn prompt(&self) -> String {
        match &self.current_account {
            Some(account) => format!("[{}] command> ", account.name()),
            None => "command> ".to_string(),
        }
    }
}

/// Run the interactive loop until it ends. Returns true when the user asked
/// for process shutdown, false when command mode was merely left.
pub async fn run<R: AsyncBufRead + Unpin>(
    state: &mut CliState,
    reader: &mut LineReader<R>,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    println!("Command line mode is now active.");
    println!("End it by entering an empty line.");

    loop {
        print!("{}", state.prompt());
        let _ = std::io::stdout().flush();

        let line = match reader.next_line(shutdown).await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(ReadError::Cancelled) => return true,
            Err(ReadError::Io(error)) => {
                tracing::error!(%error, "console input failed");
                break;
            }
        };

        if line.trim().is_empty() {
            break;
        }

        dispatch::dispatch_line(state, &line).await;

        if state.quit {
            return true;
        }
    }

    println!("Command line mode ended.");
    false
}
