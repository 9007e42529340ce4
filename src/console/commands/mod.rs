//! Interactive commands
//!
//! One module per command family. Every command is registered exactly once
//! by [`register_all`] during startup; the registry asserts on duplicates.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::console::registry::CommandRegistry;
use crate::domain::AccountHandle;
use crate::ports::BotEngine;

mod add_license;
mod clear_queue;
mod cloud;
mod create;
mod exit;
mod groups;
mod help;
pub(crate) mod helpers;
mod inventory;
mod launch;
mod list_games;
mod list_tradeoffers;
mod play_game;
mod quit_client;
mod select;
mod settings;
mod show_license;
mod stats;
mod status;
mod trade;
mod view_stream;

/// Build the full command table.
pub fn register_all(registry: &mut CommandRegistry) {
    add_license::register(registry);
    clear_queue::register(registry);
    cloud::register(registry);
    create::register(registry);
    exit::register(registry);
    groups::register(registry);
    help::register(registry);
    inventory::register(registry);
    launch::register(registry);
    list_games::register(registry);
    list_tradeoffers::register(registry);
    play_game::register(registry);
    quit_client::register(registry);
    select::register(registry);
    settings::register(registry);
    show_license::register(registry);
    stats::register(registry);
    status::register(registry);
    trade::register(registry);
    view_stream::register(registry);
}

/// Marshal one job onto the account's worker and wait for its result.
///
/// Fails when the account has no live session or the worker went away
/// before the job could run.
pub(crate) async fn with_engine<R, F>(account: &Arc<AccountHandle>, job: F) -> anyhow::Result<R>
where
    R: Send + 'static,
    F: for<'a> FnOnce(&'a mut dyn BotEngine) -> Pin<Box<dyn Future<Output = R> + Send + 'a>>
        + Send
        + 'static,
{
    let Some(session) = account.session() else {
        anyhow::bail!("account is not running");
    };
    match session.run(job).await {
        Some(result) => Ok(result),
        None => anyhow::bail!("account session ended before the command ran"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccountDirectory;
    use crate::ports::mocks::MockEngine;
    use crate::session::AccountSession;

    #[test]
    fn test_register_all_covers_the_command_surface() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);

        for name in [
            "help",
            "EXIT",
            "status",
            "create",
            "launch",
            "select",
            "quit",
            "list-games",
            "play-game",
            "stop-game",
            "add-license",
            "add-app",
            "accept-trade",
            "decline-trade",
            "cancel-trade",
            "list-tradeoffers",
            "list-inventory",
            "send-inventory",
            "create-group",
            "add-group",
            "remove-group",
            "list-groups",
            "set",
            "clear-queue",
            "list-cloud",
            "list-files",
            "show-license",
            "stats",
            "view-stream",
        ] {
            assert!(registry.find(name).is_some(), "missing command {name}");
        }
    }

    #[tokio::test]
    async fn test_with_engine_requires_a_live_session() {
        let directory = AccountDirectory::in_memory();
        let account = directory.create("alpha").unwrap();

        let stopped = with_engine(&account, |engine: &mut dyn BotEngine| {
            Box::pin(async move { engine.owned_games().await.len() })
        })
        .await;
        assert!(stopped.is_err());

        account.attach_session(AccountSession::spawn("alpha".into(), Box::new(MockEngine::new())));
        let running = with_engine(&account, |engine: &mut dyn BotEngine| {
            Box::pin(async move { engine.owned_games().await.len() })
        })
        .await;
        assert_eq!(running.unwrap(), 0);
    }
}
