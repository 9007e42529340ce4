//! Command registry
//!
//! Name-keyed table of every registered command. Built once at startup by
//! `commands::register_all` and read-only afterwards. Duplicate names are a
//! programming error, not a user error: registration panics rather than
//! silently overwriting, since an overwrite could hide a real bug.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::command::CommandInfo;

#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Arc<dyn CommandInfo>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one command; panics on a duplicate name.
    pub fn register(&mut self, command: Arc<dyn CommandInfo>) {
        let name = command.name();
        let previous = self.commands.insert(name, command);
        assert!(previous.is_none(), "duplicate command registration: {name}");
    }

    /// Exact, case-sensitive lookup.
    pub fn find(&self, name: &str) -> Option<Arc<dyn CommandInfo>> {
        self.commands.get(name).cloned()
    }

    /// Commands in sorted-by-name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn CommandInfo>> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Print the plain listing shown after an unknown command.
    pub fn print_listing(&self) {
        println!("valid commands:");
        for command in self.iter() {
            println!("   {}", command.name());
        }
    }
}
