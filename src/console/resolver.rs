//! Account target resolver
//!
//! Expands the optional `name:` / `@group:` / `*:` prefix of a command line
//! into a list of account handles. An empty result means resolution failed
//! and the diagnostic has already been printed; the command is not run.

use std::sync::Arc;

use crate::domain::{AccountDirectory, AccountHandle};

/// Expand a target expression (without the trailing `:`).
///
/// `@group` expands to the group members in stored order, `*` to every
/// account with a live execution context, anything else is an exact account
/// name.
pub fn expand_account_name(directory: &AccountDirectory, name: &str) -> Vec<Arc<AccountHandle>> {
    if let Some(group) = name.strip_prefix('@') {
        let result = directory.group(group);
        if result.is_empty() {
            println!("group \"{group}\" not found");
        }
        result
    } else if name == "*" {
        let result = directory.running();
        if result.is_empty() {
            println!("no running accounts found");
        }
        result
    } else if let Some(account) = directory.find(name) {
        vec![account]
    } else {
        println!("unknown account \"{name}\"");
        Vec::new()
    }
}
