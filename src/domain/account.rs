//! Account directory
//!
//! The directory knows every configured account, running or not. Handles are
//! shared (`Arc`); a handle may carry a live [`AccountSession`] while its
//! worker runs. The directory only reads and creates accounts, it never
//! deletes them.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};
use std::sync::Arc;

use thiserror::Error;

use super::data_file::{self, AccountData, DataFileError};
use crate::session::AccountSession;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error(transparent)]
    DataFile(#[from] DataFileError),
}

/// One configured bot account.
pub struct AccountHandle {
    name: String,
    data: Mutex<AccountData>,
    data_dir: Option<PathBuf>,
    session: RwLock<Option<AccountSession>>,
}

impl AccountHandle {
    fn new(name: String, data: AccountData, data_dir: Option<PathBuf>) -> Self {
        Self {
            name,
            data: Mutex::new(data),
            data_dir,
            session: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The live execution context, if the account is running.
    pub fn session(&self) -> Option<AccountSession> {
        let guard = self.session.read().unwrap();
        guard.as_ref().filter(|session| session.is_alive()).cloned()
    }

    pub fn is_running(&self) -> bool {
        self.session().is_some()
    }

    pub fn attach_session(&self, session: AccountSession) {
        *self.session.write().unwrap() = Some(session);
    }

    pub fn detach_session(&self) {
        *self.session.write().unwrap() = None;
    }

    pub fn groups(&self) -> Vec<String> {
        self.data.lock().unwrap().groups.clone()
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.data.lock().unwrap().groups.iter().any(|name| name == group)
    }

    pub fn settings(&self) -> BTreeMap<String, String> {
        self.data.lock().unwrap().settings.clone()
    }

    /// Apply `change` to the persisted data; saves only when it returns true.
    pub fn update_data<F>(&self, change: F) -> Result<bool, DataFileError>
    where
        F: FnOnce(&mut AccountData) -> bool,
    {
        let mut guard = self.data.lock().unwrap();
        if !change(&mut guard) {
            return Ok(false);
        }
        if let Some(dir) = &self.data_dir {
            data_file::save(&data_file::account_file(dir, &self.name), &guard)?;
        }
        Ok(true)
    }
}

/// All known accounts, in a stable order.
pub struct AccountDirectory {
    data_dir: Option<PathBuf>,
    accounts: RwLock<Vec<Arc<AccountHandle>>>,
}

impl AccountDirectory {
    /// Directory with no backing storage; used by tests.
    pub fn in_memory() -> Self {
        Self {
            data_dir: None,
            accounts: RwLock::new(Vec::new()),
        }
    }

    /// Open the directory backed by `data_dir`, loading every account file.
    pub fn open(data_dir: PathBuf) -> Result<Self, DirectoryError> {
        let accounts = data_file::scan(&data_dir)?
            .into_iter()
            .map(|(name, data)| Arc::new(AccountHandle::new(name, data, Some(data_dir.clone()))))
            .collect();
        Ok(Self {
            data_dir: Some(data_dir),
            accounts: RwLock::new(accounts),
        })
    }

    /// Create a new account; `None` if the name is already taken.
    pub fn create(&self, name: &str) -> Option<Arc<AccountHandle>> {
        let mut accounts = self.accounts.write().unwrap();
        if accounts.iter().any(|account| account.name() == name) {
            return None;
        }
        let handle = Arc::new(AccountHandle::new(
            name.to_string(),
            AccountData::default(),
            self.data_dir.clone(),
        ));
        if let Err(error) = handle.update_data(|_| true) {
            tracing::warn!(account = name, %error, "failed to persist new account");
        }
        accounts.push(Arc::clone(&handle));
        Some(handle)
    }

    /// Exact-name lookup.
    pub fn find(&self, name: &str) -> Option<Arc<AccountHandle>> {
        self.accounts
            .read()
            .unwrap()
            .iter()
            .find(|account| account.name() == name)
            .cloned()
    }

    /// Every account, in directory order.
    pub fn accounts(&self) -> Vec<Arc<AccountHandle>> {
        self.accounts.read().unwrap().clone()
    }

    /// Members of `group`, in directory order.
    pub fn group(&self, group: &str) -> Vec<Arc<AccountHandle>> {
        self.accounts
            .read()
            .unwrap()
            .iter()
            .filter(|account| account.in_group(group))
            .cloned()
            .collect()
    }

    /// Accounts with a live execution context.
    pub fn running(&self) -> Vec<Arc<AccountHandle>> {
        self.accounts
            .read()
            .unwrap()
            .iter()
            .filter(|account| account.is_running())
            .cloned()
            .collect()
    }

    /// Every group name that has at least one member, sorted.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .accounts
            .read()
            .unwrap()
            .iter()
            .flat_map(|account| account.groups())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::MockEngine;
    use tempfile::tempdir;

    #[test]
    fn test_create_rejects_duplicate_names() {
        let directory = AccountDirectory::in_memory();
        assert!(directory.create("alpha").is_some());
        assert!(directory.create("alpha").is_none());
    }

    #[test]
    fn test_find_is_exact() {
        let directory = AccountDirectory::in_memory();
        directory.create("alpha");
        assert!(directory.find("alpha").is_some());
        assert!(directory.find("Alpha").is_none());
        assert!(directory.find("alph").is_none());
    }

    #[test]
    fn test_group_membership_in_directory_order() {
        let directory = AccountDirectory::in_memory();
        let alpha = directory.create("alpha").unwrap();
        directory.create("bravo");
        let charlie = directory.create("charlie").unwrap();

        charlie.update_data(|data| {
            data.groups.push("farmers".into());
            true
        })
        .unwrap();
        alpha
            .update_data(|data| {
                data.groups.push("farmers".into());
                true
            })
            .unwrap();

        let members: Vec<String> = directory
            .group("farmers")
            .iter()
            .map(|account| account.name().to_string())
            .collect();
        assert_eq!(members, vec!["alpha", "charlie"]);
    }

    #[tokio::test]
    async fn test_running_filters_dead_accounts() {
        let directory = AccountDirectory::in_memory();
        let alpha = directory.create("alpha").unwrap();
        directory.create("bravo");

        alpha.attach_session(AccountSession::spawn("alpha".into(), Box::new(MockEngine::new())));

        let running: Vec<String> = directory
            .running()
            .iter()
            .map(|account| account.name().to_string())
            .collect();
        assert_eq!(running, vec!["alpha"]);
    }

    #[test]
    fn test_persisted_directory_roundtrip() {
        let dir = tempdir().unwrap();

        {
            let directory = AccountDirectory::open(dir.path().to_path_buf()).unwrap();
            let alpha = directory.create("alpha").unwrap();
            alpha
                .update_data(|data| {
                    data.settings.insert("idle-playtime".into(), "30".into());
                    true
                })
                .unwrap();
        }

        let reopened = AccountDirectory::open(dir.path().to_path_buf()).unwrap();
        let alpha = reopened.find("alpha").unwrap();
        assert_eq!(alpha.settings().get("idle-playtime").map(String::as_str), Some("30"));
    }
}
