//! Core account model: the directory, handles, and persisted account data.

pub mod account;
pub mod data_file;

pub use account::{AccountDirectory, AccountHandle, DirectoryError};
pub use data_file::AccountData;
