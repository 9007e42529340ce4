//! Per-account execution contexts.

pub mod worker;

pub use worker::AccountSession;
