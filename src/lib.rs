//! Hive Console - Interactive Multi-Account Bot Console Library
//!
//! An interactive command line for driving many bot account sessions at once.
//!
//! # Modules
//!
//! - `domain`: Core account model (AccountDirectory, AccountHandle, data files)
//! - `ports`: Trait abstractions (BotEngine and its data types)
//! - `session`: Per-account serialized worker contexts
//! - `console`: Command registry, dispatch engine, and the read loop
//! - `adapters`: Engine implementations (SimEngine)
//! - `config`: Configuration loading and validation

pub mod adapters;
pub mod config;
pub mod console;
pub mod domain;
pub mod ports;
pub mod session;
