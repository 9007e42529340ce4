//! Interactive console: command registry, dispatch, and the read loop.

pub mod cli;
pub mod command;
pub mod commands;
pub mod dispatch;
pub mod options;
pub mod readline;
pub mod registry;
pub mod resolver;
pub mod table;

pub use cli::{run, CliState, EngineFactory, Launcher};
pub use readline::LineReader;
pub use registry::CommandRegistry;
