//! Voice attendance tracker CLI library.
//!
//! This crate wires the core engine to its collaborators: configuration,
//! the stdin transport, the SQLite ledger, and the Discord messenger.

mod cli;
pub mod commands;
mod config;
pub mod engine;
pub mod transport;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use engine::{Engine, LogChannels};
