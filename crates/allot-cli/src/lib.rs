//! The `allot` command-line front end: configuration loading, log setup, a
//! JSON-file data source and the subcommands wrapping the allocation engine.

pub mod cli;
pub mod config;
pub mod file_source;
pub mod tracing_setup;

pub use cli::{Cli, Command};
pub use config::{AllotConfig, LogFormat, LoggingConfig};
pub use file_source::JsonFileSource;
