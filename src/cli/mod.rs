//! Command-line interface definitions and helpers.
//!
//! Argument parsing, value enums, flag/config merging and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction};
pub use commands::{convert, handle_config_action, resolve_settings, RunSettings};
pub use enums::{Backend, Charset};
