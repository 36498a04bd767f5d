//! `foodsaver` command-line front end over the inventory store.

pub mod args;
pub mod commands;

pub use args::{AddArgs, Cli, Command};
pub use commands::execute;
