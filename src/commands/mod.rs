//! Command implementations

pub mod add;
pub mod base;
pub mod clean;
pub mod config;
pub mod exec;
pub mod list;
pub mod remove;
pub mod report;
pub mod signin;
pub mod validators;

pub use add::AddCommand;
pub use base::{Command, CommandContext};
pub use clean::CleanCommand;
pub use config::{ConfigCommand, ConfigSource};
pub use exec::ExecCommand;
pub use list::ListCommand;
pub use remove::RemoveCommand;
pub use report::ReportCommand;
pub use signin::SigninCommand;
