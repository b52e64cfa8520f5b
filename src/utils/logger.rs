//! Console transcript helpers
//!
//! Messages about a single repository are prefixed with its name in
//! cyan/bold, so interleaved output stays attributable.

use colored::*;

/// Logger for per-repository console output
///
/// ## Example
///
/// ```rust,no_run
/// use repoman::utils::Logger;
///
/// let logger = Logger::default();
/// logger.separator("couchdb");
/// logger.info("couchdb", "Starting operation");
/// logger.success("couchdb", "Operation completed");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger;

impl Logger {
    pub fn info(&self, name: &str, msg: &str) {
        println!("{} | {}", name.cyan().bold(), msg);
    }

    pub fn success(&self, name: &str, msg: &str) {
        println!("{} | {}", name.cyan().bold(), msg.green());
    }

    pub fn warn(&self, name: &str, msg: &str) {
        println!("{} | {}", name.cyan().bold(), msg.yellow());
    }

    pub fn error(&self, name: &str, msg: &str) {
        eprintln!("{} | {}", name.cyan().bold(), msg.red());
    }

    /// Header printed before a repository's command runs
    pub fn separator(&self, name: &str) {
        println!("\n+ {}", name.bold());
    }

    /// Echo of the command about to run
    pub fn command(&self, command: &str) {
        println!("> {}", command.dimmed());
    }
}
