//! Configuration management module

pub mod builder;
pub mod loader;
pub mod repository;
pub mod scms;

pub use builder::RepositoryBuilder;
pub use loader::Config;
pub use repository::{Repository, ScmType};
pub use scms::{ReportCommands, ScmActions, ScmTable};
