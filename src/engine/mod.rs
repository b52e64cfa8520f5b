//! Repository-set execution engine
//!
//! Selection, type resolution, template lookup and rendering, and the
//! orchestrator that runs the resulting commands.

pub mod orchestrator;
pub mod resolver;
pub mod selector;
pub mod template;

pub use orchestrator::{ExecOutcome, ExecutionResult, Repoman, strip_change_dir};
pub use resolver::resolve_type;
pub use selector::{ExecutionOptions, Selector};
pub use template::{Placeholder, TemplateParams, render};
