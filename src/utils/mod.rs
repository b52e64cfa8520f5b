//! Utility modules for common functionality

pub mod exit_codes;
pub mod logger;
pub mod validators;

// Re-export commonly used functions
pub use exit_codes::get_exit_code_description;
pub use logger::Logger;
