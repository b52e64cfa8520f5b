//! Exit codes of the shell, git and svn

/// Short description of a command's exit code, shown next to failures
pub fn get_exit_code_description(exit_code: i32) -> &'static str {
    match exit_code {
        0 => "success",
        1 => "general error",
        2 => "misuse of shell builtin",
        126 => "command cannot execute",
        127 => "command not found",
        // git dies with 128 on fatal errors
        128 => "fatal error",
        129..=255 => "terminated by signal",
        _ => "error",
    }
}
