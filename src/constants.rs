//! Central constants for the repoman application

/// Default values for configuration
pub mod config {
    /// Default configuration file name, looked up in the workspace then in the home directory
    pub const DEFAULT_CONFIG_FILE: &str = ".repoman.json";

    /// Sample configuration written by `config` when no generator is selected
    pub const SAMPLE_CONFIG: &str = include_str!("../conf/sample.repoman.json");
}

/// SCM action tables and command templates
pub mod scm {
    /// Built-in action table for POSIX shells
    pub const SCMS_POSIX: &str = include_str!("../conf/scms.json");

    /// Built-in action table for the Windows command interpreter
    pub const SCMS_WIN32: &str = include_str!("../conf/scms-win32.json");

    /// Platform identifier selecting the Windows table
    pub const PLATFORM_WIN32: &str = "win32";

    /// Prefix used when an action has no table entry and runs as a raw command
    pub const CHANGE_DIR_COMMAND: &str = "cd \"{{{workspace}}}{{{pathseparator}}}{{{name}}}\" && ";

    /// Name of the action that runs the status probes
    pub const REPORT_ACTION: &str = "report";
}

/// Status report defaults
pub mod report {
    /// Value of a metric whose probe failed or produced no output
    pub const UNKNOWN: &str = "unknown";

    /// Probe output marking uncommitted changes
    pub const DIRTY: &str = "Dirty";

    /// Probe output for SCMs that cannot have unpushed commits
    pub const NOT_APPLICABLE: &str = "N. A.";

    /// Maximum number of probes running at the same time
    pub const MAX_CONCURRENT_PROBES: usize = 16;

    /// Column width bounds, padding included
    pub const MIN_COLUMN_WIDTH: usize = 5;
    pub const MAX_COLUMN_WIDTH: usize = 40;
}

/// Default values for GitHub operations
pub mod github {
    /// GitHub API base URL
    pub const API_BASE: &str = "https://api.github.com";

    /// Repositories requested per page
    pub const PER_PAGE: u32 = 100;

    /// Default User-Agent header for API requests
    pub const DEFAULT_USER_AGENT: &str = concat!("repoman/", env!("CARGO_PKG_VERSION"));

    /// Environment variable holding a personal access token
    pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

    /// Request timeout in seconds
    pub const TIMEOUT_SECS: u64 = 30;
}

/// Default values for Bitbucket operations
pub mod bitbucket {
    /// Bitbucket API base URL
    pub const API_BASE: &str = "https://api.bitbucket.org/2.0";

    /// Repositories requested per page
    pub const PAGE_LEN: u32 = 100;
}

/// Stored credentials
pub mod credentials {
    /// Dotfile in the home directory holding the GitHub token
    pub const TOKEN_FILE: &str = ".repomanrc";

    /// JSON key of the stored token
    pub const TOKEN_KEY: &str = "githubAuthToken";
}
