use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use repoman::commands::validators;
use repoman::commands::*;
use repoman::config::ScmTable;
use repoman::constants;
use repoman::engine::{ExecutionOptions, Selector};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repoman")]
#[command(about = "Manage a workspace of git and subversion repositories")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value_t = constants::config::DEFAULT_CONFIG_FILE.to_string())]
    config_file: String,

    /// Only act on repositories whose name or url matches this regex
    #[arg(short, long, global = true)]
    regex: Option<String>,

    /// Only act on repositories with at least one of these comma separated tags
    #[arg(short, long, global = true)]
    tags: Option<String>,

    /// Stop at the first repository whose command fails
    #[arg(long, global = true)]
    fail_fast: bool,

    /// Echo commands before running them
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Platform whose built-in command table is used (e.g. linux, win32)
    #[arg(long, global = true)]
    platform: Option<String>,

    /// Use the SCM command table from this JSON file
    #[arg(long, global = true)]
    scms_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the configuration file, from a hosting service, a local scan or a sample
    Config {
        /// Bitbucket username
        #[arg(long)]
        bitbucket_auth_user: Option<String>,

        /// Bitbucket app password
        #[arg(long)]
        bitbucket_auth_pass: Option<String>,

        /// Comma separated GitHub users whose repositories are added
        #[arg(long)]
        github_user: Option<String>,

        /// Comma separated GitHub organisations whose repositories are added
        #[arg(long)]
        github_org: Option<String>,

        /// GitHub username for basic authentication
        #[arg(long)]
        github_auth_user: Option<String>,

        /// GitHub password or token for basic authentication
        #[arg(long)]
        github_auth_pass: Option<String>,

        /// Use ssh instead of https clone urls for GitHub repositories
        #[arg(long)]
        github_use_ssh: bool,

        /// Scan the current directory for working copies
        #[arg(long)]
        local: bool,

        /// Drop existing entries the generator did not return
        #[arg(long)]
        remove_extraneous: bool,
    },

    /// Add a repository to the configuration and check it out
    Add {
        /// Repository type, git or svn
        #[arg(long = "type")]
        scm_type: Option<String>,

        /// Repository name, derived from a git url when omitted
        #[arg(long, alias = "repository-name")]
        name: Option<String>,

        /// Repository url
        #[arg(long)]
        url: Option<String>,

        /// Tag for the new entry (can be specified multiple times)
        #[arg(long = "tag")]
        tag: Vec<String>,
    },

    /// Remove a repository from the configuration and delete its working copy
    Remove {
        /// Repository name
        #[arg(long, alias = "repository-name")]
        name: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Check out the repositories
    Init,

    /// Update the working copies
    Get,

    /// Show uncommitted changes
    Changes,

    /// Push or commit local changes
    Save,

    /// Revert uncommitted changes
    Undo,

    /// Delete the working copies
    Delete,

    /// Run a shell command in every repository directory
    Exec {
        /// Command to execute
        command: String,
    },

    /// List repository names
    List,

    /// Delete workspace entries that are not configured repositories
    Clean {
        /// Only list what would be deleted
        #[arg(long)]
        dry_run: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Show branch, uncommitted and unpushed status of the repositories
    Report,

    /// Store a GitHub personal access token for the config generator
    Signin {
        /// Token to store, prompted for when omitted
        #[arg(long)]
        token: Option<String>,

        /// GitHub API root, for GitHub Enterprise
        #[arg(long)]
        github_api_base: Option<String>,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(
            *shell,
            &mut Cli::command(),
            "repoman",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    let context = build_context(&cli)?;
    execute_builtin_command(cli.command, &context).await
}

fn build_context(cli: &Cli) -> Result<CommandContext> {
    let scms = match &cli.scms_file {
        Some(path) => ScmTable::load(path)?,
        None => {
            let platform = cli
                .platform
                .as_deref()
                .unwrap_or(ScmTable::host_platform());
            ScmTable::for_platform(platform)?
        }
    };

    let tags = validators::parse_tags(cli.tags.as_deref())?;
    let selector = Selector::new(tags, cli.regex.as_deref())?;
    let options = ExecutionOptions::new(selector)
        .with_fail_fast(cli.fail_fast)
        .with_verbose(cli.verbose);

    let workspace = std::env::current_dir().context("Failed to determine the current directory")?;

    Ok(CommandContext {
        config_file: PathBuf::from(&cli.config_file),
        workspace,
        scms,
        options,
    })
}

async fn execute_builtin_command(command: Commands, context: &CommandContext) -> Result<()> {
    match command {
        Commands::Config {
            bitbucket_auth_user,
            bitbucket_auth_pass,
            github_user,
            github_org,
            github_auth_user,
            github_auth_pass,
            github_use_ssh,
            local,
            remove_extraneous,
        } => {
            validators::validate_credential_pair(
                "--bitbucket-auth-user",
                &bitbucket_auth_user,
                "--bitbucket-auth-pass",
                &bitbucket_auth_pass,
            )?;
            validators::validate_credential_pair(
                "--github-auth-user",
                &github_auth_user,
                "--github-auth-pass",
                &github_auth_pass,
            )?;

            let source = if let (Some(user), Some(pass)) = (bitbucket_auth_user, bitbucket_auth_pass)
            {
                ConfigSource::Bitbucket { user, pass }
            } else if github_user.is_some() || github_org.is_some() {
                ConfigSource::GitHub {
                    users: validators::split_list(github_user.as_deref()),
                    orgs: validators::split_list(github_org.as_deref()),
                    auth_user: github_auth_user,
                    auth_pass: github_auth_pass,
                    use_ssh: github_use_ssh,
                }
            } else if local {
                ConfigSource::Local {
                    dir: context.workspace.clone(),
                }
            } else {
                ConfigSource::Sample
            };

            ConfigCommand {
                source,
                remove_extraneous,
            }
            .execute(context)
            .await?;
        }
        Commands::Add {
            scm_type,
            name,
            url,
            tag,
        } => {
            validators::validate_tag_filters(&tag)?;
            let args =
                validators::validate_add_args(scm_type.as_deref(), name.as_deref(), url.as_deref())?;
            AddCommand { args, tags: tag }.execute(context).await?;
        }
        Commands::Remove { name, force } => {
            RemoveCommand { name, force }.execute(context).await?;
        }
        Commands::Init => ExecCommand::new("init").execute(context).await?,
        Commands::Get => ExecCommand::new("get").execute(context).await?,
        Commands::Changes => ExecCommand::new("changes").execute(context).await?,
        Commands::Save => ExecCommand::new("save").execute(context).await?,
        Commands::Undo => ExecCommand::new("undo").execute(context).await?,
        Commands::Delete => ExecCommand::new("delete").execute(context).await?,
        Commands::Exec { command } => ExecCommand::new(command).execute(context).await?,
        Commands::List => ListCommand.execute(context).await?,
        Commands::Clean { dry_run, force } => {
            CleanCommand { dry_run, force }.execute(context).await?;
        }
        Commands::Report => ReportCommand.execute(context).await?,
        Commands::Signin {
            token,
            github_api_base,
        } => {
            SigninCommand {
                token,
                api_base: github_api_base,
            }
            .execute(context)
            .await?;
        }
        Commands::Completions { .. } => {
            // handled in main() before the context is built
        }
    }

    Ok(())
}
