use anyhow::Result;
use clap::Parser;
use hvm::commands::{self, BuildInfo, Context, InstallOptions, StatusOptions, UseOptions};
use hvm::runtime::RealRuntime;
use std::path::PathBuf;
use std::process::ExitCode;

/// hvm - Hugo Version Manager
///
/// Download and manage multiple versions of the Hugo static site generator,
/// and pin one to each project directory.
///
/// Set HVM_GITHUBTOKEN (or githubToken in the configuration file) to avoid
/// GitHub API rate limits.
///
/// Examples:
///   hvm use --tag 0.120    # Use the latest v0.120.x in this directory
///   hvm install            # Pick a default version
///   hvm status             # Show the pinned and cached versions
#[derive(Parser, Debug)]
#[command(author, version = env!("HVM_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Cache directory (overrides the per-user default; also via HVM_CACHEDIR)
    #[arg(long = "cache-dir", env = "HVM_CACHEDIR", value_name = "PATH", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Configuration directory (overrides the per-user default; also via HVM_CONFIGDIR)
    #[arg(long = "config-dir", env = "HVM_CONFIGDIR", value_name = "PATH", global = true)]
    pub config_dir: Option<PathBuf>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Select which version of Hugo to use in the current directory
    Use(UseArgs),

    /// Install a default version to use when version management is disabled
    Install(InstallArgs),

    /// Remove the default version
    #[command(alias = "uninstall")]
    Remove,

    /// Display the status
    Status(StatusArgs),

    /// Clean the cache
    Clean,

    /// Disable version management in the current directory
    Disable,

    /// Display application details
    Version,
}

#[derive(clap::Args, Debug)]
pub struct UseArgs {
    /// The version to use, such as "latest", "0.120", or "v0.120.1"
    #[arg(long = "tag", value_name = "VERSION", conflicts_with_all = ["latest", "use_version_in_dot_file"])]
    pub tag: Option<String>,

    /// Use the latest release
    #[arg(long = "latest", conflicts_with = "use_version_in_dot_file")]
    pub latest: bool,

    /// Use the version specified by the .hvm file in the current directory
    #[arg(long = "useVersionInDotFile")]
    pub use_version_in_dot_file: bool,
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// The version to install, such as "latest", "0.120", or "v0.120.1"
    #[arg(value_name = "VERSION", conflicts_with = "use_version_in_dot_file")]
    pub version: Option<String>,

    /// Install the version specified by the .hvm file in the current directory
    #[arg(long = "useVersionInDotFile")]
    pub use_version_in_dot_file: bool,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Print the path to the Hugo executable for the version in the .hvm file,
    /// otherwise exit with code 1. The executable may not exist.
    #[arg(long = "printExecPath", conflicts_with = "print_exec_path_cached")]
    pub print_exec_path: bool,

    /// Print the path to the Hugo executable for the version in the .hvm file
    /// if it is cached, otherwise exit with code 1
    #[arg(long = "printExecPathCached")]
    pub print_exec_path_cached: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let ctx = Context::new(RealRuntime, cli.cache_dir, cli.config_dir, cli.api_url)?;

    match cli.command {
        Commands::Use(args) => {
            let options = UseOptions {
                tag: args.tag,
                latest: args.latest,
                use_version_in_dot_file: args.use_version_in_dot_file,
            };
            commands::use_version(ctx, options).await?
        }
        Commands::Install(args) => {
            let options = InstallOptions {
                version: args.version,
                use_version_in_dot_file: args.use_version_in_dot_file,
            };
            commands::install(ctx, options).await?
        }
        Commands::Remove => commands::remove(&ctx.runtime, &ctx.paths, &ctx.platform)?,
        Commands::Status(args) => {
            let options = StatusOptions {
                print_exec_path: args.print_exec_path,
                print_exec_path_cached: args.print_exec_path_cached,
            };
            return commands::status(&ctx.runtime, &ctx.paths, &ctx.platform, &ctx.config, options);
        }
        Commands::Clean => commands::clean(&ctx.runtime, &ctx.paths, &ctx.platform)?,
        Commands::Disable => commands::disable(&ctx.runtime, &ctx.paths)?,
        Commands::Version => {
            commands::version(&ctx.github, &BuildInfo::current(), &ctx.platform).await?
        }
    }
    Ok(ExitCode::SUCCESS)
}
