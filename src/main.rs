use clap::{Parser, Subcommand};
use modai::config::{ConfigOverrides, ShellConfig};
use std::io::IsTerminal;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// Use jemalloc on musl x86_64 for better performance
#[cfg(all(target_env = "musl", target_arch = "x86_64"))]
#[global_allocator]
static ALLOC: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser)]
#[command(
    name = "modai",
    about = "Load, activate and inspect the modules of the modAI chat frontend",
    long_about = None,
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    /// Manifest location: an http(s) URL or a local JSON file.
    #[arg(long, global = true)]
    manifest: Option<String>,

    /// Active feature flag (repeatable).
    #[arg(long = "flag", global = true)]
    flags: Vec<String>,

    /// Seconds to wait for the manifest before giving up.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// More log output (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Activate the manifest's modules and list the result.
    Activate {
        #[arg(long)]
        json: bool,
    },
    /// List active modules of a given type.
    Query {
        module_type: String,
        /// Require exactly one match; ambiguous lookups print `none`.
        #[arg(long)]
        one: bool,
    },
    /// Show the routes, sidebar and provider tree built from active modules.
    Compose {
        #[arg(long)]
        json: bool,
    },
    /// Fail if any module is dropped or excluded.
    Check,
    /// List the component paths this build can resolve.
    Components,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let overrides = ConfigOverrides {
        manifest: cli.manifest,
        flags: cli.flags,
        fetch_timeout_secs: cli.timeout,
    };

    let result = match cli.command {
        Commands::Components => modai::commands::components::run(),
        command => match ShellConfig::resolve(&overrides) {
            Ok(config) => match command {
                Commands::Activate { json } => modai::commands::activate::run(&config, json).await,
                Commands::Query { module_type, one } => {
                    modai::commands::query::run(&config, &module_type, one).await
                }
                Commands::Compose { json } => modai::commands::compose::run(&config, json).await,
                Commands::Check => modai::commands::check::run(&config).await,
                Commands::Components => modai::commands::components::run(),
            },
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        })
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
