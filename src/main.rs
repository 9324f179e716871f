//! hookcheck - deployment and review hook checks.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hookcheck::config::Config;
use hookcheck::runner::{ConsoleReporter, SilentReporter};
use hookcheck::{CheckRunner, Error, Hook, Mode, SystemRunner};

#[derive(Parser)]
#[command(name = "hookcheck")]
#[command(about = "Pre/post-deployment and pre-review hook checks")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.hookcheck/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the outcome as JSON instead of status lines
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check tooling and cluster access before a deployment
    PreDeploy,

    /// Wait for pods to become ready and run smoke tests
    PostDeploy,

    /// Check the working tree before starting a review
    PreReview,

    /// List the checks of a hook without running them
    List {
        #[arg(value_enum)]
        hook: Hook,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "hookcheck=debug"
    } else {
        "hookcheck=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!(error = %e, "hookcheck failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<u8, Error> {
    let config = Config::load(cli.config.as_deref())?;

    let hook = match cli.command {
        Commands::PreDeploy => Hook::PreDeploy,
        Commands::PostDeploy => Hook::PostDeploy,
        Commands::PreReview => Hook::PreReview,
        Commands::List { hook } => {
            list(hook, &config);
            return Ok(0);
        }
    };

    let checks = hook.checks(&config);

    if cli.json {
        let commands = SystemRunner::new().inherited_to_stderr();
        let outcome = CheckRunner::new(&commands).run(hook.name(), &checks, &mut SilentReporter);
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        Ok(outcome.exit_code())
    } else {
        let commands = SystemRunner::new();
        let outcome = CheckRunner::new(&commands).run(hook.name(), &checks, &mut ConsoleReporter);
        Ok(outcome.exit_code())
    }
}

fn list(hook: Hook, config: &Config) {
    println!("{} checks:", hook);
    for (i, check) in hook.checks(config).iter().enumerate() {
        let mode = match check.mode {
            Mode::Strict => "strict",
            Mode::Advisory => "advisory",
        };
        match &check.command {
            Some(command) => println!("  {}. {} [{}]: {}", i + 1, check.name, mode, command),
            None => println!("  {}. {} [{}]: (no command)", i + 1, check.name, mode),
        }
    }
}
