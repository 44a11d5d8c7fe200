//! flowlog-stacks - VPC flow log stacks for Terraform
//!
//! This is the main entry point for the flowlog-stacks CLI.

mod cli;

use anyhow::Result;
use cli::commands::{CommandContext, Runnable};
use cli::{Cli, Commands};
use flowlog_stacks::config::{parse_tag, Settings};
use flowlog_stacks::error::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application version information
const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

fn main() {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Display version if verbose
    if cli.verbosity() >= 2 {
        eprintln!("flowlog-stacks v{VERSION} by {AUTHORS}");
    }

    // Load settings: file, environment, then command line
    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            let output = cli::output::OutputFormatter::new(!cli.no_color, cli.is_json(), 0);
            output.error(&e.to_string());
            output.hint("Set vpc_id and tags in flowlogs.toml or pass --vpc-id and --tag");
            std::process::exit(e.exit_code());
        }
    };

    // Create command context
    let mut ctx = CommandContext::new(&cli, settings);

    // Execute the appropriate command
    let exit_code = match run(&cli.command, &mut ctx) {
        Ok(code) => code,
        Err(e) => {
            ctx.output.error(&format!("{e:#}"));
            e.downcast_ref::<Error>().map_or(1, Error::exit_code)
        }
    };

    std::process::exit(exit_code);
}

fn run(command: &Commands, ctx: &mut CommandContext) -> Result<i32> {
    match command {
        Commands::Synth(args) => args.run(ctx),
        Commands::Plan(args) => args.run(ctx),
        Commands::Graph(args) => args.run(ctx),
        Commands::Outputs(args) => args.run(ctx),
        Commands::Fields(args) => args.run(ctx),
        Commands::List(args) => args.run(ctx),
    }
}

fn load_settings(cli: &Cli) -> flowlog_stacks::error::Result<Settings> {
    let tags = cli
        .tags
        .iter()
        .map(|pair| parse_tag(pair))
        .collect::<flowlog_stacks::error::Result<Vec<_>>>()?;

    Ok(Settings::load(cli.config.as_deref())?.with_overrides(
        cli.vpc_id.as_deref(),
        cli.region.as_deref(),
        &tags,
    ))
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= 3),
        )
        .with(env_filter)
        .init();
}
