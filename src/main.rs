//! netresource - declarative network resource engine
//!
//! This is the main entry point for the netresource CLI.

mod cli;

use anyhow::Result;
use cli::commands::{CommandContext, Runnable};
use cli::{Cli, Commands};
use netresource::config::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application version information
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let cli = Cli::parse_args();

    // Load configuration before logging so the log format can come from it
    let (config, config_error) = match Config::load(cli.config.as_ref()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    init_logging(cli.verbosity(), &config);

    if cli.verbosity() >= 2 {
        eprintln!("netresource v{}", VERSION);
    }

    let mut ctx = CommandContext::new(&cli, config);

    if let Some(e) = config_error {
        ctx.output
            .warning(&format!("Failed to load config, using defaults: {:#}", e));
    }

    let exit_code = match run(&cli, &mut ctx) {
        Ok(code) => code,
        Err(e) => {
            ctx.output.error(&format!("{:#}", e));
            e.downcast_ref::<netresource::Error>()
                .map(netresource::Error::exit_code)
                .unwrap_or(1)
        }
    };

    ctx.output.flush();
    std::process::exit(exit_code);
}

fn run(cli: &Cli, ctx: &mut CommandContext) -> Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(ctx),
        Commands::Facts(args) => args.execute(ctx),
        Commands::List(args) => args.execute(ctx),
    }
}

/// Initialize logging based on verbosity level.
///
/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(verbosity: u8, config: &Config) {
    let filter = match verbosity {
        0 => config.logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.json_logs() {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(verbosity >= 3)
                    .with_ansi(config.colors.enabled)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
