use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use schemagen_cli::pipeline::{
    ExplicitParams, PipelineError, PipelineReport, RunOverrides, run_explicit, run_from_config,
};
use schemagen_introspect::DriverRegistry;

const USAGE: &str = "\
Usage:
  schemagen <config-ref> [output-dir]
  schemagen <driver> <db-driver> <url> <output-dir> <package> [user password]

A config reference is a TOML file path with an optional #section fragment.
";

#[derive(Parser, Debug)]
#[command(
    name = "schemagen",
    version,
    about = "Extract a database schema model and generate Rust source from it"
)]
struct Cli {
    /// Positional arguments; the run style is chosen by how many there are.
    #[arg(value_name = "ARG")]
    args: Vec<String>,

    /// Keep catalog and schema exactly as the driver reports them.
    #[arg(long)]
    no_swap: bool,

    /// Abort extraction after this many seconds (default: wait forever).
    #[arg(long, value_name = "SECS")]
    extract_timeout: Option<u64>,

    /// Verbose output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = RunOverrides {
        no_swap: cli.no_swap,
        extract_timeout: cli.extract_timeout.map(Duration::from_secs),
    };
    let registry = DriverRegistry::builtin();

    match dispatch(&registry, cli.args, &overrides).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            println!("{USAGE}");
            process::exit(1);
        }
        Err(err) => {
            error!(error = %err, "run failed");
            process::exit(1);
        }
    }
}

/// Choose the run style by argument count. `None` means the arity matched
/// neither style and the caller should print usage.
async fn dispatch(
    registry: &DriverRegistry,
    args: Vec<String>,
    overrides: &RunOverrides,
) -> Result<Option<PipelineReport>, PipelineError> {
    match args.len() {
        1 => run_from_config(registry, &args[0], None, overrides)
            .await
            .map(Some),
        2 => {
            let output_dir = PathBuf::from(&args[1]);
            run_from_config(registry, &args[0], Some(output_dir), overrides)
                .await
                .map(Some)
        }
        5 | 7 => {
            let mut args = args.into_iter();
            let params = ExplicitParams {
                driver: args.next().unwrap_or_default(),
                db_driver: args.next().unwrap_or_default(),
                url: args.next().unwrap_or_default(),
                output_dir: PathBuf::from(args.next().unwrap_or_default()),
                package: args.next().unwrap_or_default(),
                user: args.next(),
                password: args.next(),
            };
            run_explicit(registry, params, overrides).await.map(Some)
        }
        _ => Ok(None),
    }
}
