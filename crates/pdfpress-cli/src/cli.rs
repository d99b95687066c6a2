//! Argument parsing and dispatch for the pdfpress CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;
use uuid::Uuid;

use crate::client::{AppContext, CliDependencies, CliResult, parse_url};
use crate::commands::compress::handle_compress;
use crate::commands::health::handle_health;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
/// Slightly above the server's default compression timeout so the server
/// reports a timeout before the client gives up.
const DEFAULT_TIMEOUT_SECS: u64 = 330;

/// Parses CLI arguments, executes the requested command, and reports errors
/// on stderr. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let request_id = Uuid::new_v4().to_string();
    let deps = match CliDependencies::from_cli(&cli, &request_id) {
        Ok(deps) => deps,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    match dispatch(cli, &deps).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli, deps: &CliDependencies) -> CliResult<()> {
    let ctx = AppContext {
        client: deps.client.clone(),
        base_url: cli.api_url,
    };

    match cli.command {
        Command::Compress(args) => handle_compress(&ctx, args).await,
        Command::Health => handle_health(&ctx).await,
    }
}

#[derive(Parser)]
#[command(name = "pdfpress", about = "Compress PDF documents through a pdfpress server")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "PDFPRESS_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(
        long,
        global = true,
        env = "PDFPRESS_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Upload a PDF and save the compressed copy.
    Compress(CompressArgs),
    /// Report whether the server can reach Ghostscript.
    Health,
}

#[derive(Args, Debug)]
pub(crate) struct CompressArgs {
    /// PDF document to compress.
    pub(crate) file: PathBuf,
    /// Compression level; lower quality produces smaller files.
    #[arg(long, value_enum, default_value_t = Quality::Medium)]
    pub(crate) quality: Quality,
    /// Destination path. Defaults to `compressed_<name>` next to the input.
    #[arg(long, short)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Quality {
    Low,
    Medium,
    High,
}

impl Quality {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}
