//! `qp-dbbact` binary.
//!
//! Prints the [`pipeline::JobOutcome`] as JSON on stdout and exits non-zero
//! when the run failed. Setup errors (unreadable config, unreachable Qiita)
//! are reported through `anyhow` on stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cli::commands::{run_local, run_qiita, QiitaArgs, RunArgs};
use cli::config::Config;
use cli::registration::registration;
use cli::telemetry::{init_tracing, LogFormat};
use pipeline::{JobOutcome, DBBACT_PLUGIN};

#[derive(Parser)]
#[command(name = "qp-dbbact", version, about = "dbBact wordcloud plugin for Qiita")]
struct Cli {
    /// Configuration file; `qp-dbbact.toml` in the working directory by default
    #[arg(long, global = true, env = "QP_DBBACT_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Default log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run against artifacts listed in a local manifest
    Run(RunArgs),
    /// Execute a job scheduled by a Qiita server
    Qiita(QiitaArgs),
    /// Print the plugin registration record
    Manifest,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_format, &cli.log_level);
    let config = Config::load(cli.config.as_deref())?;

    let outcome = match &cli.command {
        Commands::Run(args) => run_local(&config, args).await?,
        Commands::Qiita(args) => run_qiita(&config, args).await?,
        Commands::Manifest => {
            let record = registration(&DBBACT_PLUGIN, &config.parameter_defaults()?);
            println!("{}", serde_json::to_string_pretty(&record)?);
            return Ok(ExitCode::SUCCESS);
        }
    };
    report(&outcome)
}

fn report(outcome: &JobOutcome) -> anyhow::Result<ExitCode> {
    let json = serde_json::to_string_pretty(outcome).context("serializing job outcome")?;
    println!("{json}");
    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
