//! cmvc-scm - change detection for CMVC families
//!
//! Binary entry point: poll a family, check out its changes, or print a
//! stored changelog.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use tracing_subscriber::EnvFilter;

use cmvc_scm::checkout::ScriptCheckout;
use cmvc_scm::cmvc::constants::dates;
use cmvc_scm::config::Config;
use cmvc_scm::scm::{BuildHistory, CmvcScm};
use cmvc_scm::{changelog, scm};

#[derive(Parser)]
#[command(name = "cmvc-scm")]
#[command(about = "Detect and check out integrated CMVC tracks", long_about = None)]
#[command(version)]
struct Cli {
    /// Job configuration file
    #[arg(long, short, default_value = "cmvc.toml", global = true)]
    config: PathBuf,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Exit 0 if a build is needed, 2 if nothing changed, 1 on error
    Poll {
        /// The job has never been built
        #[arg(long, conflicts_with = "last_success")]
        no_prior_build: bool,

        /// Start of the last successful build (`YYYY/MM/DD HH:MM:SS`)
        #[arg(long, value_parser = parse_date)]
        last_success: Option<NaiveDateTime>,
    },

    /// Check out integrated tracks and write the changelog
    Checkout {
        #[arg(long)]
        workspace: PathBuf,

        #[arg(long)]
        changelog: PathBuf,

        /// Start of the last successful build (`YYYY/MM/DD HH:MM:SS`)
        #[arg(long, value_parser = parse_date)]
        last_success: Option<NaiveDateTime>,
    },

    /// Print a changelog written by `checkout`
    ShowChangelog { path: PathBuf },

    /// Print the environment passed to CMVC tools
    Env,
}

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Poll {
            no_prior_build,
            last_success,
        } => {
            let history = if no_prior_build {
                BuildHistory::NoPriorBuild
            } else {
                BuildHistory::Built { last_success }
            };
            let scm = CmvcScm::from_config(load_config(&cli.config)?)?;
            let outcome = scm.poll(history, now())?;
            println!("{}", if outcome.has_changes() { "changes" } else { "no changes" });
            Ok(ExitCode::from(outcome.exit_status()))
        }
        Command::Checkout {
            workspace,
            changelog,
            last_success,
        } => {
            let scm = CmvcScm::from_config(load_config(&cli.config)?)?;
            let script = scm
                .config()
                .checkout_script
                .clone()
                .ok_or_else(|| eyre!("checkout_script is not configured"))?;
            let checkout = ScriptCheckout::new(script).with_envs(scm.env_vars());

            let outcome = scm
                .checkout(last_success, now(), &workspace, &changelog, &checkout)
                .wrap_err("Error performing checkout")?;
            println!(
                "{} track(s) checked out for {} release(s)",
                outcome.model.len(),
                outcome.checked_out.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::ShowChangelog { path } => {
            let model = changelog::read_file(&path)
                .wrap_err_with(|| format!("Cannot read changelog {}", path.display()))?;
            for entry in model.entries() {
                println!(
                    "{} [{}] {} {} {}",
                    entry.track_id,
                    entry.release_name,
                    entry.user,
                    entry.last_update.format(dates::FORMAT),
                    entry.description
                );
                for file in &entry.files {
                    println!("    {} {}", file.revision, file.file_name);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Env => {
            let config = load_config(&cli.config)?;
            for (key, value) in scm::env_vars(&config) {
                println!("{}={}", key, value);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &std::path::Path) -> color_eyre::Result<Config> {
    Config::load(path).wrap_err_with(|| format!("Invalid configuration {}", path.display()))
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn parse_date(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, dates::FORMAT)
        .map_err(|e| format!("expected {}: {}", dates::FORMAT, e))
}
