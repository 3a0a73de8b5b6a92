//! CLI for downstream-sync.
//!
//! Copies changelog metadata from an upstream pull request to its generated
//! downstream pull requests, and checks that those downstreams have merged.

use clap::{Args, Parser, Subcommand};
use downstream_sync::{
    read_pr_number, resolve_token, ChangelogMetadata, ConfigError, PatchReport, Runner,
    RunnerConfig, RunnerError, Settings, SyncSummary,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Downstream Sync - Keep generated downstream pull requests in step with their upstream.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// GitHub Personal Access Token (falls back to GH_TOKEN).
    #[arg(long, env = "GITHUB_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Repository holding the upstream pull requests.
    #[arg(long, global = true)]
    upstream_repository: Option<String>,

    /// Path to a TOML settings file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy the upstream release note and changelog labels to downstreams.
    Changelog {
        #[command(flatten)]
        target: UpstreamTarget,

        /// Downstream repositories allowed to receive changelog metadata.
        #[arg(long, num_args = 1..)]
        repos: Vec<String>,

        /// Preview changes without editing downstream pull requests.
        #[arg(long)]
        dry_run: bool,
    },

    /// Fail while any downstream pull request is still open.
    EnsureMerged {
        #[command(flatten)]
        target: UpstreamTarget,
    },

    /// List the downstream pull requests of an upstream pull request.
    Downstreams {
        #[command(flatten)]
        target: UpstreamTarget,
    },

    /// Save patches of merged downstreams for every open upstream pull request.
    DownloadPatches {
        /// Directory receiving `<owner>/<repo>/<number>.patch` files.
        #[arg(long, default_value = "patches")]
        output: PathBuf,
    },
}

/// Upstream pull request, by number or by id file.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct UpstreamTarget {
    /// File containing the upstream pull request number.
    #[arg(long)]
    id_file: Option<PathBuf>,

    /// Upstream pull request number.
    #[arg(long)]
    pr: Option<u64>,
}

impl UpstreamTarget {
    fn number(&self) -> Result<u64, RunnerError> {
        match (self.pr, &self.id_file) {
            (Some(number), _) => Ok(number),
            (None, Some(path)) => Ok(read_pr_number(path)?),
            (None, None) => Err(ConfigError::ValidationError {
                path: "--pr".to_string(),
                message: "an upstream pull request is required, pass --pr or --id-file"
                    .to_string(),
            }
            .into()),
        }
    }
}

/// What a command produced, mapped to an exit code.
enum Outcome {
    Changelog(SyncSummary),
    Unmerged(Vec<String>),
    Downstreams(Vec<String>),
    Patches(PatchReport),
}

impl Outcome {
    fn is_success(&self) -> bool {
        match self {
            Self::Changelog(summary) => !summary.has_failures(),
            Self::Unmerged(urls) => urls.is_empty(),
            Self::Downstreams(_) => true,
            Self::Patches(report) => !report.has_failures(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(outcome) => {
            print_outcome(&outcome, json);

            if outcome.is_success() {
                ExitCode::from(0)
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Log lines go to stderr so stdout carries only command output.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        // RUST_LOG overrides; "info" otherwise
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Builds the runner configuration from the settings file and flags.
fn build_config(cli: &Cli) -> Result<RunnerConfig, RunnerError> {
    let token = resolve_token(cli.token.clone())?;
    let mut config = RunnerConfig::new(token);

    if let Some(path) = &cli.config {
        config = config.with_settings(Settings::load(path)?);
    }
    if let Some(upstream) = &cli.upstream_repository {
        config = config.with_upstream_repository(upstream);
    }

    if let Command::Changelog { repos, dry_run, .. } = &cli.command {
        if !repos.is_empty() {
            config = config.with_allowed_repositories(repos.iter().cloned());
        }
        config = config.with_dry_run(*dry_run);
    }

    Ok(config)
}

/// Main execution logic.
async fn run(cli: Cli) -> Result<Outcome, RunnerError> {
    let config = build_config(&cli)?;
    let runner = Runner::new(config)?;

    match &cli.command {
        Command::Changelog { target, .. } => {
            let plan = runner.prepare_changelog(target.number()?).await?;
            // stdout is reserved for the JSON document
            let shown = if cli.json {
                write_metadata(&mut std::io::stderr().lock(), &plan.metadata)
            } else {
                write_metadata(&mut std::io::stdout().lock(), &plan.metadata)
            };
            if let Err(e) = shown {
                error!(error = %e, "Failed to print changelog metadata");
            }
            Ok(Outcome::Changelog(runner.apply_changelog(&plan).await))
        }
        Command::EnsureMerged { target } => {
            Ok(Outcome::Unmerged(runner.ensure_merged(target.number()?).await?))
        }
        Command::Downstreams { target } => Ok(Outcome::Downstreams(
            runner.list_downstreams(target.number()?).await?,
        )),
        Command::DownloadPatches { output } => {
            Ok(Outcome::Patches(runner.download_patches(output).await?))
        }
    }
}

/// Writes the metadata about to be written downstream.
fn write_metadata(out: &mut impl Write, metadata: &ChangelogMetadata) -> io::Result<()> {
    writeln!(out, "Release Note:")?;
    if metadata.release_note.is_empty() {
        writeln!(out, "  (none)")?;
    } else {
        for line in metadata.release_note.lines() {
            writeln!(out, "  {line}")?;
        }
    }
    writeln!(out, "Labels: {}", metadata.labels.join(", "))
}

fn print_outcome(outcome: &Outcome, json: bool) {
    if json {
        print_json(outcome);
        return;
    }

    match outcome {
        Outcome::Changelog(summary) => print_summary(summary),
        Outcome::Unmerged(urls) => {
            if urls.is_empty() {
                println!("All downstream pull requests are merged.");
            } else {
                println!("Unmerged downstream pull requests:");
                for url in urls {
                    println!("  {url}");
                }
            }
        }
        Outcome::Downstreams(urls) => {
            for url in urls {
                println!("{url}");
            }
        }
        Outcome::Patches(report) => {
            println!("\nSummary:");
            println!("  Patches downloaded: {}", report.downloaded.len());
            println!("  Patches already present: {}", report.existing.len());
            println!("  Failures: {}", report.failures.len());
            for failure in &report.failures {
                println!("    {}: {}", failure.target, failure.error);
            }
        }
    }
}

fn print_json(outcome: &Outcome) {
    let rendered = match outcome {
        Outcome::Changelog(summary) => summary.to_json(),
        Outcome::Unmerged(urls) | Outcome::Downstreams(urls) => serde_json::to_string_pretty(urls),
        Outcome::Patches(report) => serde_json::to_string_pretty(report),
    };

    match rendered {
        Ok(text) => println!("{text}"),
        Err(e) => error!(error = %e, "Failed to render JSON output"),
    }
}

/// Prints the final changelog summary.
fn print_summary(summary: &SyncSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Downstreams updated: {}", summary.updated);
    println!("  Downstreams skipped: {}", summary.skipped);
    println!("  Downstreams failed: {}", summary.failed.len());
    for failed in &summary.failed {
        println!("    {}: {}", failed.url, failed.error);
    }
}
