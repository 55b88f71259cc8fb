//! KYC Dashboard Command Line Interface
//!
//! Browse corporations and signals, triage signals, run analysis jobs and
//! render arbitrary JSON through the drill-down renderer.
//!
//! # Usage
//!
//! ```bash
//! # List new signals for one corporation
//! kyc_cli signals --status new --corp-id 8801234567
//!
//! # Move a signal into review
//! kyc_cli set-status sig-42 review
//!
//! # Trigger an analysis and follow it until it finishes
//! kyc_cli analyze 8801234567
//!
//! # Drill into a saved payload and export it as CSV
//! kyc_cli drill --file stats.json --export csv
//! ```

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kyc_dashboard::drilldown::{ColumnSpec, DrillDownPanel, ExportFormat};
use kyc_dashboard::{
    Dashboard, DashboardConfig, JobOutcome, JobPhase, JobPoller, ListParams, SignalFilter,
    SignalStatus, WireSignalStatus,
};

#[derive(Parser)]
#[command(name = "kyc_cli")]
#[command(version = "0.1.0")]
#[command(about = "Browse the KYC signal dashboard API from the terminal")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: json, text, or pretty (default)
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Override the API base URL
    #[arg(long, global = true, env = "KYC_API_BASE_URL")]
    base_url: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
    Pretty,
}

/// Backend triage states accepted as a list filter
#[derive(Clone, Copy, ValueEnum)]
enum StatusFilterArg {
    New,
    Reviewed,
    Dismissed,
}

impl From<StatusFilterArg> for WireSignalStatus {
    fn from(arg: StatusFilterArg) -> Self {
        match arg {
            StatusFilterArg::New => Self::New,
            StatusFilterArg::Reviewed => Self::Reviewed,
            StatusFilterArg::Dismissed => Self::Dismissed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    New,
    Review,
    Resolved,
}

impl From<StatusArg> for SignalStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::New => Self::New,
            StatusArg::Review => Self::Review,
            StatusArg::Resolved => Self::Resolved,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportArg {
    Csv,
    Json,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Csv => Self::Csv,
            ExportArg::Json => Self::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List corporations
    Corporations {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },

    /// Show one corporation
    Corporation { corp_id: String },

    /// Show the latest KYC snapshot of a corporation
    Snapshot { corp_id: String },

    /// List signals
    Signals {
        #[arg(long, value_enum)]
        status: Option<StatusFilterArg>,
        #[arg(long)]
        corp_id: Option<String>,
        /// Signal category: direct, industry, environment
        #[arg(long)]
        signal_type: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },

    /// Show one signal
    Signal { signal_id: String },

    /// Set the triage status of a signal
    SetStatus {
        signal_id: String,
        #[arg(value_enum)]
        status: StatusArg,
    },

    /// Dismiss a signal with a reason
    Dismiss {
        signal_id: String,
        #[arg(short, long)]
        reason: String,
    },

    /// Signal counts by status, category and impact
    Stats,

    /// Dashboard headline numbers
    Summary,

    /// Trigger an analysis job for a corporation
    Analyze {
        corp_id: String,
        /// Return after queueing instead of following the job
        #[arg(long)]
        no_wait: bool,
    },

    /// Render a JSON document through the drill-down renderer
    Drill {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[arg(long, default_value = "Drill-down")]
        title: String,
        /// Print an export instead of the rendered view
        #[arg(long, value_enum)]
        export: Option<ExportArg>,
    },
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kyc_dashboard=info,kyc_client=info".into()),
        )
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{e:#}") }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;

    // Rendering a local document needs no backend
    if let Commands::Drill {
        file,
        title,
        export,
    } = cli.command
    {
        return cmd_drill(file, title, export, format);
    }

    let mut config = DashboardConfig::load()?;
    if let Some(url) = cli.base_url {
        config.api.base_url = url;
        config.validate()?;
    }
    let dashboard = Dashboard::from_config(&config)?;

    match cli.command {
        Commands::Corporations { limit, offset } => {
            let result = dashboard.corporations(ListParams { limit, offset }).await?;
            let columns = vec![
                ColumnSpec::new("id").header("ID"),
                ColumnSpec::new("name").header("Name"),
                ColumnSpec::new("industry").header("Industry"),
                ColumnSpec::new("foundedYear").header("Founded"),
                ColumnSpec::new("headquarters").header("Headquarters"),
            ];
            emit("Corporations", &*result.data, Some(columns), format)
        }
        Commands::Corporation { corp_id } => {
            let result = dashboard.corporation(&corp_id).await?;
            emit(&result.data.name, &*result.data, None, format)
        }
        Commands::Snapshot { corp_id } => {
            let result = dashboard.corporation_snapshot(&corp_id).await?;
            let title = match result.data.snapshot_version {
                Some(version) => format!("Snapshot v{version} of {corp_id}"),
                None => format!("Snapshot of {corp_id}"),
            };
            emit(&title, &result.data.snapshot_json, None, format)
        }
        Commands::Signals {
            status,
            corp_id,
            signal_type,
            limit,
            offset,
        } => {
            let filter = SignalFilter {
                status: status.map(Into::into),
                corp_id,
                signal_type,
                limit,
                offset,
            };
            let result = dashboard.signals(filter).await?;
            emit("Signals", &*result.data, Some(signal_columns()), format)
        }
        Commands::Signal { signal_id } => {
            let result = dashboard.signal(&signal_id).await?;
            emit(&result.data.title, &*result.data, None, format)
        }
        Commands::SetStatus { signal_id, status } => {
            let signal = dashboard
                .update_signal_status(&signal_id, status.into())
                .await?;
            if format == OutputFormat::Pretty {
                println!("{} {} is now {}", "OK".green(), signal.id, signal.status);
            }
            emit("Updated signal", &signal, None, format)
        }
        Commands::Dismiss { signal_id, reason } => {
            let signal = dashboard.dismiss_signal(&signal_id, &reason).await?;
            if format == OutputFormat::Pretty {
                println!("{} {} dismissed", "OK".green(), signal.id);
            }
            emit("Dismissed signal", &signal, None, format)
        }
        Commands::Stats => {
            let result = dashboard.signal_stats().await?;
            emit("Signal stats", &*result.data, None, format)
        }
        Commands::Summary => {
            let result = dashboard.dashboard_summary().await?;
            emit("Dashboard summary", &*result.data, None, format)
        }
        Commands::Analyze { corp_id, no_wait } => {
            cmd_analyze(&dashboard, &config, &corp_id, no_wait, format).await
        }
        Commands::Drill { .. } => unreachable!("handled before loading configuration"),
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

async fn cmd_analyze(
    dashboard: &Dashboard,
    config: &DashboardConfig,
    corp_id: &str,
    no_wait: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let queued = dashboard.trigger_analysis(corp_id).await?;
    if no_wait {
        return emit("Analysis job", &queued, None, format);
    }

    let handle = JobPoller::spawn(dashboard.clone(), &queued.job_id, &config.polling);
    let mut updates = handle.subscribe();

    if format == OutputFormat::Pretty {
        println!("{} job {}", "Queued".cyan().bold(), queued.job_id);
        let printer = tokio::spawn(async move {
            let mut last = None;
            while updates.changed().await.is_ok() {
                let snapshot = updates.borrow_and_update().clone();
                if last.as_ref() != Some(&snapshot.phase) {
                    let progress = snapshot
                        .status
                        .as_ref()
                        .and_then(|s| s.progress)
                        .map(|p| format!(" ({:.0}%)", p * 100.0))
                        .unwrap_or_default();
                    println!("  {:?}{}", snapshot.phase, progress);
                    last = Some(snapshot.phase);
                }
            }
        });
        let status = handle.wait().await;
        printer.await.ok();
        let status = status?;

        match JobPhase::from_wire(&status.status) {
            JobPhase::Terminal(JobOutcome::Succeeded) => {
                println!("{} analysis finished", "OK".green().bold());
                Ok(())
            }
            _ => bail!(
                "job {} ended as {}{}",
                status.job_id,
                status.status,
                status
                    .error_message
                    .as_deref()
                    .map(|m| format!(": {m}"))
                    .unwrap_or_default()
            ),
        }
    } else {
        let status = handle.wait().await?;
        emit("Analysis job", &*status, None, format)
    }
}

fn cmd_drill(
    file: Option<PathBuf>,
    title: String,
    export: Option<ExportArg>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let source = read_input(file)?;
    let value: serde_json::Value =
        serde_json::from_str(&source).context("Input is not valid JSON")?;
    let panel = DrillDownPanel::new(title, value);

    match export {
        Some(export) => println!("{}", panel.export(export.into())?),
        None => print_panel(&panel, format)?,
    }
    Ok(())
}

// =============================================================================
// OUTPUT
// =============================================================================

fn signal_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("id").header("ID"),
        ColumnSpec::new("corporationName").header("Corporation"),
        ColumnSpec::new("signalCategory").header("Category"),
        ColumnSpec::new("impact").header("Impact"),
        ColumnSpec::new("impactStrength").header("Strength"),
        ColumnSpec::new("confidence")
            .header("Confidence")
            .formatter(|v| format!("{:.0}%", v.as_f64().unwrap_or(0.0) * 100.0)),
        ColumnSpec::new("status").header("Status"),
        ColumnSpec::new("title").header("Title"),
    ]
}

fn emit<T: Serialize + ?Sized>(
    title: &str,
    payload: &T,
    columns: Option<Vec<ColumnSpec>>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let value = serde_json::to_value(payload)?;
    let mut panel = DrillDownPanel::new(title, value);
    if let Some(columns) = columns {
        panel = panel.columns(columns);
    }
    print_panel(&panel, format)
}

fn print_panel(panel: &DrillDownPanel, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&panel.value().to_value())?)
        }
        OutputFormat::Text => println!("{}", kyc_dashboard::drilldown::render_text(&panel.view())),
        OutputFormat::Pretty => {
            println!("{}", panel.title().cyan().bold());
            println!();
            println!("{}", kyc_dashboard::drilldown::render_text(&panel.view()));
        }
    }
    Ok(())
}

fn read_input(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read '{}'", path.display())),
        None => {
            if io::stdin().is_terminal() {
                bail!("No input provided. Use --file or pipe input via stdin.");
            }
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}
