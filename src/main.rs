mod aggregate;
mod config;
mod correlate;
mod discover;
mod metrics;
mod plot;
mod ratio;
mod report;
mod scalar;

use clap::{Parser, Subcommand};
use config::StatsConfig;
use correlate::{CaseFilter, RecordStats};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Extract P/D/F and Sim/Sat metrics from benchmark logs, summarize them
/// per category, and plot execution time against circuit size.
#[derive(Parser, Debug)]
#[command(name = "circuit-stats", version, about)]
pub struct Cli {
    /// Config file path (default: circuit-stats.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Extra logging (per-file decisions, dropped cases)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute DF and time ratios for every configured category and write the CSV
    Summarize {
        /// CSV output path (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the full-precision report as JSON instead of writing CSV
        #[arg(long)]
        json: bool,
    },
    /// Plot execution time vs AND gates vs levels from .time/.and/.lev files
    Plot(PlotArgs),
}

#[derive(clap::Args, Debug)]
struct PlotArgs {
    /// Directory to search for .time, .and, and .lev files
    directory: PathBuf,

    /// Output file for the 3D plot (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also create 2D projections
    #[arg(short = '2', long)]
    projections: bool,

    /// Prefix for the 2D projections file (overrides config)
    #[arg(long)]
    output_prefix: Option<String>,

    /// Filter circuits by type
    #[arg(short, long, value_enum, default_value_t = CaseFilter::All)]
    filter: CaseFilter,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    tracing::debug!(?cli, "parsed CLI arguments");

    let (config_path, explicit) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(config::DEFAULT_CONFIG_FILE), false),
    };
    let config = match config::load_config(&config_path, explicit) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Summarize { output, json } => run_summarize(&config, output, json),
        Command::Plot(args) => run_plot(&config, args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_summarize(
    config: &StatsConfig,
    output: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        categories = config.categories.len(),
        "summarizing benchmark logs"
    );
    let reports = aggregate::run_all(&config.categories, &config.summary.log_extension);

    if json {
        println!("{}", report::render_json(&reports)?);
        return Ok(());
    }

    let path = output.unwrap_or_else(|| config.summary.output.clone());
    report::write_csv(&path, &reports, config.summary.header)?;
    println!("Results exported to {}", path.display());
    Ok(())
}

fn run_plot(config: &StatsConfig, args: PlotArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.directory.is_dir() {
        return Err(format!("Directory '{}' not found", args.directory.display()).into());
    }

    println!("Collecting data from {}...", args.directory.display());
    println!("Using filter: {}", args.filter);
    let correlation = correlate::collect_records(&args.directory, args.filter, &config.artifacts);

    let Some(stats) = RecordStats::from_records(&correlation.records) else {
        let exts = &config.artifacts;
        println!(
            "No complete datasets found (need matching .{}, .{}, and .{} files)",
            exts.time_extension, exts.and_extension, exts.level_extension
        );
        return Ok(());
    };

    println!("Plotted {} circuits", stats.count);
    println!(
        "AND gates range: {:.0} - {:.0}",
        stats.and_gates.0, stats.and_gates.1
    );
    println!("Levels range: {:.0} - {:.0}", stats.levels.0, stats.levels.1);
    println!("Time range: {:.3} - {:.3} sec", stats.time.0, stats.time.1);

    let size = (config.plot.width, config.plot.height);
    let output = args.output.unwrap_or_else(|| config.plot.output.clone());
    plot::plot_3d_scatter(&correlation.records, &output, size)?;
    println!("Plot saved to {}", output.display());

    if args.projections {
        let prefix = args
            .output_prefix
            .unwrap_or_else(|| config.plot.output_prefix.clone());
        let path = plot::projections_path(&prefix);
        let sheet = (size.0 * 3 / 2, size.1 * 3 / 5);
        plot::plot_2d_projections(&correlation.records, &path, sheet)?;
        println!("2D projections saved to {}", path.display());
    }

    Ok(())
}
