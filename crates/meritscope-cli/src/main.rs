use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use meritscope_numerical::{MeritFunction, Problem};
use meritscope_render::{plan, ComparisonDataset, FigureRenderer, SvgRenderer};
use meritscope_trace::load_run;
use meritscope_types::DualState;

mod config;
mod inspect;
mod logging;

use config::VizConfig;

/// meritscope - contour diagnostics for constrained optimizer traces
#[derive(Parser)]
#[command(name = "meritscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compare two constrained solver runs on contour plots", long_about = "meritscope\n\nRenders the inner trajectories of two solver variants over the level sets of\nthe objective (or the box-constrained augmented Lagrangian merit function),\nwith both constraint boundaries, one panel per outer iteration.")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the side-by-side comparison figure
    Plot {
        /// Trace of the first solver variant (YAML or JSON)
        first: PathBuf,
        /// Trace of the second solver variant
        second: PathBuf,
        /// Configuration file (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output SVG file
        #[arg(short, long, default_value = "comparison.svg")]
        output: PathBuf,
        /// Draw the per-iteration merit function instead of the objective
        #[arg(long)]
        show_merit: bool,
        /// Grid spacing override
        #[arg(long)]
        step: Option<f64>,
        /// Two row labels, comma separated
        #[arg(long, value_delimiter = ',')]
        labels: Option<Vec<String>>,
    },
    /// Evaluate objective, constraints and merit at one point
    Eval {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        /// Dual vector λ, comma separated
        #[arg(long, value_delimiter = ',', default_value = "0,0")]
        lambda: Vec<f64>,
        /// Penalty weights Σ, comma separated
        #[arg(long, value_delimiter = ',', default_value = "1,1")]
        sigma: Vec<f64>,
        /// Configuration file (problem preset and box bounds)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Summarize the outer iterations of one trace
    Inspect {
        /// Trace file to inspect
        trace: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = logging::init_tracing(cli.verbose) {
        eprintln!("Warning: {}", err);
    }

    if let Err(err) = run(cli.command) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Plot {
            first,
            second,
            config,
            output,
            show_merit,
            step,
            labels,
        } => {
            let mut config = load_config(config.as_deref())?;
            config.show_merit_field |= show_merit;
            if let Some(step) = step {
                config.step = step;
            }
            if let Some(labels) = labels {
                config.labels = <[String; 2]>::try_from(labels)
                    .map_err(|given| anyhow::anyhow!("--labels expects 2 labels, got {}", given.len()))?;
            }
            plot_command(&first, &second, &config, &output)
        }
        Commands::Eval {
            x,
            y,
            lambda,
            sigma,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            eval_command(x, y, &lambda, &sigma, &config)
        }
        Commands::Inspect { trace, json } => inspect_command(&trace, json),
    }
}

fn load_config(path: Option<&Path>) -> Result<VizConfig> {
    match path {
        Some(path) => {
            let config = VizConfig::load(path).with_context(|| format!("loading config '{}'", path.display()))?;
            debug!(?config, "loaded configuration");
            Ok(config)
        }
        None => Ok(VizConfig::default()),
    }
}

fn merit_function(config: &VizConfig) -> MeritFunction {
    MeritFunction::new(Problem::from_kind(config.problem), config.bounds)
}

// ============================================================================
// PLOT COMMAND
// ============================================================================

fn plot_command(first: &Path, second: &Path, config: &VizConfig, output: &Path) -> Result<()> {
    let [first_label, second_label] = config.labels.clone();
    let first = load_run(first, first_label)?;
    let second = load_run(second, second_label)?;

    let levels = config.active_levels().context("building contour levels")?;
    let dataset = ComparisonDataset::pair(first, second, config.domain(), levels)?;
    let figure = plan(&dataset, &merit_function(config), &config.plan_options())?;

    let [width, height] = config.figure_size;
    SvgRenderer::new(output)
        .with_size(width, height)
        .render(&figure)
        .with_context(|| format!("rendering '{}'", output.display()))?;

    println!(
        "Wrote {} ({} runs × {} iterations)",
        output.display(),
        figure.row_count(),
        figure.column_count()
    );
    Ok(())
}

// ============================================================================
// EVAL COMMAND
// ============================================================================

fn eval_command(x: f64, y: f64, lambda: &[f64], sigma: &[f64], config: &VizConfig) -> Result<()> {
    let merit = merit_function(config);
    let dual = DualState::from_slices(lambda, sigma)?;
    let g = merit.problem().constraints_at(x, y);
    let d = merit.residual(x, y, &dual);

    println!("f(x, y)   = {}", merit.problem().objective_at(x, y));
    println!("g(x, y)   = [{}, {}]", g[0], g[1]);
    println!("d         = [{}, {}]", d[0], d[1]);
    println!("penalty   = {}", merit.penalty(x, y, &dual));
    println!("ψ(x, y)   = {}", merit.value(x, y, &dual));
    Ok(())
}

// ============================================================================
// INSPECT COMMAND
// ============================================================================

fn inspect_command(trace: &Path, json_output: bool) -> Result<()> {
    let label = trace
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let run = load_run(trace, label)?;
    let summary = inspect::summarize(&run)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if summary.is_empty() {
        println!("No iterations in: {}", trace.display());
    } else {
        println!("Iterations in '{}':", trace.display());
        for entry in &summary {
            println!("{}", inspect::format_summary(entry));
        }
    }
    Ok(())
}
