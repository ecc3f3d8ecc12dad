use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use matscreen::{run_search, AppError, SearchConfig, SearchRequest};
use matscreen_core::batch::initialize;
use matscreen_core::engine::{ChainReport, PositionOutcome};
use matscreen_core::BatchExecutor;
use matscreen_filters::{default_registry, FilterSettings};

#[derive(Parser)]
#[command(name = "matscreen")]
#[command(about = "Checkpointed filter chains for materials screening", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run (or resume) a search
    Run(RunArgs),
    /// List the registered step names
    Steps,
}

#[derive(Args)]
struct RunArgs {
    /// Search name; its checkpoints live in <root>/<search>/
    #[arg(long)]
    search: String,

    /// Initial dataset (.csv or .json)
    #[arg(long)]
    source: PathBuf,

    /// Comma-separated step names, in order
    #[arg(long, value_delimiter = ',')]
    filters: Vec<String>,

    /// Directory holding all searches (overrides MATSCREEN_SEARCH_ROOT)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Worker threads, 0 = one per CPU (overrides MATSCREEN_WORKERS)
    #[arg(long)]
    workers: Option<usize>,

    /// Batch size for parallel steps (overrides MATSCREEN_BATCH_SIZE)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Directory with <MaterialId>.CIF files (default <root>/by_id)
    #[arg(long)]
    structures_dir: Option<PathBuf>,

    /// Skip the CSV export of every artifact
    #[arg(long)]
    no_export: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    // `try_init` también instala el puente `log` → tracing.
    let _ = tracing_subscriber::registry().with(fmt::layer())
                                          .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                                              EnvFilter::new("info")
                                          }))
                                          .try_init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => run_command(args),
        Commands::Steps => list_steps(),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run_command(args: RunArgs) -> Result<(), AppError> {
    let mut config = SearchConfig::from_env()?;
    if let Some(root) = args.root {
        config.store.search_root = root;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(dir) = args.structures_dir {
        config = config.with_structures_dir(dir);
    }
    if args.no_export {
        config.store.export = false;
    }
    let config = config.validated()?;

    tracing::info!(search = %args.search, root = %config.store.search_root.display(), "starting search");
    let _pool = initialize(config.workers)?;
    let request = SearchRequest { search: args.search, source: args.source, filters: args.filters };
    let report = run_search(&config, &request, BatchExecutor::shared())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &ChainReport) {
    println!("search {} (run {})", report.chain_id, report.run_id);
    for outcome in &report.outcomes {
        match outcome {
            PositionOutcome::Skipped { position, step, artifact } => {
                println!("  {position}. {step}: already done ({artifact})");
            }
            PositionOutcome::Executed { position, step, previous_count, count, removed, problem_records, .. } => {
                println!("  {position}. {step}: {previous_count} -> {count} ({removed} removed, {problem_records} problem records)");
            }
        }
    }
    println!("{} executed, {} skipped", report.executed(), report.skipped());
}

fn list_steps() -> Result<(), AppError> {
    let config = SearchConfig::from_env()?;
    let settings = FilterSettings { executor: BatchExecutor::shared(),
                                    search_dir: config.store.search_root.clone(),
                                    structures_dir: config.structures_dir(),
                                    batch_size: config.batch_size };
    for name in default_registry(&settings)?.names() {
        println!("{name}");
    }
    Ok(())
}
