//! Command-line front end: load a CSV, search, print and export results.

use anyhow::{anyhow, Context};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use u_cover::cover::{CoverageReport, CoverageSession};
use u_cover::dataset::{Columns, Dataset};
use u_cover::ga::{
    CrossoverOperator, FlipBitMutation, GaConfig, GaRunner, OnePointCrossover, Selection,
    TwoPointCrossover, UniformCrossover,
};
use u_cover::progress::{ChannelSink, Progress};
use u_cover::report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SelectionArg {
    Tournament,
    Roulette,
    Rank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CrossoverArg {
    TwoPoint,
    OnePoint,
    Uniform,
}

/// Pick the items that together cover the most targets.
#[derive(Debug, Parser)]
#[command(name = "u-cover", version, about)]
struct Cli {
    /// CSV file with an item column and an element column.
    #[arg(short, long, env = "U_COVER_INPUT")]
    input: PathBuf,

    /// Number of items to report.
    #[arg(short = 'k', long, default_value_t = 10, env = "U_COVER_TOP_K")]
    top_k: usize,

    /// Name of the item column.
    #[arg(long, default_value = "Drug")]
    item_column: String,

    /// Name of the element column.
    #[arg(long, default_value = "Target")]
    element_column: String,

    #[arg(long, default_value_t = 300)]
    population: usize,

    #[arg(long, default_value_t = 40)]
    generations: usize,

    /// Parent selection strategy.
    #[arg(long, value_enum, default_value_t = SelectionArg::Tournament)]
    selection: SelectionArg,

    /// Tournament size when `--selection tournament`.
    #[arg(long, default_value_t = 3)]
    tournament: usize,

    #[arg(long, value_enum, default_value_t = CrossoverArg::TwoPoint)]
    crossover: CrossoverArg,

    /// Probability of crossing a pair of parents.
    #[arg(long, default_value_t = 0.5)]
    crossover_rate: f64,

    /// Probability of sending an offspring through mutation.
    #[arg(long, default_value_t = 1.0)]
    mutation_rate: f64,

    /// Per-bit flip probability during mutation.
    #[arg(long, default_value_t = 0.05)]
    flip_probability: f64,

    #[arg(long, default_value_t = 42, env = "U_COVER_SEED")]
    seed: u64,

    /// Ignore --seed and use a fresh random seed.
    #[arg(long)]
    random_seed: bool,

    /// Evaluate on a single thread.
    #[arg(long)]
    sequential: bool,

    /// Write the ranked summary (item, count) here.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write one row per ranked item and covered element here.
    #[arg(long)]
    elements_output: Option<PathBuf>,

    /// Write the combination table here.
    #[arg(long)]
    combinations_output: Option<PathBuf>,
}

impl Cli {
    fn ga_config(&self) -> GaConfig {
        let selection = match self.selection {
            SelectionArg::Tournament => Selection::Tournament(self.tournament),
            SelectionArg::Roulette => Selection::Roulette,
            SelectionArg::Rank => Selection::Rank,
        };
        let config = GaConfig::default()
            .with_population_size(self.population)
            .with_max_generations(self.generations)
            .with_selection(selection)
            .with_crossover_rate(self.crossover_rate)
            .with_mutation_rate(self.mutation_rate)
            .with_parallel(!self.sequential);
        if self.random_seed {
            config.without_seed()
        } else {
            config.with_seed(self.seed)
        }
    }

    fn columns(&self) -> Columns {
        Columns::new(&self.item_column, &self.element_column)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let columns = cli.columns();

    let dataset = Dataset::from_path(&cli.input, &columns)
        .with_context(|| format!("loading {}", cli.input.display()))?;

    let report = match cli.crossover {
        CrossoverArg::TwoPoint => search(&cli, dataset, TwoPointCrossover)?,
        CrossoverArg::OnePoint => search(&cli, dataset, OnePointCrossover)?,
        CrossoverArg::Uniform => search(&cli, dataset, UniformCrossover::default())?,
    };

    println!(
        "Best coverage: {} of {} targets",
        report.best_coverage, report.universe
    );
    println!("Ranked items cover {} targets together\n", report.ranked_coverage());
    for (idx, item) in report.ranked.iter().enumerate() {
        println!("{}- {}", idx + 1, item);
    }

    let combinations = report.combinations();
    println!("\nCombinations:");
    if combinations.is_empty() {
        println!("No significant combination found.");
    }
    for combo in &combinations {
        println!("{combo}");
    }

    if let Some(path) = &cli.output {
        report::save_ranked_summary(&report.ranked, &columns, path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &cli.elements_output {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        report::write_ranked_elements(&report.ranked, &columns, file)?;
    }
    if let Some(path) = &cli.combinations_output {
        report::save_combinations(&combinations, &columns, path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(())
}

/// Runs the session on a worker thread and logs progress every 10%.
fn search<C>(cli: &Cli, dataset: Dataset, crossover: C) -> anyhow::Result<CoverageReport>
where
    C: CrossoverOperator<bool> + 'static,
{
    let runner = GaRunner::new(cli.ga_config())
        .with_crossover(crossover)
        .with_mutation(FlipBitMutation::new(cli.flip_probability));
    let session = CoverageSession::new(cli.top_k).with_runner(runner);

    let (tx, rx) = mpsc::channel();
    let worker = std::thread::spawn(move || session.run(&dataset, &ChannelSink(tx)));

    let mut last_reported = 0.0;
    for progress in rx {
        match progress {
            Progress::Generation { .. } => {
                let pct = progress.percent();
                if pct - last_reported >= 10.0 {
                    info!("progress: {pct:.0}%");
                    last_reported = pct;
                }
            }
            Progress::Completed => info!("completed"),
            Progress::Aborted => info!("aborted"),
        }
    }

    worker
        .join()
        .map_err(|_| anyhow!("search thread panicked"))?
        .context("coverage search failed")
}
