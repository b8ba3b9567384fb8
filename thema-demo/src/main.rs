//! Thema demo driver.
//!
//! Loads `.txt` transcripts from a directory, runs the thematic analysis and
//! prints the requested view as JSON on stdout. Logs go to stderr and are
//! filtered by `THEMA_LOG` (e.g. `THEMA_LOG=thema_core=debug`).
//!
//! ```bash
//! thema-demo ./entrevistas --categories categorias.txt --seed 7
//! thema-demo ./entrevistas --view network --network-filter cats --rename "Emergente: agua=Agua y saneamiento"
//! thema-demo ./entrevistas --view codes --remove-code comunidad
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thema_core::{filter_network, network_data, sentiment_tally, NetworkFilter, ThematicPipeline};
use thema_types::{Analysis, BaseCategory, PipelineConfig};

mod loader;

/// Output selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum View {
    /// The full analysis.
    #[default]
    Analysis,
    /// Summary counts.
    Stats,
    /// Category network nodes and links.
    Network,
    /// Sentence polarity counts.
    Sentiment,
    /// Open-code occurrence counts.
    Codes,
}

/// Network levels printed by `--view network`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum NetworkLevel {
    /// Axis, categories and subthemes.
    Main,
    /// Axis and categories.
    Cats,
    /// Everything down to quotes.
    #[default]
    All,
}

impl From<NetworkLevel> for NetworkFilter {
    fn from(level: NetworkLevel) -> Self {
        match level {
            NetworkLevel::Main => NetworkFilter::Main,
            NetworkLevel::Cats => NetworkFilter::Categories,
            NetworkLevel::All => NetworkFilter::All,
        }
    }
}

/// Run a thematic analysis over a folder of interview transcripts.
#[derive(Debug, Parser)]
#[command(name = "thema-demo", version, about)]
struct Cli {
    /// Directory holding `.txt` transcripts.
    input: PathBuf,

    /// Base categories, one per line: `label | synonym | synonym`.
    #[arg(short, long)]
    categories: Option<PathBuf>,

    /// JSON file with pipeline tunable overrides (camelCase keys).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for emergent clustering. Unseeded runs may differ.
    #[arg(long)]
    seed: Option<u64>,

    /// Rename an emergent category, as `OLD=NEW`. Repeatable.
    #[arg(long, value_name = "OLD=NEW")]
    rename: Vec<String>,

    /// Drop an emergent category from the output. Repeatable.
    #[arg(long, value_name = "LABEL")]
    drop_emergent: Vec<String>,

    /// Leave an open code out of the `codes` view. Repeatable.
    #[arg(long, value_name = "CODE")]
    remove_code: Vec<String>,

    /// What to print.
    #[arg(long, value_enum, default_value_t)]
    view: View,

    /// Levels kept in the `network` view.
    #[arg(long, value_enum, default_value_t)]
    network_filter: NetworkLevel,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log pipeline stages.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("thema error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let docs = loader::load_dir(&cli.input)?;
    let base = match &cli.categories {
        Some(path) => load_categories(path)?,
        None => Vec::new(),
    };
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };

    let pipeline = ThematicPipeline::with_config(config);
    let mut analysis = match cli.seed {
        Some(seed) => pipeline.run_with_rng(&docs, &base, &mut StdRng::seed_from_u64(seed)),
        None => pipeline.run(&docs, &base),
    };

    for pair in &cli.rename {
        apply_rename(&mut analysis, pair)?;
    }
    if !cli.drop_emergent.is_empty() {
        analysis = analysis.without_emergent(cli.drop_emergent.as_slice());
    }

    tracing::info!(stats = %analysis.stats(), "ready");
    print_view(&analysis, &cli)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("THEMA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn load_categories(path: &Path) -> anyhow::Result<Vec<BaseCategory>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read categories file {}", path.display()))?;
    BaseCategory::parse_list(&text)
        .with_context(|| format!("invalid categories file {}", path.display()))
}

fn load_config(path: &Path) -> anyhow::Result<PipelineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config file {}", path.display()))
}

fn apply_rename(analysis: &mut Analysis, pair: &str) -> anyhow::Result<()> {
    let (old, new) = pair
        .split_once('=')
        .with_context(|| format!("rename must be OLD=NEW, got '{pair}'"))?;
    let changed = analysis
        .rename_category(old.trim(), new)
        .with_context(|| format!("cannot rename '{old}'"))?;
    tracing::debug!(old, new, changed, "renamed category");
    Ok(())
}

fn code_table(analysis: &Analysis, removed: &[String]) -> Vec<serde_json::Value> {
    analysis
        .code_counts(removed)
        .into_iter()
        .map(|(code, count)| serde_json::json!({ "code": code, "count": count }))
        .collect()
}

fn print_view(analysis: &Analysis, cli: &Cli) -> anyhow::Result<()> {
    let json = match cli.view {
        View::Analysis => serde_json::to_string_pretty(analysis),
        View::Stats => serde_json::to_string_pretty(&analysis.stats()),
        View::Network => {
            let network = filter_network(&network_data(analysis), cli.network_filter.into());
            serde_json::to_string_pretty(&network)
        }
        View::Sentiment => serde_json::to_string_pretty(&sentiment_tally(&analysis.docs)),
        View::Codes => serde_json::to_string_pretty(&code_table(analysis, &cli.remove_code)),
    }
    .context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
