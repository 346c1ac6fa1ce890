//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;
use wiseways_core::GraphStore;
use wiseways_core::classify::classify;
use wiseways_core::terms::extract_key_terms;
use wiseways_shared::{AppConfig, init_config, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// WiseWays: find the thinking rooms hidden in a pile of questions.
#[derive(Parser)]
#[command(
    name = "wiseways",
    version,
    about = "Classify questions, link related ones and group them into thinking rooms.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.wiseways/wiseways.toml.
    #[arg(long, global = true, env = "WISEWAYS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Result output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    Summary,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Classify a single question.
    Classify {
        /// Question text.
        text: String,
    },

    /// Build the question graph from a file (one question per line).
    Analyze {
        /// File with one question per line; blank lines are skipped.
        file: PathBuf,

        /// Minimum combined link weight (overrides config).
        #[arg(long)]
        threshold: Option<f64>,

        /// Maximum links kept per question (overrides config).
        #[arg(long)]
        max_per_node: Option<usize>,

        /// Output format.
        #[arg(short, long, default_value = "summary")]
        format: OutputFormat,
    },

    /// Build the graph from the bundled demo questions.
    Demo {
        /// Output format.
        #[arg(short, long, default_value = "summary")]
        format: OutputFormat,
    },

    /// Print graph analytics for a question file.
    Analytics {
        /// File with one question per line.
        file: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "wiseways=info",
        1 => "wiseways=debug",
        _ => "wiseways=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Command::Classify { text } => cmd_classify(&text),
        Command::Analyze {
            file,
            threshold,
            max_per_node,
            format,
        } => cmd_analyze(&config, &file, threshold, max_per_node, format),
        Command::Demo { format } => cmd_demo(&config, format),
        Command::Analytics { file } => cmd_analytics(&config, &file),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(&config),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_classify(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(eyre!("question text is empty"));
    }

    let classification = classify(text);
    let terms: serde_json::Map<String, serde_json::Value> = extract_key_terms(text)
        .iter()
        .map(|(term, weight)| (term.to_string(), serde_json::json!(weight)))
        .collect();

    let output = serde_json::json!({
        "text": text.trim(),
        "need": classification.need,
        "dimension": classification.dimension,
        "pipeline_score": classification.pipeline_score,
        "key_terms": terms,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Read non-empty lines from a question file.
fn read_questions(file: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(file)
        .wrap_err_with(|| format!("cannot read question file '{}'", file.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

/// Submit each question in file order, exactly as live submissions would.
fn load_store(config: &AppConfig, file: &Path) -> Result<GraphStore> {
    let questions = read_questions(file)?;
    if questions.is_empty() {
        return Err(eyre!("no questions found in '{}'", file.display()));
    }

    info!(file = %file.display(), questions = questions.len(), "loading questions");

    let mut store = GraphStore::from_config(config);
    for question in &questions {
        store.submit_question(question)?;
    }
    Ok(store)
}

fn cmd_analyze(
    config: &AppConfig,
    file: &Path,
    threshold: Option<f64>,
    max_per_node: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let mut store = load_store(config, file)?;

    if threshold.is_some() || max_per_node.is_some() {
        let threshold = threshold.unwrap_or(config.linking.threshold);
        let max_per_node = max_per_node.unwrap_or(config.linking.max_per_node);
        info!(threshold, max_per_node, "recomputing links");
        store.recompute_links(threshold, max_per_node)?;
    }

    print_store(&store, format)
}

fn cmd_demo(config: &AppConfig, format: OutputFormat) -> Result<()> {
    let mut store = GraphStore::from_config(config);
    store.seed_demo()?;
    print_store(&store, format)
}

fn cmd_analytics(config: &AppConfig, file: &Path) -> Result<()> {
    let store = load_store(config, file)?;
    println!("{}", serde_json::to_string_pretty(&store.analytics())?);
    Ok(())
}

fn print_store(store: &GraphStore, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
        }
        OutputFormat::Summary => print_summary(store),
    }
    Ok(())
}

fn print_summary(store: &GraphStore) {
    let analytics = store.analytics();

    println!();
    println!("  Questions: {}", analytics.total_questions);
    println!(
        "  Links:     {} (strong {}, medium {}, weak {})",
        analytics.total_links,
        analytics.link_strength.strong,
        analytics.link_strength.medium,
        analytics.link_strength.weak
    );
    println!("  Rooms:     {}", analytics.total_rooms);

    for room in store.rooms() {
        println!();
        println!("  {} ({:.0}% of questions)", room.name, room.strength);
        println!("    Theme: {}", room.theme);
        for id in &room.question_ids {
            if let Some(node) = store.node(id) {
                println!("    - [{}/{}] {}", node.need, node.dimension, node.text);
            }
        }
    }
    println!();
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}
