use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use configuration::{DashboardConfig, WindowArgs};
use dashboard::{export_to_dir, render_summary, Dashboard, DashboardState};
use data_source::codec::write_engineered;
use data_source::{load_path, load_upload, DataSource, DataSourceError, DatasetCache, EngineeredTable};
use features::FeatureEngine;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the crypto EDA dashboard.
fn main() -> Result<()> {
    // Load EDA__* overrides from the .env file, if there is one.
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the requested output.
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Execute the appropriate command
    match cli.command {
        Commands::Summary(args) => handle_summary(args, config, cli.upload.as_deref()),
        Commands::View(args) => handle_view(args, config, cli.upload.as_deref()),
        Commands::Export(args) => handle_export(args, config, cli.upload.as_deref()),
        Commands::Features(args) => handle_features(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Exploratory analysis of daily crypto prices.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. A missing file means defaults.
    #[arg(long, global = true, default_value = "dashboard.toml")]
    config: PathBuf,

    /// A dataset file to use when none of the configured locations exist.
    #[arg(long, global = true)]
    upload: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the data stamp and the KPI table for a selection.
    Summary(SelectionArgs),
    /// Print the full dashboard view as JSON.
    View(ViewArgs),
    /// Write the filtered view to a CSV file.
    Export(ExportArgs),
    /// Derive the engineered features from a raw price file and save them.
    Features(FeaturesArgs),
}

#[derive(Args)]
struct SelectionArgs {
    /// Ticker to include; repeat for several. Defaults to the configured ticker.
    #[arg(long = "ticker")]
    tickers: Vec<String>,

    /// First date to include (format: YYYY-MM-DD). Defaults to the first date in the data.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last date to include (format: YYYY-MM-DD). Defaults to the last date in the data.
    #[arg(long)]
    to: Option<NaiveDate>,

    #[command(flatten)]
    windows: WindowArgs,
}

#[derive(Args)]
struct ViewArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Pretty-print the JSON.
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Directory to write the export into.
    #[arg(long, default_value = ".")]
    output: PathBuf,
}

#[derive(Args)]
struct FeaturesArgs {
    /// Raw daily price file.
    #[arg(long, short)]
    input: PathBuf,

    /// Where to write the engineered table.
    #[arg(long, short)]
    output: PathBuf,
}

impl SelectionArgs {
    /// Starts from the table's defaults and applies the given overrides.
    fn into_state(self, table: &EngineeredTable, config: &mut DashboardConfig) -> Result<DashboardState> {
        self.windows.apply(config)?;

        let mut state = DashboardState::defaults(table, config)?;
        if !self.tickers.is_empty() {
            state.tickers = self.tickers;
        }
        if let Some(from) = self.from {
            state.start = from;
        }
        if let Some(to) = self.to {
            state.end = to;
        }

        state.validate()?;
        Ok(state)
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_summary(args: SelectionArgs, mut config: DashboardConfig, upload: Option<&Path>) -> Result<()> {
    let table = load_table(&config, upload)?;
    let state = args.into_state(&table, &mut config)?;

    let view = Dashboard::from_config(&config).render(&table, &state)?;
    println!("{}", render_summary(&view));
    Ok(())
}

fn handle_view(args: ViewArgs, mut config: DashboardConfig, upload: Option<&Path>) -> Result<()> {
    let table = load_table(&config, upload)?;
    let state = args.selection.into_state(&table, &mut config)?;

    let view = Dashboard::from_config(&config).render(&table, &state)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&view)?
    } else {
        serde_json::to_string(&view)?
    };
    println!("{json}");
    Ok(())
}

fn handle_export(args: ExportArgs, mut config: DashboardConfig, upload: Option<&Path>) -> Result<()> {
    let table = load_table(&config, upload)?;
    let state = args.selection.into_state(&table, &mut config)?;

    let view = Dashboard::from_config(&config).window(&table, &state)?;
    let path = export_to_dir(&view, &state, &args.output)
        .with_context(|| format!("Failed to export into {}", args.output.display()))?;
    println!("{}", path.display());
    Ok(())
}

fn handle_features(args: FeaturesArgs) -> Result<()> {
    let dataset = load_path(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let records = FeatureEngine::new().engineer(dataset);

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_engineered(&records, BufWriter::new(file))?;

    tracing::info!(rows = records.len(), path = %args.output.display(), "Wrote engineered features.");
    println!("{}", args.output.display());
    Ok(())
}

/// Loads the engineered table from the first configured location, falling back
/// to the uploaded file when none exists.
fn load_table(config: &DashboardConfig, upload: Option<&Path>) -> Result<Arc<EngineeredTable>> {
    let source = DataSource::new(config.data.candidate_paths());

    match source.resolve() {
        Ok(path) => {
            // A CLI invocation is one session; the cache lives as long as it does.
            let mut cache = DatasetCache::new(FeatureEngine::new());
            let table = cache
                .get_or_load(&path)
                .with_context(|| format!("Failed to load dataset from {}", path.display()))?;
            Ok(table)
        }
        Err(err @ DataSourceError::NotFound { .. }) => {
            let Some(upload) = upload else {
                return Err(err).context("No dataset available; pass --upload <FILE>");
            };

            tracing::warn!(path = %upload.display(), "No local dataset found; using the uploaded file.");
            let file = File::open(upload)
                .with_context(|| format!("Failed to open upload {}", upload.display()))?;
            let loaded = load_upload(BufReader::new(file))?;
            Ok(Arc::new(EngineeredTable::build(loaded, &FeatureEngine::new())))
        }
        Err(err) => Err(err.into()),
    }
}
