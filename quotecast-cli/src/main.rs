//! quotecast CLI: interactive asset analysis and one-shot analysis.
//!
//! Commands:
//! - `interactive` (default): prompt for assets and date ranges until the
//!   exit word, drawing a history and a forecast chart for each
//! - `analyze`: analyse one asset over one range and exit

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use terminal::install_panic_hook;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quotecast_core::analysis::{InterpretOptions, Language};
use quotecast_core::data::{CircuitBreaker, YahooProvider};
use quotecast_core::domain::AssetId;
use quotecast_core::forecast::{ProphetEngine, DEFAULT_HORIZON_DAYS};
use quotecast_core::present::{ChartPresenter, LineChart, NullPresenter};
use quotecast_core::validate::{resolve_identifier, validate_date_range, Resolution};
use quotecast_runner::{analyze_asset, AnalysisRequest, PipelineOptions, Session, SessionConfig, SessionSummary};
use quotecast_tui::TerminalPresenter;

#[derive(Parser)]
#[command(
    name = "quotecast",
    version,
    about = "quotecast: asset price history, forecast and commentary"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    options: Options,
}

#[derive(Args)]
struct Options {
    /// Language of prompts and commentary: en or pt.
    #[arg(long, global = true, default_value = "en")]
    lang: Language,

    /// Append the long-run trend bucket to the forecast commentary.
    #[arg(long, global = true, default_value_t = false)]
    describe_trend: bool,

    /// Calendar days to forecast past the last observation.
    #[arg(long, global = true, default_value_t = DEFAULT_HORIZON_DAYS)]
    horizon_days: u32,

    /// Print commentary only; do not draw charts.
    #[arg(long, global = true, default_value_t = false)]
    no_charts: bool,

    /// HTTP timeout for provider requests, in seconds.
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,

    /// Word that ends the interactive session ('sair' is always accepted).
    #[arg(long, global = true, default_value = "exit")]
    exit_word: String,

    /// Log filter (e.g. `debug`, `quotecast_core=trace`). Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,
}

impl Options {
    fn pipeline(&self) -> PipelineOptions {
        PipelineOptions {
            interpret: InterpretOptions {
                language: self.lang,
                describe_trend: self.describe_trend,
            },
            horizon_days: self.horizon_days,
        }
    }

    fn presenter(&self) -> Box<dyn ChartPresenter> {
        if self.no_charts {
            Box::new(NullPresenter)
        } else {
            install_panic_hook();
            Box::new(TerminalPresenter::default())
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt for assets until the exit word (default).
    Interactive,
    /// Analyse one asset over one date range.
    Analyze {
        /// Ticker as known to Yahoo Finance (e.g. AAPL, PETR4.SA).
        symbol: String,

        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD), inclusive.
        #[arg(long)]
        end: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.options.log_level.as_deref())?;

    let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
    let provider = YahooProvider::new(circuit_breaker, Duration::from_secs(cli.options.timeout_secs))?;
    let engine = ProphetEngine::new();
    debug!(
        timeout_secs = cli.options.timeout_secs,
        horizon_days = cli.options.horizon_days,
        lang = ?cli.options.lang,
        "starting"
    );

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => run_interactive(&provider, &engine, &cli.options),
        Commands::Analyze { symbol, start, end } => {
            run_analyze(&provider, &engine, &cli.options, &symbol, &start, &end)
        }
    }
}

/// Logs go to stderr so prompts on stdout stay clean.
fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("invalid --log-level '{level}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
    Ok(())
}

fn run_interactive(provider: &YahooProvider, engine: &ProphetEngine, options: &Options) -> Result<()> {
    let config = SessionConfig {
        exit_word: options.exit_word.clone(),
        pipeline: options.pipeline(),
    };
    let mut presenter = options.presenter();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(provider, engine, presenter.as_mut(), config);
    let records = session.run(stdin.lock(), stdout.lock())?;

    println!();
    println!("{}", SessionSummary::from_records(&records));
    Ok(())
}

fn run_analyze(
    provider: &YahooProvider,
    engine: &ProphetEngine,
    options: &Options,
    symbol: &str,
    start: &str,
    end: &str,
) -> Result<()> {
    let asset = AssetId::parse(symbol)?;
    let range = validate_date_range(start, end)?;

    let info = match resolve_identifier(provider, &asset) {
        Resolution::Resolved(info) => info,
        Resolution::Unresolvable => bail!("asset '{asset}' could not be found"),
        Resolution::ProviderError(e) => return Err(e).context(format!("could not check asset '{asset}'")),
    };

    println!("- Asset: {asset} ({})", info.display_name());
    println!("  Period: {range}");

    let request = AnalysisRequest::new(asset, range).with_info(info);
    let record = analyze_asset(provider, engine, request, &options.pipeline())?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", record.history_summary)?;
    writeln!(stdout, "{}", record.forecast_summary)?;
    stdout.flush()?;
    drop(stdout);

    let mut presenter = options.presenter();
    for chart in [
        LineChart::history(&record.asset, &record.history, &record.history_summary),
        LineChart::forecast(&record.asset, &record.forecast, &record.forecast_summary),
    ] {
        if let Err(e) = presenter.render_line_chart(&chart) {
            eprintln!("Could not draw chart '{}': {e}", chart.title);
        }
    }

    println!("{}", SessionSummary::from_records(std::slice::from_ref(&record)));
    Ok(())
}

/// Restores the terminal before a panic message is printed.
mod terminal {
    use std::io;
    use std::sync::Once;

    use crossterm::execute;
    use crossterm::terminal::{disable_raw_mode, LeaveAlternateScreen};

    pub fn install_panic_hook() {
        static INSTALL: Once = Once::new();
        INSTALL.call_once(|| {
            let default_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = disable_raw_mode();
                let _ = execute!(io::stderr(), LeaveAlternateScreen);
                default_hook(info);
            }));
        });
    }
}
