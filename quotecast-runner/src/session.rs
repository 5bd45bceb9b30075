//! Interactive session: prompt, validate, analyse, render, repeat.
//!
//! ```text
//! AwaitingInput → Validating → Fetching → Forecasting → Interpreting → Rendering → AwaitingInput
//!       └──────────────────────────────────────────────────────────────────────→ Terminated
//! ```
//!
//! Per-asset failures are printed and the loop goes back to `AwaitingInput`.
//! Only an I/O failure on the interface itself ends the session with an error.

use std::fmt;
use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{debug, warn};

use quotecast_core::analysis::Language;
use quotecast_core::data::DataProvider;
use quotecast_core::domain::{AnalysisRecord, AssetId, DateRange};
use quotecast_core::forecast::ForecastEngine;
use quotecast_core::present::{ChartPresenter, LineChart};
use quotecast_core::validate::{resolve_identifier, validate_date_range, Resolution};

use crate::pipeline::{analyze_asset, AnalysisRequest, PipelineOptions};

/// Exit word accepted in every configuration.
pub const LEGACY_EXIT_WORD: &str = "sair";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Validating,
    Fetching,
    Forecasting,
    Interpreting,
    Rendering,
    Terminated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::AwaitingInput => "awaiting_input",
            SessionState::Validating => "validating",
            SessionState::Fetching => "fetching",
            SessionState::Forecasting => "forecasting",
            SessionState::Interpreting => "interpreting",
            SessionState::Rendering => "rendering",
            SessionState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Failure of the interactive interface. Ends the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("interactive interface failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Sentinel typed at the asset prompt to end the session (case-insensitive).
    pub exit_word: String,
    pub pipeline: PipelineOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            exit_word: "exit".into(),
            pipeline: PipelineOptions::default(),
        }
    }
}

impl SessionConfig {
    pub fn is_exit(&self, input: &str) -> bool {
        let input = input.trim();
        input.eq_ignore_ascii_case(&self.exit_word) || input.eq_ignore_ascii_case(LEGACY_EXIT_WORD)
    }

    fn language(&self) -> Language {
        self.pipeline.interpret.language
    }
}

/// User-facing text of the interface.
struct Messages {
    asset_prompt: &'static str,
    start_prompt: &'static str,
    end_prompt: &'static str,
    chosen: &'static str,
    asset: &'static str,
    period: &'static str,
    period_join: &'static str,
    not_found: &'static str,
    error: &'static str,
    render_error: &'static str,
}

static ENGLISH: Messages = Messages {
    asset_prompt: "Enter the asset ticker (or '{exit}' to quit): ",
    start_prompt: "Start date of the analysis (yyyy-mm-dd): ",
    end_prompt: "End date of the analysis (yyyy-mm-dd): ",
    chosen: "Selected asset/index",
    asset: "Asset",
    period: "Period",
    period_join: "to",
    not_found: "Asset not found",
    error: "An error occurred",
    render_error: "Could not draw chart",
};

static PORTUGUESE: Messages = Messages {
    asset_prompt: "Digite o nome do ativo (ou '{exit}' para encerrar): ",
    start_prompt: "Digite o período inicial da análise (aaaa-mm-dd): ",
    end_prompt: "Até qual data deseja analisar (aaaa-mm-dd): ",
    chosen: "Ativo/índice escolhido",
    asset: "Ativo",
    period: "Período",
    period_join: "até",
    not_found: "Ativo não encontrado",
    error: "Ocorreu um erro",
    render_error: "Não foi possível desenhar o gráfico",
};

impl Messages {
    fn for_language(language: Language) -> &'static Messages {
        match language {
            Language::English => &ENGLISH,
            Language::Portuguese => &PORTUGUESE,
        }
    }
}

/// Outcome of one pass through the loop.
enum Step {
    Analysed(Box<AnalysisRecord>),
    Skipped,
    EndOfInput,
}

/// One interactive session over a provider, an engine and a presenter.
pub struct Session<'a, E: ForecastEngine> {
    provider: &'a dyn DataProvider,
    engine: &'a E,
    presenter: &'a mut dyn ChartPresenter,
    config: SessionConfig,
    state: SessionState,
}

impl<'a, E: ForecastEngine> Session<'a, E> {
    pub fn new(
        provider: &'a dyn DataProvider,
        engine: &'a E,
        presenter: &'a mut dyn ChartPresenter,
        config: SessionConfig,
    ) -> Self {
        Self {
            provider,
            engine,
            presenter,
            config,
            state: SessionState::AwaitingInput,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drive the loop until the exit word or end of input. Returns every
    /// record analysed during the session, in order.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
    ) -> Result<Vec<AnalysisRecord>, SessionError> {
        let mut records = Vec::new();

        loop {
            self.transition(SessionState::AwaitingInput);
            match self.step(&mut input, &mut output)? {
                Step::Analysed(record) => {
                    records.push(*record);
                    if let Some(record) = records.last() {
                        self.render(record, &mut output)?;
                    }
                }
                Step::Skipped => {}
                Step::EndOfInput => break,
            }
        }

        self.transition(SessionState::Terminated);
        Ok(records)
    }

    fn step<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<Step, SessionError> {
        let msg = Messages::for_language(self.config.language());

        let prompt = msg.asset_prompt.replace("{exit}", &self.config.exit_word);
        let Some(line) = read_prompted(input, output, &prompt)? else {
            return Ok(Step::EndOfInput);
        };
        if self.config.is_exit(&line) {
            return Ok(Step::EndOfInput);
        }

        self.transition(SessionState::Validating);
        let asset = match AssetId::parse(&line) {
            Ok(asset) => asset,
            Err(e) => {
                writeln!(output, "{}: {e}", msg.error)?;
                return Ok(Step::Skipped);
            }
        };
        let info = match resolve_identifier(self.provider, &asset) {
            Resolution::Resolved(info) => info,
            Resolution::Unresolvable => {
                writeln!(output, "{}: {asset}", msg.not_found)?;
                return Ok(Step::Skipped);
            }
            Resolution::ProviderError(e) => {
                warn!(%asset, error = %e, "probe failed");
                writeln!(output, "{}: {e}", msg.error)?;
                return Ok(Step::Skipped);
            }
        };
        writeln!(output, "{}: {asset}", msg.chosen)?;

        let Some(start) = read_prompted(input, output, msg.start_prompt)? else {
            return Ok(Step::EndOfInput);
        };
        let Some(end) = read_prompted(input, output, msg.end_prompt)? else {
            return Ok(Step::EndOfInput);
        };
        let range = match validate_date_range(&start, &end) {
            Ok(range) => range,
            Err(e) => {
                writeln!(output, "{}: {e}", msg.error)?;
                return Ok(Step::Skipped);
            }
        };
        self.print_header(output, msg, &asset, range)?;

        self.transition(SessionState::Fetching);
        let request = AnalysisRequest::new(asset, range).with_info(info);
        match analyze_asset(self.provider, self.engine, request, &self.config.pipeline) {
            Ok(record) => {
                writeln!(output, "{}", record.history_summary)?;
                writeln!(output, "{}", record.forecast_summary)?;
                Ok(Step::Analysed(Box::new(record)))
            }
            Err(e) => {
                debug!(stage = %e.stage(), error = %e, "analysis abandoned");
                writeln!(output, "{}: {e}", msg.error)?;
                Ok(Step::Skipped)
            }
        }
    }

    fn print_header<W: Write>(
        &self,
        output: &mut W,
        msg: &Messages,
        asset: &AssetId,
        range: DateRange,
    ) -> io::Result<()> {
        writeln!(output, "{}", "=/=".repeat(20))?;
        writeln!(output, "- {}: {asset}", msg.asset)?;
        writeln!(
            output,
            "  {}: {} {} {}",
            msg.period,
            range.start(),
            msg.period_join,
            range.end()
        )
    }

    /// Draw the history chart, then the forecast chart. Failures are shown
    /// and otherwise ignored: the record is already kept.
    fn render<W: Write>(&mut self, record: &AnalysisRecord, output: &mut W) -> Result<(), SessionError> {
        self.transition(SessionState::Rendering);
        let msg = Messages::for_language(self.config.language());
        let charts = [
            LineChart::history(&record.asset, &record.history, &record.history_summary),
            LineChart::forecast(&record.asset, &record.forecast, &record.forecast_summary),
        ];
        for chart in &charts {
            if let Err(e) = self.presenter.render_line_chart(chart) {
                warn!(title = %chart.title, error = %e, "render failed");
                writeln!(output, "{} '{}': {e}", msg.render_error, chart.title)?;
            }
        }
        Ok(())
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = %self.state, to = %next, "session state");
        self.state = next;
    }
}

/// Write a prompt and read one line. `None` on end of input.
fn read_prompted<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<Option<String>> {
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
