//! BDD tests for the analysis pipeline and the interactive session.
//!
//! Network, model and terminal are replaced by in-test implementations of
//! `DataProvider`, `ForecastEngine` and `ChartPresenter`:
//! - AAPL   → five daily closes from 2024-01-01
//! - EMPTY  → known, but no rows in any range
//! - FAIL   → known, but every fetch fails with a network error
//! - DOWN   → the probe itself fails with a network error
//! - others → unknown to the provider

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use quotecast_core::analysis::{AnalysisError, InterpretOptions, Language, SeriesKind};
use quotecast_core::data::{DataError, DataProvider};
use quotecast_core::domain::{AssetId, AssetInfo, DateRange, ForecastPoint, ForecastSeries, PricePoint, PriceSeries};
use quotecast_core::forecast::{prediction_dates, training_data, ForecastEngine, ForecastError};
use quotecast_core::present::{ChartPresenter, LineChart, RenderError};
use quotecast_runner::{
    analyze_asset, AnalysisRequest, PipelineError, PipelineOptions, Session, SessionConfig, SessionState,
    SessionSummary,
};

// ── Test doubles ─────────────────────────────────────────────────────

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

struct FixtureProvider;

impl FixtureProvider {
    fn aapl() -> Vec<PricePoint> {
        [100.0, 102.0, 101.0, 104.0, 108.0]
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: d(2024, 1, 1) + Duration::days(i as i64),
                close,
                adj_close: close,
                volume: 1_000,
            })
            .collect()
    }
}

impl DataProvider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    fn fetch(&self, asset: &AssetId, range: DateRange) -> Result<PriceSeries, DataError> {
        match asset.as_str() {
            "AAPL" => Ok(PriceSeries::new(
                Self::aapl().into_iter().filter(|p| range.contains(p.date)).collect(),
            )?),
            "EMPTY" => Ok(PriceSeries::empty()),
            "FAIL" => Err(DataError::NetworkUnreachable("connection reset".into())),
            other => Err(DataError::SymbolNotFound {
                symbol: other.to_string(),
            }),
        }
    }

    fn probe(&self, asset: &AssetId) -> Result<AssetInfo, DataError> {
        match asset.as_str() {
            "AAPL" | "EMPTY" | "FAIL" => Ok(AssetInfo::bare(asset.as_str())),
            "DOWN" => Err(DataError::NetworkUnreachable("dns failure".into())),
            other => Err(DataError::SymbolNotFound {
                symbol: other.to_string(),
            }),
        }
    }
}

/// Carries the last observation forward. With `drop_history` it forgets the
/// historical rows, producing a forecast that does not line up.
struct LastValue {
    drop_history: bool,
}

struct LastValueModel {
    dates: Vec<NaiveDate>,
    last: f64,
}

impl ForecastEngine for LastValue {
    type Model = LastValueModel;

    fn name(&self) -> &str {
        "last_value"
    }

    fn fit(&self, history: &PriceSeries) -> Result<LastValueModel, ForecastError> {
        let (dates, values) = training_data(history)?;
        Ok(LastValueModel {
            dates,
            last: values[values.len() - 1],
        })
    }

    fn predict(
        &self,
        model: &LastValueModel,
        horizon_days: u32,
        include_history: bool,
    ) -> Result<ForecastSeries, ForecastError> {
        let points = prediction_dates(&model.dates, horizon_days, include_history && !self.drop_history)
            .into_iter()
            .enumerate()
            .map(|(i, date)| {
                let value = model.last + i as f64 * 0.1;
                ForecastPoint {
                    date,
                    trend: value,
                    forecast: value,
                    forecast_lower: value - 1.0,
                    forecast_upper: value + 1.0,
                }
            })
            .collect();
        Ok(ForecastSeries::new(points)?)
    }
}

const ENGINE: LastValue = LastValue { drop_history: false };

#[derive(Default)]
struct RecordingPresenter {
    titles: Vec<String>,
    fail: bool,
}

impl ChartPresenter for RecordingPresenter {
    fn render_line_chart(&mut self, chart: &LineChart) -> Result<(), RenderError> {
        self.titles.push(chart.title.clone());
        if self.fail {
            return Err(RenderError::Terminal(std::io::Error::other("no tty")));
        }
        Ok(())
    }
}

fn config(language: Language) -> SessionConfig {
    SessionConfig {
        exit_word: "exit".into(),
        pipeline: PipelineOptions {
            interpret: InterpretOptions {
                language,
                describe_trend: false,
            },
            horizon_days: 10,
        },
    }
}

/// Run a session over `script`; returns (record count, stdout, final state).
fn run_script(script: &str, presenter: &mut RecordingPresenter, language: Language) -> (usize, String, SessionState) {
    let mut output = Vec::new();
    let mut session = Session::new(&FixtureProvider, &ENGINE, presenter, config(language));
    let records = session.run(script.as_bytes(), &mut output).expect("session I/O");
    (records.len(), String::from_utf8(output).unwrap(), session.state())
}

// ── Pipeline ─────────────────────────────────────────────────────────

fn request(symbol: &str) -> AnalysisRequest {
    AnalysisRequest::new(
        AssetId::parse(symbol).unwrap(),
        DateRange::new(d(2024, 1, 1), d(2024, 1, 31)).unwrap(),
    )
}

#[test]
fn bdd_scenario_pipeline_produces_complete_record() {
    // GIVEN a known asset with five observations in range
    let options = PipelineOptions {
        horizon_days: 10,
        ..Default::default()
    };

    // WHEN the pipeline runs
    let record = analyze_asset(&FixtureProvider, &ENGINE, request("aapl"), &options).unwrap();

    // THEN history, forecast and both commentaries are filled in
    assert_eq!(record.asset.as_str(), "AAPL");
    assert_eq!(record.history.len(), 5);
    assert_eq!(record.forecast.len(), 5 + 10);
    assert_eq!(record.forecast.first().unwrap().date, d(2024, 1, 1));
    assert_eq!(record.forecast.last().unwrap().date, d(2024, 1, 15));
    assert!(record.history_summary.starts_with("The asset trended upward over the analysed period."));
    assert!(record.forecast_summary.starts_with("The model forecasts a"));
    assert_eq!(record.last_close(), Some(108.0));

    // AND the record serializes for reporting
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["asset"], "AAPL");
    assert_eq!(json["history"]["points"].as_array().unwrap().len(), 5);
}

#[test]
fn bdd_scenario_pipeline_narrows_to_requested_range() {
    let req = AnalysisRequest::new(
        AssetId::parse("AAPL").unwrap(),
        DateRange::new(d(2024, 1, 2), d(2024, 1, 4)).unwrap(),
    );
    let record = analyze_asset(&FixtureProvider, &ENGINE, req, &PipelineOptions::default()).unwrap();
    assert_eq!(record.history.len(), 3);
    assert_eq!(record.forecast.len(), 3 + 365);
}

#[test]
fn bdd_scenario_pipeline_failures_map_to_taxonomy() {
    let options = PipelineOptions::default();

    let err = analyze_asset(&FixtureProvider, &ENGINE, request("zzzz"), &options).unwrap_err();
    assert!(matches!(err, PipelineError::UnresolvableIdentifier(_)));

    let err = analyze_asset(&FixtureProvider, &ENGINE, request("fail"), &options).unwrap_err();
    assert!(matches!(err, PipelineError::ProviderFailure(DataError::NetworkUnreachable(_))));

    let err = analyze_asset(&FixtureProvider, &ENGINE, request("empty"), &options).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Analysis(AnalysisError::EmptySeries {
            series: SeriesKind::History
        })
    ));
}

#[test]
fn bdd_scenario_forecast_must_start_with_history() {
    // GIVEN an engine that forgets the historical rows
    let engine = LastValue { drop_history: true };

    // WHEN the pipeline runs
    let err = analyze_asset(&FixtureProvider, &engine, request("AAPL"), &PipelineOptions::default()).unwrap_err();

    // THEN the misalignment is reported as a forecast error
    assert!(matches!(
        err,
        PipelineError::Forecast(ForecastError::Discontinuity { .. })
    ));
}

// ── Session ──────────────────────────────────────────────────────────

#[test]
fn bdd_scenario_exit_word_ends_session_immediately() {
    let mut presenter = RecordingPresenter::default();
    let (records, output, state) = run_script("exit\n", &mut presenter, Language::English);
    assert_eq!(records, 0);
    assert_eq!(state, SessionState::Terminated);
    assert_eq!(output, "Enter the asset ticker (or 'exit' to quit): ");
    assert!(presenter.titles.is_empty());
}

#[test]
fn bdd_scenario_end_of_input_ends_session() {
    let mut presenter = RecordingPresenter::default();
    let (records, _, state) = run_script("", &mut presenter, Language::English);
    assert_eq!(records, 0);
    assert_eq!(state, SessionState::Terminated);

    // End of input while waiting for a date also terminates cleanly.
    let (records, _, state) = run_script("aapl\n2024-01-01\n", &mut presenter, Language::English);
    assert_eq!(records, 0);
    assert_eq!(state, SessionState::Terminated);
}

#[test]
fn bdd_scenario_one_asset_analysed_and_both_charts_drawn() {
    // GIVEN a user who analyses AAPL and then exits
    let script = "aapl\n2024-01-01\n2024-01-05\nEXIT\n";
    let mut presenter = RecordingPresenter::default();

    // WHEN the session runs
    let (records, output, _) = run_script(script, &mut presenter, Language::English);

    // THEN one record is kept and both charts are drawn in order
    assert_eq!(records, 1);
    assert_eq!(
        presenter.titles,
        vec!["Price history of AAPL", "Price forecast of AAPL"]
    );

    // AND the user saw the confirmation, the header and the commentary
    assert!(output.contains("Selected asset/index: AAPL\n"));
    assert!(output.contains("- Asset: AAPL\n  Period: 2024-01-01 to 2024-01-05\n"));
    assert!(output.contains("The closing price was 108.00."));
    assert!(output.contains("The model forecasts a"));
}

#[test]
fn bdd_scenario_failing_assets_do_not_end_the_loop() {
    // GIVEN an unknown ticker, an unreachable probe, a failing fetch and
    // an empty history, followed by a good asset
    let script = "zzzz\n\
                  down\n\
                  fail\n2024-01-01\n2024-01-05\n\
                  empty\n2024-01-01\n2024-01-05\n\
                  aapl\n2024-01-01\n2024-01-05\n\
                  sair\n";
    let mut presenter = RecordingPresenter::default();

    let (records, output, state) = run_script(script, &mut presenter, Language::English);

    // THEN every failure is reported and the good asset is still analysed
    assert_eq!(records, 1);
    assert_eq!(state, SessionState::Terminated);
    assert!(output.contains("Asset not found: ZZZZ\n"));
    assert!(output.contains("An error occurred: network unreachable: dns failure\n"));
    assert!(output.contains("An error occurred: could not retrieve data: network unreachable: connection reset\n"));
    assert!(output.contains("An error occurred: analysis failed: historical series is empty\n"));
    assert_eq!(presenter.titles.len(), 2);
}

#[test]
fn bdd_scenario_bad_dates_are_reported_and_skipped() {
    let script = "aapl\n2024/01/01\n2024-01-05\n\
                  aapl\n2024-01-05\n2024-01-01\n\
                  \n\
                  exit\n";
    let mut presenter = RecordingPresenter::default();
    let (records, output, _) = run_script(script, &mut presenter, Language::English);

    assert_eq!(records, 0);
    assert!(output.contains("invalid date format '2024/01/01'"));
    assert!(output.contains("start date 2024-01-05 must not be after end date 2024-01-01"));
    assert!(output.contains("asset identifier is empty"));
}

#[test]
fn bdd_scenario_render_failure_keeps_the_record() {
    // GIVEN a presenter that cannot draw
    let mut presenter = RecordingPresenter {
        fail: true,
        ..Default::default()
    };

    let (records, output, _) = run_script("aapl\n2024-01-01\n2024-01-05\nexit\n", &mut presenter, Language::English);

    // THEN both charts were attempted and the record survived
    assert_eq!(records, 1);
    assert_eq!(presenter.titles.len(), 2);
    assert!(output.contains("Could not draw chart 'Price history of AAPL': terminal error: no tty"));
    assert!(output.contains("Could not draw chart 'Price forecast of AAPL'"));
}

#[test]
fn bdd_scenario_portuguese_interface() {
    let mut presenter = RecordingPresenter::default();
    let (records, output, _) = run_script("aapl\n2024-01-01\n2024-01-05\nsair\n", &mut presenter, Language::Portuguese);

    assert_eq!(records, 1);
    assert!(output.starts_with("Digite o nome do ativo (ou 'exit' para encerrar): "));
    assert!(output.contains("Ativo/índice escolhido: AAPL\n"));
    assert!(output.contains("  Período: 2024-01-01 até 2024-01-05\n"));
    assert!(output.contains("O ativo apresentou uma tendência alta no período analisado."));
}

#[test]
fn bdd_scenario_records_are_returned_in_order_for_the_summary() {
    let script = "aapl\n2024-01-01\n2024-01-03\naapl\n2024-01-01\n2024-01-05\nexit\n";
    let mut presenter = RecordingPresenter::default();
    let mut output = Vec::new();
    let mut session = Session::new(&FixtureProvider, &ENGINE, &mut presenter, config(Language::English));
    let records = session.run(script.as_bytes(), &mut output).unwrap();

    let summary = SessionSummary::from_records(&records);
    assert_eq!(summary.lines.len(), 2);
    assert_eq!(summary.lines[0].observations, 3);
    assert_eq!(summary.lines[1].observations, 5);
    assert_eq!(summary.lines[1].last_close, Some(108.0));
}

// ── Properties ───────────────────────────────────────────────────────

proptest! {
    /// Unknown numeric tickers never end the session early or produce records.
    #[test]
    fn unknown_tickers_never_fail_the_session(tickers in prop::collection::vec("[0-9]{1,6}", 0..8)) {
        let mut script = tickers.join("\n");
        script.push_str("\nexit\n");
        let mut presenter = RecordingPresenter::default();
        let (records, output, state) = run_script(&script, &mut presenter, Language::English);
        prop_assert_eq!(records, 0);
        prop_assert_eq!(state, SessionState::Terminated);
        prop_assert_eq!(output.matches("Asset not found").count(), tickers.len());
    }
}
