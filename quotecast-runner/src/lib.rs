//! quotecast runner: per-asset pipeline and the interactive session loop.
//!
//! This crate builds on `quotecast-core` to provide:
//! - `analyze_asset()`: fetch, forecast and interpret one asset
//! - `Session`: the prompt → validate → analyse → render loop
//! - `SessionSummary`: the end-of-session report

pub mod pipeline;
pub mod session;
pub mod summary;

pub use pipeline::{analyze_asset, AnalysisRequest, PipelineError, PipelineOptions};
pub use session::{Session, SessionConfig, SessionError, SessionState, LEGACY_EXIT_WORD};
pub use summary::{SessionSummary, SummaryLine};
