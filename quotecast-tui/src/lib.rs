//! quotecast TUI: ratatui rendering of history and forecast line charts.

pub mod chart;
pub mod presenter;
pub mod theme;

pub use chart::{LineChartWidget, PlotData};
pub use presenter::TerminalPresenter;
pub use theme::Theme;
