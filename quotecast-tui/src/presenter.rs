//! Full-screen terminal presenter.
//!
//! Each chart takes over the terminal (raw mode + alternate screen) until a
//! key is pressed, then the terminal is handed back to the line-based prompt.

use std::io::{self, Stdout};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::debug;

use quotecast_core::present::{ChartPresenter, LineChart, RenderError};

use crate::chart::{LineChartWidget, PlotData};
use crate::theme::Theme;

#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPresenter {
    theme: Theme,
}

impl TerminalPresenter {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }
}

/// Restores the terminal when dropped, including on early return.
struct ScreenGuard;

impl ScreenGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

fn wait_for_key() -> io::Result<()> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}

impl ChartPresenter for TerminalPresenter {
    fn render_line_chart(&mut self, chart: &LineChart) -> Result<(), RenderError> {
        if PlotData::from_chart(chart).is_none() {
            return Err(RenderError::NoData {
                title: chart.title.clone(),
            });
        }

        let _guard = ScreenGuard::enter()?;
        let mut terminal: Terminal<CrosstermBackend<Stdout>> = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.clear()?;
        terminal.draw(|f| f.render_widget(LineChartWidget::new(chart, &self.theme), f.area()))?;
        debug!(title = %chart.title, points = chart.points.len(), "chart drawn");

        wait_for_key()?;
        terminal.show_cursor()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chart_is_rejected_before_touching_the_terminal() {
        let chart = LineChart {
            title: "Price forecast of X".into(),
            x_title: "Date".into(),
            y_title: "Asset value".into(),
            points: vec![],
            annotation: String::new(),
        };
        let err = TerminalPresenter::default().render_line_chart(&chart).unwrap_err();
        assert!(matches!(err, RenderError::NoData { title } if title == "Price forecast of X"));
    }
}
