use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use super::{OutputSink, RunReport};
use crate::error::OutputError;
use crate::util::format::{format_percentage, format_ratio};

const MIN_VOLATILITY_COLOR: Color = Color::Rgb(255, 165, 0);

/// Interactive volatility/return scatter of every sampled portfolio.
///
/// Takes over the terminal until `q`, `Esc` or `Enter` is pressed.
#[derive(Debug, Clone)]
pub struct ScatterPlot {
    title: String,
}

impl ScatterPlot {
    pub fn new(tickers: &[String]) -> Self {
        Self {
            title: format!("Portfolio Optimization - {}", tickers.join(" & ")),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn show(&self, terminal: &mut DefaultTerminal, report: &RunReport<'_>) -> io::Result<()> {
        loop {
            terminal.draw(|frame| {
                let area = frame.area();
                render_frontier(frame, area, &self.title, report);
            })?;

            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter)
            {
                return Ok(());
            }
        }
    }
}

impl OutputSink for ScatterPlot {
    fn emit(&mut self, report: &RunReport<'_>) -> Result<(), OutputError> {
        tracing::info!(points = report.result.len(), "Opening frontier plot");
        ratatui::run(|terminal| self.show(terminal, report))?;
        tracing::info!("Plot closed");
        Ok(())
    }
}

/// Sharpe values splitting the finite ratios into thirds
fn tertile_bounds(report: &RunReport<'_>) -> (f64, f64) {
    let mut sharpes: Vec<f64> = report
        .result
        .iter()
        .map(|p| p.sharpe_ratio())
        .filter(|s| s.is_finite())
        .collect();
    if sharpes.is_empty() {
        return (0.0, 0.0);
    }
    sharpes.sort_by(f64::total_cmp);
    let at = |q: f64| sharpes[((sharpes.len() - 1) as f64 * q).round() as usize];
    (at(1.0 / 3.0), at(2.0 / 3.0))
}

/// Axis bounds with a little padding so edge points stay visible
fn padded_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let padding = (max - min).abs().max(1e-4) * 0.05;
    [min - padding, max + padding]
}

fn axis_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let [lo, hi] = bounds;
    vec![
        Span::raw(format_percentage(lo)),
        Span::raw(format_percentage((lo + hi) / 2.0)),
        Span::raw(format_percentage(hi)),
    ]
}

fn scatter<'a>(
    name: &'static str,
    color: Color,
    marker: symbols::Marker,
    data: &'a [(f64, f64)],
) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(marker)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(color))
        .data(data)
}

/// Draw the frontier chart with a legend line underneath.
pub fn render_frontier(frame: &mut Frame, area: Rect, title: &str, report: &RunReport<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(area);

    let (low, high) = tertile_bounds(report);
    let mut tiers: [Vec<(f64, f64)>; 3] = Default::default();
    for p in report.result.iter() {
        let point = (p.volatility(), p.annual_return());
        let sharpe = p.sharpe_ratio();
        let tier = if sharpe <= low {
            0
        } else if sharpe <= high {
            1
        } else {
            2
        };
        tiers[tier].push(point);
    }

    let max_sharpe = report.optimal.max_sharpe.portfolio;
    let min_vol = report.optimal.min_volatility.portfolio;
    let max_sharpe_point = [(max_sharpe.volatility(), max_sharpe.annual_return())];
    let min_vol_point = [(min_vol.volatility(), min_vol.annual_return())];

    let datasets = vec![
        scatter("Low Sharpe", Color::Blue, symbols::Marker::Braille, &tiers[0]),
        scatter("Mid Sharpe", Color::Cyan, symbols::Marker::Braille, &tiers[1]),
        scatter("High Sharpe", Color::Green, symbols::Marker::Braille, &tiers[2]),
        scatter("Max Sharpe", Color::Red, symbols::Marker::Block, &max_sharpe_point),
        scatter(
            "Min Volatility",
            MIN_VOLATILITY_COLOR,
            symbols::Marker::Block,
            &min_vol_point,
        ),
    ];

    let x_bounds = padded_bounds(report.result.iter().map(|p| p.volatility()));
    let y_bounds = padded_bounds(report.result.iter().map(|p| p.annual_return()));

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {title} ")),
        )
        .x_axis(
            Axis::default()
                .title("Annualized Volatility".dark_gray())
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title("Annualized Return".dark_gray())
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        );
    frame.render_widget(chart, chunks[0]);

    let footer = Line::from(vec![
        Span::styled("* ", Style::default().fg(Color::Red)),
        Span::raw(format!(
            "Max Sharpe {}   ",
            format_ratio(max_sharpe.sharpe_ratio())
        )),
        Span::styled("* ", Style::default().fg(MIN_VOLATILITY_COLOR)),
        Span::raw(format!(
            "Min Volatility {}   ",
            format_percentage(min_vol.volatility())
        )),
        "q/Esc to close".dark_gray(),
    ]);
    frame.render_widget(Paragraph::new(footer), chunks[1]);
}
