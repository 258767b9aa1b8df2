//! Where a finished run goes: the terminal report, a CSV file, the plot.

mod export;
mod plot;
mod text;

pub use export::CsvExport;
pub use plot::{ScatterPlot, render_frontier};
pub use text::TextReport;

use frontier_core::{OptimalPortfolios, SimulationResult};

use crate::error::OutputError;

/// A simulation result with its optimal portfolios already selected
#[derive(Debug, Clone, Copy)]
pub struct RunReport<'a> {
    pub result: &'a SimulationResult,
    pub optimal: OptimalPortfolios<'a>,
}

impl<'a> RunReport<'a> {
    pub fn new(result: &'a SimulationResult) -> Result<Self, OutputError> {
        let optimal = result.select().ok_or(OutputError::EmptyResult)?;
        Ok(Self { result, optimal })
    }

    pub fn tickers(&self) -> &'a [String] {
        self.result.asset_names()
    }
}

pub trait OutputSink {
    fn emit(&mut self, report: &RunReport<'_>) -> Result<(), OutputError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_selects_optima() {
        let result = test_support::sample_result(200);
        let report = RunReport::new(&result).unwrap();

        assert_eq!(report.tickers(), ["VTI", "BND"]);
        assert_eq!(Some(report.optimal.max_sharpe), result.max_sharpe());
        assert_eq!(Some(report.optimal.min_volatility), result.min_volatility());
    }
}
