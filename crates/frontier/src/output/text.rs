use std::io::{self, Write};

use frontier_core::RankedPortfolio;

use super::{OutputSink, RunReport};
use crate::error::OutputError;
use crate::util::format::{format_percentage, format_ratio};

/// Plain-text summary of both optimal portfolios
pub struct TextReport<W> {
    out: W,
}

impl TextReport<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_portfolio(
        &mut self,
        heading: &str,
        tickers: &[String],
        ranked: RankedPortfolio<'_>,
    ) -> io::Result<()> {
        let portfolio = ranked.portfolio;
        let width = tickers
            .iter()
            .map(|t| t.len() + "_weight".len())
            .max()
            .unwrap_or(0)
            .max("Volatility".len());

        writeln!(self.out)?;
        writeln!(self.out, "--- {heading} ---")?;
        writeln!(
            self.out,
            "{:<width$}  {:>10.4}  ({})",
            "Return",
            portfolio.annual_return(),
            format_percentage(portfolio.annual_return())
        )?;
        writeln!(
            self.out,
            "{:<width$}  {:>10.4}  ({})",
            "Volatility",
            portfolio.volatility(),
            format_percentage(portfolio.volatility())
        )?;
        writeln!(
            self.out,
            "{:<width$}  {:>10}",
            "Sharpe",
            format_ratio(portfolio.sharpe_ratio())
        )?;
        for (ticker, weight) in tickers.iter().zip(portfolio.weights()) {
            writeln!(
                self.out,
                "{:<width$}  {:>10.4}  ({})",
                format!("{ticker}_weight"),
                weight,
                format_percentage(*weight)
            )?;
        }
        Ok(())
    }
}

impl<W: Write> OutputSink for TextReport<W> {
    fn emit(&mut self, report: &RunReport<'_>) -> Result<(), OutputError> {
        let tickers = report.tickers();
        self.write_portfolio("Max Sharpe Ratio Portfolio", tickers, report.optimal.max_sharpe)?;
        self.write_portfolio(
            "Minimum Volatility Portfolio",
            tickers,
            report.optimal.min_volatility,
        )?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample_result;

    #[test]
    fn test_report_lists_both_portfolios() {
        let result = sample_result(500);
        let report = RunReport::new(&result).unwrap();

        let mut sink = TextReport::new(Vec::new());
        sink.emit(&report).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();

        let max_pos = text.find("--- Max Sharpe Ratio Portfolio ---").unwrap();
        let min_pos = text.find("--- Minimum Volatility Portfolio ---").unwrap();
        assert!(max_pos < min_pos);
        assert_eq!(text.matches("VTI_weight").count(), 2);
        assert_eq!(text.matches("BND_weight").count(), 2);
        assert_eq!(text.matches("Sharpe").count(), 3);

        let sharpe = report.optimal.max_sharpe.portfolio.sharpe_ratio();
        assert!(text.contains(&format!("{sharpe:.4}")));
    }
}
