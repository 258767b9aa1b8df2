use std::path::PathBuf;

use tracing::info;

use super::{OutputSink, RunReport};
use crate::error::OutputError;

/// Writes every sampled portfolio as one CSV row:
/// `Return,Volatility,Sharpe,<TICKER>_weight...`
#[derive(Debug, Clone)]
pub struct CsvExport {
    path: PathBuf,
}

impl CsvExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputSink for CsvExport {
    fn emit(&mut self, report: &RunReport<'_>) -> Result<(), OutputError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(&self.path)?;

        let mut header = vec![
            "Return".to_string(),
            "Volatility".to_string(),
            "Sharpe".to_string(),
        ];
        header.extend(report.tickers().iter().map(|t| format!("{t}_weight")));
        writer.write_record(&header)?;

        let mut record = Vec::with_capacity(header.len());
        for portfolio in report.result.iter() {
            record.clear();
            record.push(portfolio.annual_return().to_string());
            record.push(portfolio.volatility().to_string());
            record.push(portfolio.sharpe_ratio().to_string());
            record.extend(portfolio.weights().iter().map(f64::to_string));
            writer.write_record(&record)?;
        }
        writer.flush()?;

        info!(
            path = %self.path.display(),
            rows = report.result.len(),
            "Exported portfolios"
        );
        Ok(())
    }
}
