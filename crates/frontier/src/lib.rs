//! Command-line front end for the efficient-frontier sampler
//!
//! The simulator in `frontier_core` takes plain numbers and returns plain
//! numbers. This crate supplies the collaborators around it:
//! - Price input (CSV files) and ticker selection
//! - Parameter input from flags, a YAML config file or interactive prompts
//! - Output sinks: a text report, a CSV export of every sample and an
//!   interactive terminal scatter plot
//! - File logging

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod util;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analysis::{AnalysisOptions, PreparedInputs, prepare_inputs, run_simulation};
pub use config::RunConfig;
pub use error::{ConfigError, InputError, OutputError};
pub use input::{CsvPriceSource, LoadedPrices, PriceSource, parse_tickers};
pub use logging::init_logging;
pub use output::{CsvExport, OutputSink, RunReport, ScatterPlot, TextReport};
pub use prompt::{ArgsProvider, ParameterProvider, PromptProvider, SimulationParameters};
