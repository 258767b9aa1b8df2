//! Run parameters: from the command line and config file, or asked for
//! interactively.

use std::io::{self, BufRead, Write};

use frontier_core::{DEFAULT_NUM_PORTFOLIOS, DEFAULT_RISK_FREE_RATE, MIN_RECOMMENDED_PORTFOLIOS};
use tracing::debug;

use crate::config::RunConfig;
use crate::error::InputError;
use crate::input::parse_tickers;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    pub num_portfolios: usize,
    /// Annual risk-free rate as a fraction
    pub risk_free_rate: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            num_portfolios: DEFAULT_NUM_PORTFOLIOS,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }
}

pub trait ParameterProvider {
    /// Tickers to analyze; empty means every asset the price source has
    fn tickers(&mut self) -> Result<Vec<String>, InputError>;

    fn simulation_parameters(&mut self) -> Result<SimulationParameters, InputError>;
}

/// Parameters fixed up front by flags and the config file
#[derive(Debug, Clone)]
pub struct ArgsProvider {
    tickers: Vec<String>,
    parameters: SimulationParameters,
}

impl ArgsProvider {
    pub fn new(tickers: Vec<String>, parameters: SimulationParameters) -> Self {
        Self {
            tickers,
            parameters,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        let tickers = parse_tickers(&config.tickers.join(","));
        Self::new(
            tickers,
            SimulationParameters {
                num_portfolios: config.simulations,
                risk_free_rate: config.risk_free_rate,
            },
        )
    }
}

impl ParameterProvider for ArgsProvider {
    fn tickers(&mut self) -> Result<Vec<String>, InputError> {
        Ok(self.tickers.clone())
    }

    fn simulation_parameters(&mut self) -> Result<SimulationParameters, InputError> {
        Ok(self.parameters)
    }
}

/// Asks for each value on `output` and reads answers from `input`.
///
/// Empty answers take the defaults. Unparseable answers and draw counts
/// below the recommended minimum are asked again.
pub struct PromptProvider<R, W> {
    input: R,
    output: W,
    defaults: SimulationParameters,
}

impl PromptProvider<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptProvider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            defaults: SimulationParameters::default(),
        }
    }

    /// Defaults offered for empty answers
    #[must_use]
    pub fn with_defaults(mut self, defaults: SimulationParameters) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, prompt: &str) -> Result<String, InputError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputError::EndOfInput);
        }
        Ok(line.trim().to_string())
    }

    fn ask_num_portfolios(&mut self) -> Result<usize, InputError> {
        let prompt = format!(
            "Enter the number of portfolio simulations to run [default: {}]: ",
            self.defaults.num_portfolios
        );
        loop {
            let answer = self.ask(&prompt)?;
            if answer.is_empty() {
                return Ok(self.defaults.num_portfolios);
            }
            match answer.parse::<usize>() {
                Ok(n) if n < MIN_RECOMMENDED_PORTFOLIOS => {
                    debug!(n, "Rejected low simulation count");
                    writeln!(
                        self.output,
                        "For meaningful results, please enter a number of at least 1000."
                    )?;
                }
                Ok(n) => return Ok(n),
                Err(_) => writeln!(self.output, "Invalid input. Please enter a whole number.")?,
            }
        }
    }

    fn ask_risk_free_rate(&mut self) -> Result<f64, InputError> {
        let prompt = format!(
            "Enter the risk-free rate as a percentage (e.g., 2 for 2%) [default: {:.1}]: ",
            self.defaults.risk_free_rate * 100.0
        );
        loop {
            let answer = self.ask(&prompt)?;
            if answer.is_empty() {
                return Ok(self.defaults.risk_free_rate);
            }
            match answer.parse::<f64>() {
                Ok(percent) if percent.is_finite() => return Ok(percent / 100.0),
                _ => writeln!(self.output, "Invalid input. Please enter a number (e.g., 2.5).")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> ParameterProvider for PromptProvider<R, W> {
    fn tickers(&mut self) -> Result<Vec<String>, InputError> {
        writeln!(
            self.output,
            "Enter stock tickers separated by spaces or commas (e.g., VTI, BND, GLD)."
        )?;
        let tickers = parse_tickers(&self.ask("Tickers: ")?);
        if tickers.is_empty() {
            return Err(InputError::NoTickers);
        }
        writeln!(self.output, "You entered: {}", tickers.join(", "))?;
        Ok(tickers)
    }

    fn simulation_parameters(&mut self) -> Result<SimulationParameters, InputError> {
        Ok(SimulationParameters {
            num_portfolios: self.ask_num_portfolios()?,
            risk_free_rate: self.ask_risk_free_rate()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn provider(input: &str) -> PromptProvider<Cursor<Vec<u8>>, Vec<u8>> {
        PromptProvider::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(provider: PromptProvider<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(provider.into_output()).unwrap()
    }

    #[test]
    fn test_defaults_on_empty_answers() {
        let mut p = provider("\n\n");
        let params = p.simulation_parameters().unwrap();

        assert_eq!(params.num_portfolios, 20_000);
        assert!((params.risk_free_rate - 0.02).abs() < 1e-12);
        assert!(output(p).contains("[default: 20000]"));
    }

    #[test]
    fn test_explicit_answers() {
        let mut p = provider("5000\n3.5\n");
        let params = p.simulation_parameters().unwrap();

        assert_eq!(params.num_portfolios, 5_000);
        assert!((params.risk_free_rate - 0.035).abs() < 1e-12);
    }

    #[test]
    fn test_reprompts_on_bad_and_low_counts() {
        let mut p = provider("lots\n100\n500\nabc\n1\n");
        let params = p.simulation_parameters().unwrap();

        assert_eq!(params.num_portfolios, 500);
        assert!((params.risk_free_rate - 0.01).abs() < 1e-12);

        let text = output(p);
        assert!(text.contains("Invalid input. Please enter a whole number."));
        assert!(text.contains("please enter a number of at least 1000"));
        assert!(text.contains("Invalid input. Please enter a number (e.g., 2.5)."));
    }

    #[test]
    fn test_tickers() {
        let mut p = provider("vti, bnd gld\n");
        assert_eq!(p.tickers().unwrap(), vec!["VTI", "BND", "GLD"]);
        assert!(output(p).contains("You entered: VTI, BND, GLD"));
    }

    #[test]
    fn test_no_tickers() {
        let mut p = provider("  \n");
        assert!(matches!(p.tickers(), Err(InputError::NoTickers)));
    }

    #[test]
    fn test_end_of_input() {
        let mut p = provider("");
        assert!(matches!(
            p.simulation_parameters(),
            Err(InputError::EndOfInput)
        ));
    }

    #[test]
    fn test_args_provider_from_config() {
        let config = RunConfig {
            tickers: vec!["vti".into(), "bnd, gld".into()],
            simulations: 800,
            risk_free_rate: 0.03,
            ..Default::default()
        };
        let mut p = ArgsProvider::from_config(&config);

        assert_eq!(p.tickers().unwrap(), vec!["VTI", "BND", "GLD"]);
        assert_eq!(
            p.simulation_parameters().unwrap(),
            SimulationParameters {
                num_portfolios: 800,
                risk_free_rate: 0.03,
            }
        );
    }
}
