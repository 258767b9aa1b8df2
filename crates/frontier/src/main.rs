use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{WrapErr, eyre};
use frontier::util::format::{format_count, format_percentage};
use frontier::{
    AnalysisOptions, ArgsProvider, CsvExport, CsvPriceSource, OutputSink, ParameterProvider,
    PriceSource, PromptProvider, RunConfig, RunReport, ScatterPlot, SimulationParameters,
    TextReport, init_logging, parse_tickers, prepare_inputs, run_simulation,
};
use frontier_core::{MIN_RECOMMENDED_PORTFOLIOS, SimulationProgress, WeightSampling};

#[derive(Parser, Debug)]
#[command(name = "frontier")]
#[command(about = "Monte Carlo efficient-frontier sampler for a basket of assets")]
struct Args {
    /// CSV file of closing prices: a date column followed by one column per ticker
    #[arg(long)]
    prices: Option<PathBuf>,

    /// Tickers to analyze, separated by commas or spaces (default: every column)
    #[arg(long)]
    tickers: Option<String>,

    /// Number of random portfolios to sample
    #[arg(short = 'n', long)]
    simulations: Option<usize>,

    /// Annual risk-free rate as a percentage (2 for 2%)
    #[arg(short = 'r', long)]
    risk_free_rate: Option<f64>,

    /// Seed for a reproducible run (default: random)
    #[arg(long)]
    seed: Option<u64>,

    /// Price observations per year, 252 for daily closes
    #[arg(long)]
    periods_per_year: Option<f64>,

    /// Years of history to use, counted back from the latest price (0 for all)
    #[arg(long)]
    lookback_years: Option<i16>,

    /// How random weights are drawn
    #[arg(long, value_enum)]
    sampling: Option<SamplingArg>,

    /// Also write every sampled portfolio to this CSV file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Skip the interactive plot
    #[arg(long)]
    no_plot: bool,

    /// Prompt for tickers, simulation count and risk-free rate
    #[arg(long)]
    interactive: bool,

    /// Path to the data directory (default: ~/.frontier/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Config file (default: <data-dir>/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save the effective configuration to the config file before running
    #[arg(long)]
    write_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SamplingArg {
    Uniform,
    Dirichlet,
}

impl From<SamplingArg> for WeightSampling {
    fn from(arg: SamplingArg) -> Self {
        match arg {
            SamplingArg::Uniform => WeightSampling::UniformNormalized,
            SamplingArg::Dirichlet => WeightSampling::Dirichlet,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".frontier")
}

/// Flags win over values from the config file
fn apply_overrides(config: &mut RunConfig, args: &Args) {
    if let Some(prices) = &args.prices {
        config.prices = Some(prices.clone());
    }
    if let Some(tickers) = &args.tickers {
        config.tickers = parse_tickers(tickers);
    }
    if let Some(simulations) = args.simulations {
        config.simulations = simulations;
    }
    if let Some(percent) = args.risk_free_rate {
        config.risk_free_rate = percent / 100.0;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(periods) = args.periods_per_year {
        config.periods_per_year = periods;
    }
    if let Some(years) = args.lookback_years {
        config.lookback_years = (years != 0).then_some(years);
    }
    if let Some(sampling) = args.sampling {
        config.sampling = sampling.into();
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| RunConfig::path(&data_dir));
    let mut config = RunConfig::load_or_default(&config_path)?;
    apply_overrides(&mut config, &args);
    config.validate()?;

    if args.write_config {
        config.save(&config_path)?;
        println!("Saved configuration to {}", config_path.display());
    }

    let defaults = SimulationParameters {
        num_portfolios: config.simulations,
        risk_free_rate: config.risk_free_rate,
    };
    let (tickers, parameters) = if args.interactive {
        let mut provider = PromptProvider::stdio().with_defaults(defaults);
        (provider.tickers()?, provider.simulation_parameters()?)
    } else {
        let mut provider = ArgsProvider::from_config(&config);
        (provider.tickers()?, provider.simulation_parameters()?)
    };

    let prices_path = config.prices.clone().ok_or_else(|| {
        eyre!(
            "no price file given; pass --prices or set `prices` in {}",
            config_path.display()
        )
    })?;

    println!("\nLoading prices from {}...", prices_path.display());
    let loaded = CsvPriceSource::new(&prices_path)
        .with_lookback_years(config.lookback_years)
        .load(&tickers)
        .wrap_err_with(|| format!("failed to load {}", prices_path.display()))?;

    let prepared = prepare_inputs(loaded, config.periods_per_year)?;
    if !prepared.excluded.is_empty() {
        println!(
            "Warning: Could not find data for: {}. They will be excluded.",
            prepared.excluded.join(", ")
        );
    }
    println!(
        "Loaded data for: {}",
        prepared.inputs.asset_names().join(", ")
    );

    if parameters.num_portfolios < MIN_RECOMMENDED_PORTFOLIOS {
        tracing::warn!(
            num_portfolios = parameters.num_portfolios,
            "Low simulation count"
        );
        println!(
            "Warning: {} simulations is a sparse sample; at least {} is recommended.",
            parameters.num_portfolios,
            format_count(MIN_RECOMMENDED_PORTFOLIOS)
        );
    }

    println!(
        "\nConfiguration: Running {} simulations with a risk-free rate of {}.",
        format_count(parameters.num_portfolios),
        format_percentage(parameters.risk_free_rate)
    );

    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "Using seed");

    let options = AnalysisOptions {
        sampling: config.sampling,
        seed,
    };

    println!("\nRunning Monte Carlo Simulation...");
    let progress = SimulationProgress::new(parameters.num_portfolios);
    let result = thread::scope(|s| {
        let worker =
            s.spawn(|| run_simulation(&prepared.inputs, parameters, options, Some(&progress)));
        while !worker.is_finished() {
            eprint!("\r  {:>5.1}%", progress.fraction() * 100.0);
            thread::sleep(Duration::from_millis(100));
        }
        eprintln!("\r  {:>5.1}%", 100.0);
        worker
            .join()
            .map_err(|_| eyre!("simulation thread panicked"))
    })??;
    println!("Simulation Complete. Identifying optimal portfolios.");

    let report = RunReport::new(&result)?;
    TextReport::stdout().emit(&report)?;

    if let Some(path) = &args.export {
        CsvExport::new(path).emit(&report)?;
        println!(
            "\nSaved {} portfolios to {}",
            format_count(result.len()),
            path.display()
        );
    }

    if !args.no_plot {
        println!("\nGenerating plot...");
        ScatterPlot::new(report.tickers()).emit(&report)?;
        println!("Plot displayed.");
    }

    tracing::info!("Run finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overridden(flags: &[&str]) -> RunConfig {
        let args = Args::parse_from(std::iter::once("frontier").chain(flags.iter().copied()));
        let mut config = RunConfig::default();
        apply_overrides(&mut config, &args);
        config
    }

    #[test]
    fn test_no_flags_keep_config() {
        assert_eq!(overridden(&[]), RunConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let config = overridden(&[
            "--prices",
            "closes.csv",
            "--tickers",
            "vti,bnd",
            "-n",
            "5000",
            "-r",
            "3",
            "--seed",
            "9",
            "--periods-per-year",
            "52",
            "--lookback-years",
            "2",
            "--sampling",
            "dirichlet",
        ]);

        assert_eq!(config.prices, Some(PathBuf::from("closes.csv")));
        assert_eq!(config.tickers, vec!["VTI", "BND"]);
        assert_eq!(config.simulations, 5_000);
        assert!((config.risk_free_rate - 0.03).abs() < 1e-12);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.periods_per_year, 52.0);
        assert_eq!(config.lookback_years, Some(2));
        assert_eq!(config.sampling, WeightSampling::Dirichlet);
    }

    #[test]
    fn test_zero_lookback_uses_full_history() {
        let config = overridden(&["--lookback-years", "0"]);
        assert_eq!(config.lookback_years, None);
        config.validate().unwrap();
    }

    #[test]
    fn test_negative_lookback_still_rejected() {
        let config = overridden(&["--lookback-years=-3"]);
        assert_eq!(config.lookback_years, Some(-3));
        assert!(config.validate().is_err());
    }
}

