use std::fmt;

/// Structural problems with a covariance matrix
#[derive(Debug, Clone, PartialEq)]
pub enum CovarianceError {
    /// A row does not have as many entries as there are rows
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
    /// Matrix dimension does not match the number of assets
    DimensionMismatch { assets: usize, matrix: usize },
    Asymmetric {
        row: usize,
        col: usize,
        upper: f64,
        lower: f64,
    },
    NegativeVariance { index: usize, variance: f64 },
    NonFinite { row: usize, col: usize },
}

impl fmt::Display for CovarianceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CovarianceError::NotSquare { row, len, expected } => {
                write!(f, "row {row} has {len} entries, expected {expected}")
            }
            CovarianceError::DimensionMismatch { assets, matrix } => {
                write!(f, "matrix is {matrix}x{matrix} but there are {assets} assets")
            }
            CovarianceError::Asymmetric {
                row,
                col,
                upper,
                lower,
            } => write!(
                f,
                "matrix is not symmetric at ({row}, {col}): {upper} != {lower}"
            ),
            CovarianceError::NegativeVariance { index, variance } => {
                write!(f, "diagonal entry {index} is negative ({variance})")
            }
            CovarianceError::NonFinite { row, col } => {
                write!(f, "entry ({row}, {col}) is not finite")
            }
        }
    }
}

impl std::error::Error for CovarianceError {}

/// Errors raised while turning price history into return statistics
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    NoAssets,
    /// A price column does not line up with the date index
    ShapeMismatch {
        asset: String,
        expected: usize,
        found: usize,
    },
    /// Not enough observations to estimate a mean or (co)variance
    InsufficientData { asset: String, observations: usize },
    /// Returns overflowed, usually from extreme or corrupt prices
    NonFinite { asset: String },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::NoAssets => write!(f, "no assets in price table"),
            DataError::ShapeMismatch {
                asset,
                expected,
                found,
            } => write!(
                f,
                "price column {asset} has {found} rows, expected {expected}"
            ),
            DataError::InsufficientData {
                asset,
                observations,
            } => write!(
                f,
                "{asset} has {observations} usable return observation(s), at least 2 are required"
            ),
            DataError::NonFinite { asset } => {
                write!(f, "return statistics for {asset} are not finite")
            }
        }
    }
}

impl std::error::Error for DataError {}

/// Errors that abort a simulation run before any draw is produced
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Fewer than two assets were supplied
    InsufficientAssets { found: usize },
    InvalidCovariance(CovarianceError),
    InvalidInput(String),
    /// The run was cancelled through its progress handle
    Cancelled,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InsufficientAssets { found } => write!(
                f,
                "at least two assets are required for portfolio optimization, found {found}"
            ),
            SimulationError::InvalidCovariance(e) => write!(f, "invalid covariance matrix: {e}"),
            SimulationError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            SimulationError::Cancelled => write!(f, "simulation cancelled"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::InvalidCovariance(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CovarianceError> for SimulationError {
    fn from(e: CovarianceError) -> Self {
        SimulationError::InvalidCovariance(e)
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
