//! Integration tests for the portfolio simulator
//!
//! Tests are organized by topic:
//! - `properties` - Invariants that hold for every draw (simplex weights,
//!   non-negative volatility, determinism, selection membership)
//! - `scenarios` - Worked two-asset cases with known answers
//! - `degenerate` - Zero-variance assets, near-singular matrices and
//!   precondition failures
//! - `pipeline` - Prices through return statistics into the simulator

mod properties;
