//! Output helpers shared by the CLI

pub mod display;

pub use display::{ColorOutput, PlacementFormatter, MISSING_MODEL_MESSAGE, UNSAT_MESSAGE};
