//! Square tiling problem definition and solution handling

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::{TilingOutcome, TilingProblem};
pub use solution::{Solution, SolutionMetadata, SolutionSummary};
pub use validator::{PlacementValidator, PlacementViolation, ValidationResult};
