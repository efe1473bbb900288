//! SAT encoding, solving and decoding for square tiling

pub mod variables;
pub mod compatibility;
pub mod constraints;
pub mod dimacs;
pub mod decoder;
pub mod solver;
pub mod external;
pub mod solver_factory;
pub mod encoder;

pub use variables::{CellVariable, VariableIndexer};
pub use compatibility::CompatibilityTable;
pub use constraints::{Clause, ClauseGenerator, ClauseStatistics};
pub use dimacs::{Cnf, parse_model};
pub use decoder::{DecodeAnomaly, DecodedModel, ModelDecoder};
pub use solver::{SatBackend, SatSolver, SolveResult, SolverResultType, SolverSolution, SolverStatistics};
pub use external::ExternalSolver;
pub use solver_factory::UnifiedSatSolver;
pub use encoder::{EncodedSolve, TilingEncoder};
