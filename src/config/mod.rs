//! Configuration management for the square tiling solver

pub mod settings;

pub use settings::{
    Settings, InputConfig, SolverConfig, OutputConfig, EncodingConfig,
    OutputFormat, CliOverrides, SolverBackend
};
