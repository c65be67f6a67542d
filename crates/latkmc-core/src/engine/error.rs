use thiserror::Error;

use super::checkpoint::CheckpointError;
use super::config::ConfigError;
use super::sampling::SamplingError;
use crate::core::lattice::LatticeError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Deposition found no admissible vacant site within {attempts} attempts")]
    ExhaustedAttempts { attempts: usize },

    #[error("Single-occupancy invariant violated at site {site}")]
    InvariantViolation { site: usize },

    #[error("Index {index} is out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Diffusion requires at least one adatom on the surface")]
    NoAdatoms,

    #[error("Hop selection failed: {source}")]
    Sampling {
        #[from]
        source: SamplingError,
    },

    #[error("Lattice rejected: {source}")]
    Lattice {
        #[from]
        source: LatticeError,
    },

    #[error("Checkpoint write failed: {source}")]
    Checkpoint {
        #[from]
        source: CheckpointError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
