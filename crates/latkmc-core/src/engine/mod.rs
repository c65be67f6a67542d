//! # Engine Module
//!
//! The stateful logic core of the simulation. It owns the per-site occupancy
//! and energy bookkeeping, implements the deposition and diffusion
//! algorithms with their neighbor-shell exclusion rules and Boltzmann-
//! weighted hop selection, and persists checkpoints.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - lap scheduling parameters, coverage
//!   target, and prepopulation variants
//! - **State Tracking** ([`state`]) - occupancy/energy vectors, snapshot
//!   buffers, and move/placement counters
//! - **Stochastic Selection** ([`sampling`]) - masked Boltzmann-weighted
//!   candidate choice
//! - **Moves** ([`deposition`], [`diffusion`]) - the two state-mutating
//!   algorithms
//! - **Persistence** ([`checkpoint`]) - the one-shot geometry artifact and
//!   per-lap occupancy snapshots
//! - **Progress Monitoring** ([`progress`]) - progress events and the
//!   visualization hand-off messages
//! - **Error Handling** ([`error`]) - engine-specific error taxonomy

pub mod checkpoint;
pub mod config;
pub mod context;
pub mod deposition;
pub mod diffusion;
pub mod error;
pub mod progress;
pub mod sampling;
pub mod state;
