//! # Core Module
//!
//! Stateless foundations of the simulation: the read-only lattice-provider
//! contract consumed by the engine, the pluggable scalar potential models,
//! and the per-lap temperature schedules.
//!
//! Nothing in this module mutates simulation state; the engine layer reads
//! these types while driving deposition and diffusion.

pub mod lattice;
pub mod potential;
pub mod temperature;
