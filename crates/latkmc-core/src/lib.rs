//! # latkmc Core Library
//!
//! A kinetic Monte Carlo (KMC) library simulating particle deposition and
//! surface diffusion on two-dimensional lattices: adatoms are stochastically
//! dropped onto vacant lattice sites and hop between sites according to an
//! energy model and a temperature-dependent acceptance rule, reproducing
//! non-equilibrium growth and relaxation dynamics on a crystal surface.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a
//! clear separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains the stateless lattice-provider
//!   contract (`Lattice`, `ShellTopology`), pure energy models
//!   (`Potential`), and temperature schedules.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer holds the occupancy
//!   and energy bookkeeping (`SurfaceState`), the deposition and diffusion
//!   algorithms with their neighbor-shell exclusion rules, Boltzmann-weighted
//!   hop selection, and checkpoint persistence.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer.
//!   It ties the `engine` and `core` together to execute a complete growth
//!   run: prepopulation, the lap/step scheduling loop, checkpointing, and the
//!   visualization hand-off.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
pub(crate) mod test_util;
