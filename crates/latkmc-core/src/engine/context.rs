use super::config::SimulationConfig;
use super::progress::ProgressReporter;
use crate::core::lattice::Lattice;
use crate::core::potential::Potential;
use crate::core::temperature::TemperatureSchedule;

/// Read-only bundle of everything a move algorithm needs besides the mutable
/// surface state: the geometry, the energy model, the schedule, the run
/// configuration, and the progress sink. The per-site landing weights are
/// resolved once from the lattice's site-type groups.
pub struct SimulationContext<'a> {
    pub lattice: &'a Lattice,
    pub potential: &'a dyn Potential,
    pub schedule: &'a dyn TemperatureSchedule,
    pub config: &'a SimulationConfig,
    pub reporter: &'a ProgressReporter<'a>,
    pub landing: Vec<f64>,
}

impl<'a> SimulationContext<'a> {
    pub fn new(
        lattice: &'a Lattice,
        config: &'a SimulationConfig,
        potential: &'a dyn Potential,
        schedule: &'a dyn TemperatureSchedule,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            lattice,
            potential,
            schedule,
            config,
            reporter,
            landing: lattice.landing_probabilities(),
        }
    }
}
