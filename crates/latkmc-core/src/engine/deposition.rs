use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::trace;

use super::context::SimulationContext;
use super::error::EngineError;
use super::sampling::SamplingError;
use super::state::SurfaceState;

/// Attempts to land one adatom on the surface.
///
/// A candidate is drawn among the vacant sites, weighted by the per-site
/// landing probability of its site-type group, and accepted iff its
/// exclusion-zone shell contains no adatom. Up to `site_count` candidates
/// are tried; exhausting the budget leaves the state untouched and surfaces
/// [`EngineError::ExhaustedAttempts`] so the caller can skip the step.
///
/// On success the stored energies of the new adatom and of every site whose
/// energy its arrival can change are refreshed; the two index sets are
/// disjoint, hence the two bookkeeping calls.
pub fn deposit(
    state: &mut SurfaceState,
    ctx: &SimulationContext,
    rng: &mut impl Rng,
) -> Result<usize, EngineError> {
    let vacant = state.vacant_sites();
    if vacant.is_empty() {
        return Err(EngineError::ExhaustedAttempts { attempts: 0 });
    }

    let weights: Vec<f64> = vacant.iter().map(|&site| ctx.landing[site]).collect();
    let dist = WeightedIndex::new(&weights).map_err(SamplingError::from)?;

    let shells = ctx.lattice.shells();
    let budget = state.site_count();
    for attempt in 0..budget {
        let candidate = vacant[dist.sample(rng)];
        let neighbors = ctx.lattice.neighbors(candidate);
        let exclusion = &neighbors[shells.exclusion_zone()];
        if exclusion.iter().any(|&n| state.is_occupied(n)) {
            continue;
        }

        state.occupy(candidate)?;
        let span = shells.exclusion.max(ctx.potential.support(shells));
        state.update_energy(&neighbors[..span], ctx.potential, ctx.lattice)?;
        state.update_energy(&[candidate], ctx.potential, ctx.lattice)?;
        trace!(site = candidate, attempt, "adatom deposited");
        return Ok(candidate);
    }

    Err(EngineError::ExhaustedAttempts { attempts: budget })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::potential::{BondCounting, Potential};
    use crate::core::temperature::Constant;
    use crate::engine::config::SimulationConfigBuilder;
    use crate::engine::progress::ProgressReporter;
    use crate::test_util::{ring_lattice, two_group_ring};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn test_config() -> crate::engine::config::SimulationConfig {
        SimulationConfigBuilder::new()
            .max_laps(1)
            .steps_per_lap(1)
            .moves_per_step(1)
            .target_coverage(1.0)
            .output_dir("out")
            .build()
            .unwrap()
    }

    #[test]
    fn deposit_adds_exactly_one_adatom_on_an_admissible_site() {
        let lattice = ring_lattice(30);
        let config = test_config();
        let potential = BondCounting::new(-0.3);
        let schedule = Constant::new(500.0);
        let reporter = ProgressReporter::new();
        let ctx = SimulationContext::new(&lattice, &config, &potential, &schedule, &reporter);
        let mut state = SurfaceState::new(30);
        let mut rng = StdRng::seed_from_u64(42);

        let before = state.adatom_count();
        let site = deposit(&mut state, &ctx, &mut rng).unwrap();
        assert_eq!(state.adatom_count(), before + 1);
        assert!(state.is_occupied(site));
        // the landing spot's exclusion zone was empty at placement and the
        // new adatom is not its own neighbor, so it still is
        let shells = lattice.shells();
        let exclusion = &lattice.neighbors(site)[shells.exclusion_zone()];
        assert!(exclusion.iter().all(|&n| !state.is_occupied(n)));
    }

    #[test]
    fn fully_occupied_lattice_reports_exhausted_attempts_without_mutation() {
        let lattice = ring_lattice(30);
        let config = test_config();
        let potential = BondCounting::new(-0.3);
        let schedule = Constant::new(500.0);
        let reporter = ProgressReporter::new();
        let ctx = SimulationContext::new(&lattice, &config, &potential, &schedule, &reporter);
        let mut state = SurfaceState::new(30);
        for site in 0..30 {
            state.occupy(site).unwrap();
        }
        let occ_before = state.occ().to_vec();
        let mut rng = StdRng::seed_from_u64(42);

        let result = deposit(&mut state, &ctx, &mut rng);
        assert!(matches!(
            result,
            Err(EngineError::ExhaustedAttempts { .. })
        ));
        assert_eq!(state.occ(), occ_before.as_slice());
    }

    #[test]
    fn crowded_surface_with_no_admissible_site_mutates_nothing() {
        let lattice = ring_lattice(30);
        let config = test_config();
        let potential = BondCounting::new(-0.3);
        let schedule = Constant::new(500.0);
        let reporter = ProgressReporter::new();
        let ctx = SimulationContext::new(&lattice, &config, &potential, &schedule, &reporter);
        // every other site occupied: each vacant site has an occupied
        // nearest neighbor inside its exclusion zone
        let mut state = SurfaceState::new(30);
        for site in (0..30).step_by(2) {
            state.occupy(site).unwrap();
        }
        let occ_before = state.occ().to_vec();
        let energy_before = state.energy();
        let mut rng = StdRng::seed_from_u64(7);

        let result = deposit(&mut state, &ctx, &mut rng);
        assert!(matches!(
            result,
            Err(EngineError::ExhaustedAttempts { attempts: 30 })
        ));
        assert_eq!(state.occ(), occ_before.as_slice());
        assert_eq!(state.energy(), energy_before);
    }

    #[test]
    fn zero_weight_groups_never_receive_adatoms() {
        let lattice = two_group_ring(30, 1.0, 0.0);
        let config = test_config();
        let potential = BondCounting::new(-0.3);
        let schedule = Constant::new(500.0);
        let reporter = ProgressReporter::new();
        let ctx = SimulationContext::new(&lattice, &config, &potential, &schedule, &reporter);
        let mut state = SurfaceState::new(30);
        let mut rng = StdRng::seed_from_u64(13);

        for _ in 0..3 {
            let site = deposit(&mut state, &ctx, &mut rng).unwrap();
            assert_eq!(site % 2, 0, "odd sites carry zero landing weight");
        }
    }

    #[test]
    fn deposition_keeps_stored_energies_consistent() {
        let lattice = ring_lattice(30);
        let config = test_config();
        let potential = BondCounting::new(-0.3);
        let schedule = Constant::new(500.0);
        let reporter = ProgressReporter::new();
        let ctx = SimulationContext::new(&lattice, &config, &potential, &schedule, &reporter);
        let mut state = SurfaceState::new(30);
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..4 {
            deposit(&mut state, &ctx, &mut rng).unwrap();
        }
        for site in 0..30 {
            let expected = if state.is_occupied(site) {
                potential.site_energy(site, state.occ(), &lattice)
            } else {
                0.0
            };
            assert_eq!(state.energies()[site], expected);
        }
        let total: f64 = state.energies().iter().sum();
        assert_eq!(state.energy(), total);
    }
}
