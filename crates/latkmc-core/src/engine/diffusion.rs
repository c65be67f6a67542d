use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{trace, warn};

use super::context::SimulationContext;
use super::error::EngineError;
use super::sampling::{self, SamplingError};
use super::state::SurfaceState;

/// What a single diffusion attempt did to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopOutcome {
    /// The adatom relocated to a first-shell neighbor.
    Moved { from: usize, to: usize },
    /// "Stay put" won the weighted choice; occupancy is unchanged.
    Stayed { site: usize },
    /// The adatom is buried under a fully occupied encasing ring and was
    /// not considered for movement.
    Blocked { site: usize },
    /// Candidate weights vanished; the step was rolled back.
    Rejected { site: usize },
}

/// Performs one diffusion attempt: picks a random adatom and lets it choose
/// between staying put and hopping to one of its first-shell neighbors, with
/// probabilities proportional to the Boltzmann weights of the candidate
/// sites' energies.
///
/// This is a local, multi-way weighted choice, not Metropolis
/// accept/reject on a proposed global energy change: "no move" is simply one
/// of the weighted outcomes. Occupied candidates carry exactly zero weight,
/// so a hop can never land on another adatom.
pub fn hop(
    state: &mut SurfaceState,
    ctx: &SimulationContext,
    beta: f64,
    rng: &mut impl Rng,
) -> Result<HopOutcome, EngineError> {
    state.counters.attempted_moves += 1;

    let occupied = state.occupied_sites();
    let Some(&origin) = occupied.choose(rng) else {
        return Err(EngineError::NoAdatoms);
    };

    let shells = ctx.lattice.shells();
    let neighbors = ctx.lattice.neighbors(origin);

    // buried adatom: encasing ring full, inner surroundings empty
    let encasing = &neighbors[shells.encasing_ring()];
    let inner = &neighbors[shells.inner_surroundings()];
    if encasing.iter().all(|&n| state.is_occupied(n))
        && !inner.iter().any(|&n| state.is_occupied(n))
        && state.is_occupied(origin)
    {
        state.counters.blocked_moves += 1;
        trace!(site = origin, "adatom is encased, move blocked");
        return Ok(HopOutcome::Blocked { site: origin });
    }

    let mut candidates = Vec::with_capacity(shells.hop + 1);
    candidates.push(origin);
    candidates.extend_from_slice(&neighbors[shells.hop_shell()]);

    // snapshot the candidate sites so a failed selection can be undone
    state.keep_modification(&candidates)?;
    state.vacate(origin)?;

    let occupied_mask: Vec<bool> = candidates.iter().map(|&c| state.is_occupied(c)).collect();
    let hop_energies: Vec<f64> = candidates
        .iter()
        .zip(&occupied_mask)
        .map(|(&c, &masked)| {
            if masked {
                0.0
            } else {
                ctx.potential.site_energy(c, state.occ(), ctx.lattice)
            }
        })
        .collect();

    let destination = match sampling::boltzmann_select(&hop_energies, &occupied_mask, beta, rng) {
        Ok(choice) => candidates[choice],
        Err(SamplingError::ZeroTotalWeight) => {
            state.reverse_modification(&candidates)?;
            state.counters.rejected_moves += 1;
            warn!(site = origin, "hop weights vanished, step rolled back");
            return Ok(HopOutcome::Rejected { site: origin });
        }
        Err(e) => return Err(e.into()),
    };

    if destination == origin {
        state.counters.not_moved_moves += 1;
    } else {
        state.counters.successful_moves += 1;
    }
    state.occupy(destination)?;

    // refresh every site whose stored energy the relocation can change:
    // the candidates plus the support neighborhoods of both endpoints
    let support = ctx.potential.support(shells);
    let mut touched = candidates;
    touched.extend_from_slice(&ctx.lattice.neighbors(origin)[..support]);
    touched.extend_from_slice(&ctx.lattice.neighbors(destination)[..support]);
    touched.sort_unstable();
    touched.dedup();
    state.update_energy(&touched, ctx.potential, ctx.lattice)?;
    state.keep_modification(&touched)?;
    state.counters.accepted_moves += 1;

    if destination == origin {
        trace!(site = origin, "adatom stayed put");
        Ok(HopOutcome::Stayed { site: origin })
    } else {
        trace!(from = origin, to = destination, "adatom hopped");
        Ok(HopOutcome::Moved {
            from: origin,
            to: destination,
        })
    }
}
