use rand::distributions::WeightedIndex;
use rand::prelude::*;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("Candidate list is empty, cannot select a hop destination")]
    EmptyCandidates,

    #[error("Candidate and occupancy mask lengths differ: {candidates} vs {mask}")]
    MaskLengthMismatch { candidates: usize, mask: usize },

    #[error("Invalid beta value: {0}. Beta must be positive for Boltzmann selection")]
    InvalidBeta(f64),

    #[error("All candidates carry zero Boltzmann weight, the distribution cannot be normalized")]
    ZeroTotalWeight,

    #[error("Failed to create weighted distribution: {source}")]
    Distribution {
        #[from]
        source: rand::distributions::WeightedError,
    },
}

/// Selects one index from `energies` with probability proportional to the
/// Boltzmann weight `exp(-E·β)`, with occupied candidates masked to exactly
/// zero weight.
///
/// Weights are shifted by the minimum unmasked energy before exponentiation
/// so that large `β·E` products cannot underflow the whole distribution to
/// zero; the shift cancels under normalization. A fully masked candidate set
/// is the one remaining way to end up with no probability mass, and it is
/// reported as [`SamplingError::ZeroTotalWeight`] instead of dividing by
/// zero.
#[instrument(level = "trace", skip_all, fields(beta))]
pub fn boltzmann_select(
    energies: &[f64],
    occupied: &[bool],
    beta: f64,
    rng: &mut impl Rng,
) -> Result<usize, SamplingError> {
    if energies.is_empty() {
        return Err(SamplingError::EmptyCandidates);
    }
    if energies.len() != occupied.len() {
        return Err(SamplingError::MaskLengthMismatch {
            candidates: energies.len(),
            mask: occupied.len(),
        });
    }
    if beta <= 0.0 {
        return Err(SamplingError::InvalidBeta(beta));
    }

    let min_energy = energies
        .iter()
        .zip(occupied)
        .filter(|&(_, &masked)| !masked)
        .map(|(&e, _)| e)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let Some(min_energy) = min_energy else {
        return Err(SamplingError::ZeroTotalWeight);
    };

    let weights: Vec<f64> = energies
        .iter()
        .zip(occupied)
        .map(|(&e, &masked)| {
            if masked {
                0.0
            } else {
                (-(e - min_energy) * beta).exp()
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if total <= f64::EPSILON {
        return Err(SamplingError::ZeroTotalWeight);
    }

    let dist = WeightedIndex::new(&weights)?;
    Ok(dist.sample(rng))
}
