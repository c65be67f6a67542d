use crate::core::lattice::Lattice;
use crate::core::potential::Potential;

use super::error::EngineError;

/// Monotone observability counters; never read back into the algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub attempted_moves: u64,
    pub successful_moves: u64,
    pub not_moved_moves: u64,
    pub blocked_moves: u64,
    pub accepted_moves: u64,
    pub rejected_moves: u64,
    pub prepopulated_depositions: u64,
    pub accepted_depositions: u64,
    pub rejected_depositions: u64,
}

/// Occupancy and energy state of the surface.
///
/// Invariants, holding after every state-mutating call:
/// - at most one adatom per site;
/// - `energies[i] == 0` whenever site `i` is vacant, and equals the
///   potential evaluated under the current occupancy when occupied;
/// - the aggregate `energy` equals the sum of the energy vector.
///
/// The `previous_*` buffers hold a single-generation snapshot maintained by
/// [`Self::keep_modification`] and restored by [`Self::reverse_modification`],
/// letting a failed move roll the touched sites back.
#[derive(Debug, Clone)]
pub struct SurfaceState {
    occ: Vec<bool>,
    energies: Vec<f64>,
    energy: f64,
    previous_occ: Vec<bool>,
    previous_energies: Vec<f64>,
    previous_energy: f64,
    pub counters: Counters,
}

impl SurfaceState {
    pub fn new(site_count: usize) -> Self {
        Self {
            occ: vec![false; site_count],
            energies: vec![0.0; site_count],
            energy: 0.0,
            previous_occ: vec![false; site_count],
            previous_energies: vec![0.0; site_count],
            previous_energy: 0.0,
            counters: Counters::default(),
        }
    }

    pub fn site_count(&self) -> usize {
        self.occ.len()
    }

    pub fn occ(&self) -> &[bool] {
        &self.occ
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn is_occupied(&self, site: usize) -> bool {
        self.occ[site]
    }

    pub fn adatom_count(&self) -> usize {
        self.occ.iter().filter(|&&o| o).count()
    }

    pub fn coverage(&self) -> f64 {
        self.adatom_count() as f64 / self.occ.len() as f64
    }

    pub fn occupied_sites(&self) -> Vec<usize> {
        self.occ
            .iter()
            .enumerate()
            .filter_map(|(i, &o)| o.then_some(i))
            .collect()
    }

    pub fn vacant_sites(&self) -> Vec<usize> {
        self.occ
            .iter()
            .enumerate()
            .filter_map(|(i, &o)| (!o).then_some(i))
            .collect()
    }

    /// Places an adatom on `site`, failing loudly rather than overwriting an
    /// existing one.
    pub fn occupy(&mut self, site: usize) -> Result<(), EngineError> {
        self.check_index(site)?;
        if self.occ[site] {
            return Err(EngineError::InvariantViolation { site });
        }
        self.occ[site] = true;
        Ok(())
    }

    /// Removes the adatom on `site`; vacating an empty site is as much an
    /// invariant breach as double occupancy.
    pub fn vacate(&mut self, site: usize) -> Result<(), EngineError> {
        self.check_index(site)?;
        if !self.occ[site] {
            return Err(EngineError::InvariantViolation { site });
        }
        self.occ[site] = false;
        Ok(())
    }

    /// Recomputes the stored energy of each index from the current occupancy
    /// (zero when vacant), then refreshes the aggregate as a full reduction
    /// over the entire energy vector. Callers batch index sets to amortize
    /// the O(N) reduction.
    pub fn update_energy(
        &mut self,
        indices: &[usize],
        potential: &dyn Potential,
        lattice: &Lattice,
    ) -> Result<(), EngineError> {
        self.check_indices(indices)?;
        for &i in indices {
            self.energies[i] = if self.occ[i] {
                potential.site_energy(i, &self.occ, lattice)
            } else {
                0.0
            };
        }
        self.energy = self.energies.iter().sum();
        Ok(())
    }

    /// Commits the current occupancy/energy of `indices` (and the aggregate)
    /// into the snapshot buffers.
    pub fn keep_modification(&mut self, indices: &[usize]) -> Result<(), EngineError> {
        self.check_indices(indices)?;
        for &i in indices {
            self.previous_occ[i] = self.occ[i];
            self.previous_energies[i] = self.energies[i];
        }
        self.previous_energy = self.energy;
        Ok(())
    }

    /// Restores occupancy/energy of `indices` (and the aggregate) from the
    /// snapshot buffers.
    pub fn reverse_modification(&mut self, indices: &[usize]) -> Result<(), EngineError> {
        self.check_indices(indices)?;
        for &i in indices {
            self.occ[i] = self.previous_occ[i];
            self.energies[i] = self.previous_energies[i];
        }
        self.energy = self.previous_energy;
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), EngineError> {
        if index >= self.occ.len() {
            return Err(EngineError::IndexOutOfRange {
                index,
                len: self.occ.len(),
            });
        }
        Ok(())
    }

    fn check_indices(&self, indices: &[usize]) -> Result<(), EngineError> {
        for &i in indices {
            self.check_index(i)?;
        }
        Ok(())
    }
}
