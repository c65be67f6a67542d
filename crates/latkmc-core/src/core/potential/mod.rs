//! Scalar potential models.
//!
//! A [`Potential`] maps one site and the occupancy of its neighborhood to an
//! energy contribution in eV. Models are pure and are evaluated once per
//! energy recomputation per site; the engine asks each model for its
//! [`Potential::support`] so it knows how far an occupancy change can
//! propagate through stored energies.

use crate::core::lattice::{Lattice, ShellTopology};

pub trait Potential {
    /// Energy contribution of `site` under the occupancy vector `occ`.
    fn site_energy(&self, site: usize, occ: &[bool], lattice: &Lattice) -> f64;

    /// Number of leading neighbor-table entries the energy of a site depends
    /// on. Mutating the occupancy of a site can only change the stored
    /// energy of sites whose first `support` neighbors include it.
    fn support(&self, shells: &ShellTopology) -> usize;
}

/// Bond-counting model: a fixed energy per occupied nearest neighbor.
/// Negative `bond_energy` makes adatom clustering favorable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondCounting {
    bond_energy: f64,
}

impl BondCounting {
    pub fn new(bond_energy: f64) -> Self {
        Self { bond_energy }
    }
}

impl Potential for BondCounting {
    fn site_energy(&self, site: usize, occ: &[bool], lattice: &Lattice) -> f64 {
        let shell = &lattice.neighbors(site)[lattice.shells().hop_shell()];
        let bonds = shell.iter().filter(|&&n| occ[n]).count();
        self.bond_energy * bonds as f64
    }

    fn support(&self, shells: &ShellTopology) -> usize {
        shells.hop
    }
}

/// Per-shell pair model: each of the first three shells contributes its own
/// coefficient per occupied neighbor, so interactions decay with distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellWeighted {
    weights: [f64; 3],
}

impl ShellWeighted {
    pub fn new(weights: [f64; 3]) -> Self {
        Self { weights }
    }
}

impl Potential for ShellWeighted {
    fn site_energy(&self, site: usize, occ: &[bool], lattice: &Lattice) -> f64 {
        let shells = lattice.shells();
        let neighbors = lattice.neighbors(site);
        let ranges = [
            shells.hop_shell(),
            shells.hop..shells.exclusion,
            shells.exclusion..shells.inner,
        ];
        ranges
            .into_iter()
            .zip(self.weights)
            .map(|(range, weight)| {
                let bonds = neighbors[range].iter().filter(|&&n| occ[n]).count();
                weight * bonds as f64
            })
            .sum()
    }

    fn support(&self, shells: &ShellTopology) -> usize {
        shells.inner
    }
}
