use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TopologyError {
    #[error(
        "Shell boundaries must be strictly ascending and nonzero, got {hop}, {exclusion}, {inner}, {encasing}"
    )]
    NotAscending {
        hop: usize,
        exclusion: usize,
        inner: usize,
        encasing: usize,
    },
}

/// Boundaries partitioning a site's ordered neighbor list into concentric
/// shells. Each boundary is a cumulative offset into the neighbor table:
/// the first `hop` entries are the hop-candidate shell, the first
/// `exclusion` entries the deposition exclusion zone, the first `inner`
/// entries the inner surroundings, and `inner..encasing` the encasing ring
/// used by the blocked-move check.
///
/// The boundaries are lattice-geometry-specific and are supplied verbatim by
/// the lattice provider; the engine treats them as configuration constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellTopology {
    pub hop: usize,
    pub exclusion: usize,
    pub inner: usize,
    pub encasing: usize,
}

impl Default for ShellTopology {
    /// Boundaries of the hexagonal adsorption-site geometry: 3 hop
    /// candidates, 9 exclusion-zone entries, 18 inner surroundings, and a
    /// 6-entry encasing ring.
    fn default() -> Self {
        Self {
            hop: 3,
            exclusion: 9,
            inner: 18,
            encasing: 24,
        }
    }
}

impl ShellTopology {
    pub fn new(
        hop: usize,
        exclusion: usize,
        inner: usize,
        encasing: usize,
    ) -> Result<Self, TopologyError> {
        if hop == 0 || hop >= exclusion || exclusion >= inner || inner >= encasing {
            return Err(TopologyError::NotAscending {
                hop,
                exclusion,
                inner,
                encasing,
            });
        }
        Ok(Self {
            hop,
            exclusion,
            inner,
            encasing,
        })
    }

    /// Entries considered as hop destinations during diffusion.
    pub fn hop_shell(&self) -> Range<usize> {
        0..self.hop
    }

    /// Entries that must be vacant before a deposition is accepted.
    pub fn exclusion_zone(&self) -> Range<usize> {
        0..self.exclusion
    }

    /// Entries inspected for vacancies by the blocked-move check.
    pub fn inner_surroundings(&self) -> Range<usize> {
        0..self.inner
    }

    /// Entries that bury an adatom when fully occupied.
    pub fn encasing_ring(&self) -> Range<usize> {
        self.inner..self.encasing
    }

    /// Minimum neighbor-table width able to carry these shells.
    pub fn required_width(&self) -> usize {
        self.encasing
    }
}
