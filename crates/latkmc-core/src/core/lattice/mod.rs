//! The lattice-provider contract.
//!
//! A [`Lattice`] carries everything the engine needs to know about the
//! geometry it simulates on: site coordinates, the per-site neighbor table
//! partitioned into shells by a [`ShellTopology`], the site-type groups with
//! their deposition weights, and the lattice constant. Construction validates
//! the full contract once; afterwards the lattice is read-only.

pub mod topology;

use nalgebra::Point2;
use thiserror::Error;

pub use topology::{ShellTopology, TopologyError};

#[derive(Debug, Error, PartialEq, Clone)]
pub enum LatticeError {
    #[error("Lattice must contain at least one site")]
    Empty,

    #[error("Coordinate count {coordinates} does not match the neighbor table ({sites} sites)")]
    CoordinateMismatch { coordinates: usize, sites: usize },

    #[error("Neighbor table length {len} is not a multiple of its width {width}")]
    RaggedNeighborTable { len: usize, width: usize },

    #[error("Neighbor table width {width} cannot carry shells up to offset {required}")]
    NarrowNeighborTable { width: usize, required: usize },

    #[error("Neighbor entry {neighbor} of site {site} is out of range for {sites} sites")]
    NeighborOutOfRange {
        site: usize,
        neighbor: usize,
        sites: usize,
    },

    #[error("Site {site} lists itself as a neighbor")]
    SelfNeighbor { site: usize },

    #[error("Site group '{group}' references site {site}, out of range for {sites} sites")]
    GroupSiteOutOfRange {
        group: String,
        site: usize,
        sites: usize,
    },

    #[error("Site {site} belongs to more than one site group")]
    OverlappingGroups { site: usize },

    #[error("Site {site} is not covered by any site group")]
    UncoveredSite { site: usize },

    #[error("Site group '{group}' has a negative deposition probability {probability}")]
    NegativeDepositionProbability { group: String, probability: f64 },

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// One site-type group: a named, disjoint subset of sites sharing a landing
/// weight and a color hint for external visualization.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteGroup {
    pub name: String,
    pub indices: Vec<usize>,
    pub color: String,
    pub deposition_probability: f64,
}

/// Read-only lattice geometry consumed by the engine.
#[derive(Debug, Clone)]
pub struct Lattice {
    coordinates: Vec<Point2<f64>>,
    neighbor_table: Vec<usize>,
    neighbor_width: usize,
    groups: Vec<SiteGroup>,
    group_of: Vec<usize>,
    lattice_constant: f64,
    shells: ShellTopology,
}

impl Lattice {
    pub fn new(
        coordinates: Vec<Point2<f64>>,
        neighbor_table: Vec<usize>,
        neighbor_width: usize,
        groups: Vec<SiteGroup>,
        lattice_constant: f64,
        shells: ShellTopology,
    ) -> Result<Self, LatticeError> {
        if neighbor_width == 0 || neighbor_table.len() % neighbor_width != 0 {
            return Err(LatticeError::RaggedNeighborTable {
                len: neighbor_table.len(),
                width: neighbor_width,
            });
        }
        let sites = neighbor_table.len() / neighbor_width;
        if sites == 0 {
            return Err(LatticeError::Empty);
        }
        if coordinates.len() != sites {
            return Err(LatticeError::CoordinateMismatch {
                coordinates: coordinates.len(),
                sites,
            });
        }
        if neighbor_width < shells.required_width() {
            return Err(LatticeError::NarrowNeighborTable {
                width: neighbor_width,
                required: shells.required_width(),
            });
        }

        for site in 0..sites {
            let row = &neighbor_table[site * neighbor_width..(site + 1) * neighbor_width];
            for &neighbor in row {
                if neighbor >= sites {
                    return Err(LatticeError::NeighborOutOfRange {
                        site,
                        neighbor,
                        sites,
                    });
                }
                if neighbor == site {
                    return Err(LatticeError::SelfNeighbor { site });
                }
            }
        }

        let mut group_of = vec![usize::MAX; sites];
        for (gi, group) in groups.iter().enumerate() {
            if group.deposition_probability < 0.0 {
                return Err(LatticeError::NegativeDepositionProbability {
                    group: group.name.clone(),
                    probability: group.deposition_probability,
                });
            }
            for &site in &group.indices {
                if site >= sites {
                    return Err(LatticeError::GroupSiteOutOfRange {
                        group: group.name.clone(),
                        site,
                        sites,
                    });
                }
                if group_of[site] != usize::MAX {
                    return Err(LatticeError::OverlappingGroups { site });
                }
                group_of[site] = gi;
            }
        }
        if let Some(site) = group_of.iter().position(|&g| g == usize::MAX) {
            return Err(LatticeError::UncoveredSite { site });
        }

        Ok(Self {
            coordinates,
            neighbor_table,
            neighbor_width,
            groups,
            group_of,
            lattice_constant,
            shells,
        })
    }

    pub fn site_count(&self) -> usize {
        self.group_of.len()
    }

    pub fn coordinate(&self, site: usize) -> Point2<f64> {
        self.coordinates[site]
    }

    /// Ordered neighbor list of `site`, shell-partitioned per [`Self::shells`].
    pub fn neighbors(&self, site: usize) -> &[usize] {
        &self.neighbor_table[site * self.neighbor_width..(site + 1) * self.neighbor_width]
    }

    pub fn shells(&self) -> &ShellTopology {
        &self.shells
    }

    pub fn groups(&self) -> &[SiteGroup] {
        &self.groups
    }

    pub fn group_index_of(&self, site: usize) -> usize {
        self.group_of[site]
    }

    pub fn lattice_constant(&self) -> f64 {
        self.lattice_constant
    }

    /// Per-site landing weight, taken from the owning group.
    pub fn landing_probabilities(&self) -> Vec<f64> {
        self.group_of
            .iter()
            .map(|&g| self.groups[g].deposition_probability)
            .collect()
    }
}
