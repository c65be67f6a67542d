//! Shared fixtures for unit tests: small periodic ring lattices whose
//! neighbor tables are built from signed index offsets, giving every site a
//! full 24-entry, shell-partitioned neighbor list with controllable
//! occupancy patterns.

use crate::core::lattice::{Lattice, ShellTopology, SiteGroup};
use nalgebra::Point2;
use std::f64::consts::TAU;

/// Offsets ordered by magnitude so that "shells" grow outward along the
/// ring: entries 0..3 are the hop candidates, 0..9 the exclusion zone,
/// 0..18 the inner surroundings, 18..24 the encasing ring.
pub(crate) const RING_OFFSETS: [isize; 24] = [
    1, -1, 2, -2, 3, -3, 4, -4, 5, -5, 6, -6, 7, -7, 8, -8, 9, -9, 10, -10, 11, -11, 12, -12,
];

pub(crate) fn ring_table(n: usize) -> Vec<usize> {
    assert!(n >= 25, "ring lattice needs at least 25 sites");
    let mut table = Vec::with_capacity(n * RING_OFFSETS.len());
    for site in 0..n {
        for off in RING_OFFSETS {
            table.push((site as isize + off).rem_euclid(n as isize) as usize);
        }
    }
    table
}

fn ring_coordinates(n: usize) -> Vec<Point2<f64>> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64 * TAU;
            Point2::new(t.cos(), t.sin())
        })
        .collect()
}

/// A single-group periodic ring of `n` sites with uniform landing weights.
pub(crate) fn ring_lattice(n: usize) -> Lattice {
    let groups = vec![SiteGroup {
        name: "terrace".into(),
        indices: (0..n).collect(),
        color: "#1f77b4".into(),
        deposition_probability: 1.0,
    }];
    Lattice::new(
        ring_coordinates(n),
        ring_table(n),
        RING_OFFSETS.len(),
        groups,
        1.0,
        ShellTopology::default(),
    )
    .expect("ring lattice fixture must be valid")
}

/// Ring split into alternating even/odd groups with distinct landing weights.
pub(crate) fn two_group_ring(n: usize, even_prob: f64, odd_prob: f64) -> Lattice {
    let groups = vec![
        SiteGroup {
            name: "fcc".into(),
            indices: (0..n).filter(|i| i % 2 == 0).collect(),
            color: "#1f77b4".into(),
            deposition_probability: even_prob,
        },
        SiteGroup {
            name: "hcp".into(),
            indices: (0..n).filter(|i| i % 2 == 1).collect(),
            color: "#ff7f0e".into(),
            deposition_probability: odd_prob,
        },
    ];
    Lattice::new(
        ring_coordinates(n),
        ring_table(n),
        RING_OFFSETS.len(),
        groups,
        1.0,
        ShellTopology::default(),
    )
    .expect("two-group ring fixture must be valid")
}
