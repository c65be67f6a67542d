use crate::error::{CliError, Result};
use latkmc::core::lattice::{Lattice, ShellTopology, SiteGroup};
use nalgebra::{Point2, Vector2};
use std::cmp::Ordering;
use tracing::debug;

pub const NEIGHBOR_WIDTH: usize = 24;

const SQRT3: f64 = 1.732_050_807_568_877_2;

/// Periodic patch of hexagonal adsorption sites: two interleaved triangular
/// sublattices (the threefold "fcc" and "hcp" hollows of a close-packed
/// surface), wrapped on a torus so every site carries a full
/// distance-ordered neighbor list. The engine itself never constructs
/// geometry; this generator plays the lattice-provider role for the CLI.
#[derive(Debug, Clone, Copy)]
pub struct HexPatch {
    pub rows: usize,
    pub cols: usize,
    pub lattice_constant: f64,
    pub fcc_probability: f64,
    pub hcp_probability: f64,
}

impl HexPatch {
    pub fn build(&self) -> Result<Lattice> {
        let cells = self.rows * self.cols;
        let site_count = cells * 2;
        if site_count <= NEIGHBOR_WIDTH {
            return Err(CliError::Argument(format!(
                "a {}x{} patch has only {} sites, {} neighbors per site are required",
                self.rows,
                self.cols,
                site_count,
                NEIGHBOR_WIDTH
            )));
        }

        let a = self.lattice_constant;
        let a1 = Vector2::new(a, 0.0);
        let a2 = Vector2::new(a * 0.5, a * SQRT3 * 0.5);
        let basis = Vector2::new(a * 0.5, a / (2.0 * SQRT3));

        // fcc sublattice first, then hcp, each in row-major cell order
        let mut coordinates = Vec::with_capacity(site_count);
        for sublattice in [Vector2::zeros(), basis] {
            for r in 0..self.rows {
                for c in 0..self.cols {
                    let p = a1 * c as f64 + a2 * r as f64 + sublattice;
                    coordinates.push(Point2::from(p));
                }
            }
        }
        // center the patch so split prepopulation thresholds at x = 0
        let centroid = coordinates
            .iter()
            .fold(Vector2::zeros(), |acc, p| acc + p.coords)
            / site_count as f64;
        for p in &mut coordinates {
            p.coords -= centroid;
        }

        let period_1 = a1 * self.cols as f64;
        let period_2 = a2 * self.rows as f64;
        let mut table = Vec::with_capacity(site_count * NEIGHBOR_WIDTH);
        for i in 0..site_count {
            let mut by_distance: Vec<(f64, usize)> = (0..site_count)
                .filter(|&j| j != i)
                .map(|j| {
                    (
                        torus_distance(coordinates[i], coordinates[j], period_1, period_2),
                        j,
                    )
                })
                .collect();
            by_distance.sort_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or(Ordering::Equal)
                    .then(a.1.cmp(&b.1))
            });
            table.extend(by_distance.iter().take(NEIGHBOR_WIDTH).map(|&(_, j)| j));
        }

        let groups = vec![
            SiteGroup {
                name: "fcc".into(),
                indices: (0..cells).collect(),
                color: "#1f77b4".into(),
                deposition_probability: self.fcc_probability,
            },
            SiteGroup {
                name: "hcp".into(),
                indices: (cells..site_count).collect(),
                color: "#ff7f0e".into(),
                deposition_probability: self.hcp_probability,
            },
        ];

        debug!(
            rows = self.rows,
            cols = self.cols,
            sites = site_count,
            "hexagonal patch generated"
        );
        let lattice = Lattice::new(
            coordinates,
            table,
            NEIGHBOR_WIDTH,
            groups,
            a,
            ShellTopology::default(),
        )?;
        Ok(lattice)
    }
}

/// Minimum-image distance on the torus spanned by the two period vectors.
fn torus_distance(
    p: Point2<f64>,
    q: Point2<f64>,
    period_1: Vector2<f64>,
    period_2: Vector2<f64>,
) -> f64 {
    let mut best = f64::INFINITY;
    for di in -1..=1 {
        for dj in -1..=1 {
            let d = q - p + period_1 * di as f64 + period_2 * dj as f64;
            best = best.min(d.norm());
        }
    }
    best
}
