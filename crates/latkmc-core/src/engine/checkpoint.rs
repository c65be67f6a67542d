use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::lattice::Lattice;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize the geometry artifact: {0}")]
    Geometry(#[from] toml::ser::Error),

    #[error("Failed to write an occupancy artifact: {0}")]
    Occupancy(#[from] csv::Error),
}

#[derive(Serialize)]
struct GeometryRecord<'a> {
    lattice_constant: f64,
    site_types: Vec<&'a str>,
    site_type_index: Vec<usize>,
    x: Vec<f64>,
    y: Vec<f64>,
}

/// Persists the run's durable artifacts: one geometry file written before
/// the lap loop begins and one occupancy snapshot per lap. Failures are
/// fatal and surface to the caller; there is no retry.
pub struct CheckpointWriter {
    dir: PathBuf,
}

impl CheckpointWriter {
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, CheckpointError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// Writes the static geometry once: coordinates, site-type names and
    /// membership, and the lattice constant.
    pub fn write_geometry(&self, lattice: &Lattice) -> Result<PathBuf, CheckpointError> {
        let sites = lattice.site_count();
        let record = GeometryRecord {
            lattice_constant: lattice.lattice_constant(),
            site_types: lattice.groups().iter().map(|g| g.name.as_str()).collect(),
            site_type_index: (0..sites).map(|s| lattice.group_index_of(s)).collect(),
            x: (0..sites).map(|s| lattice.coordinate(s).x).collect(),
            y: (0..sites).map(|s| lattice.coordinate(s).y).collect(),
        };
        let path = self.dir.join("init.toml");
        fs::write(&path, toml::to_string(&record)?)?;
        debug!(path = %path.display(), "geometry checkpoint written");
        Ok(path)
    }

    /// Writes the occupancy snapshot of one lap, named by the zero-padded
    /// lap index.
    pub fn write_occupancy(&self, lap: u64, occ: &[bool]) -> Result<PathBuf, CheckpointError> {
        let path = self.dir.join(format!("occ_{lap:010}.csv"));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["occupied"])?;
        for &occupied in occ {
            writer.write_record([if occupied { "1" } else { "0" }])?;
        }
        writer.flush()?;
        debug!(lap, path = %path.display(), "occupancy checkpoint written");
        Ok(path)
    }
}
