use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// One-shot surface initialization applied before the lap loop.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Prepopulation {
    /// Start from a bare surface.
    #[default]
    None,
    /// Occupy a uniformly random fraction of all sites.
    RandomFraction { fraction: f64 },
    /// Occupy every site of one site-type group.
    Group { group: usize },
    /// Occupy two groups split by the x coordinate, leaving a vacant strip
    /// of width `gap` around x = 0: the left group below -gap/2, the right
    /// group above +gap/2.
    Split {
        left_group: usize,
        right_group: usize,
        gap: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub max_laps: u64,
    pub steps_per_lap: u64,
    pub moves_per_step: u64,
    pub target_coverage: f64,
    pub prepopulation: Prepopulation,
    pub output_dir: PathBuf,
}

#[derive(Default)]
pub struct SimulationConfigBuilder {
    max_laps: Option<u64>,
    steps_per_lap: Option<u64>,
    moves_per_step: Option<u64>,
    target_coverage: Option<f64>,
    prepopulation: Option<Prepopulation>,
    output_dir: Option<PathBuf>,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_laps(mut self, laps: u64) -> Self {
        self.max_laps = Some(laps);
        self
    }
    pub fn steps_per_lap(mut self, steps: u64) -> Self {
        self.steps_per_lap = Some(steps);
        self
    }
    pub fn moves_per_step(mut self, moves: u64) -> Self {
        self.moves_per_step = Some(moves);
        self
    }
    pub fn target_coverage(mut self, coverage: f64) -> Self {
        self.target_coverage = Some(coverage);
        self
    }
    pub fn prepopulation(mut self, prepopulation: Prepopulation) -> Self {
        self.prepopulation = Some(prepopulation);
        self
    }
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let max_laps = self
            .max_laps
            .ok_or(ConfigError::MissingParameter("max_laps"))?;
        if max_laps == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_laps",
                reason: "a run must contain at least one lap".into(),
            });
        }
        let target_coverage = self
            .target_coverage
            .ok_or(ConfigError::MissingParameter("target_coverage"))?;
        if !(0.0..=1.0).contains(&target_coverage) {
            return Err(ConfigError::InvalidParameter {
                name: "target_coverage",
                reason: format!("{target_coverage} is outside [0, 1]"),
            });
        }
        let prepopulation = self.prepopulation.unwrap_or_default();
        match prepopulation {
            Prepopulation::RandomFraction { fraction } if !(0.0..=1.0).contains(&fraction) => {
                return Err(ConfigError::InvalidParameter {
                    name: "prepopulation.fraction",
                    reason: format!("{fraction} is outside [0, 1]"),
                });
            }
            Prepopulation::Split { gap, .. } if gap < 0.0 => {
                return Err(ConfigError::InvalidParameter {
                    name: "prepopulation.gap",
                    reason: format!("gap {gap} must be nonnegative"),
                });
            }
            _ => {}
        }
        Ok(SimulationConfig {
            max_laps,
            steps_per_lap: self
                .steps_per_lap
                .ok_or(ConfigError::MissingParameter("steps_per_lap"))?,
            moves_per_step: self
                .moves_per_step
                .ok_or(ConfigError::MissingParameter("moves_per_step"))?,
            target_coverage,
            prepopulation,
            output_dir: self
                .output_dir
                .ok_or(ConfigError::MissingParameter("output_dir"))?,
        })
    }
}
