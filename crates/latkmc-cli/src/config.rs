use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use crate::hexgrid::HexPatch;
use latkmc::core::lattice::Lattice;
use latkmc::core::potential::{BondCounting, Potential, ShellWeighted};
use latkmc::core::temperature::{Constant, ExponentialCooling, LinearRamp, TemperatureSchedule};
use latkmc::engine::config::{Prepopulation, SimulationConfig, SimulationConfigBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

fn default_probability() -> f64 {
    1.0
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LatticeSection {
    pub rows: usize,
    pub cols: usize,
    pub lattice_constant: f64,
    #[serde(default = "default_probability")]
    pub fcc_probability: f64,
    #[serde(default = "default_probability")]
    pub hcp_probability: f64,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum PotentialSection {
    BondCounting { bond_energy: f64 },
    ShellWeighted { weights: [f64; 3] },
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum TemperatureSection {
    Constant { kelvin: f64 },
    LinearRamp { start: f64, end: f64 },
    ExponentialCooling { start: f64, rate: f64 },
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum PrepopulationSection {
    #[default]
    None,
    RandomFraction {
        fraction: f64,
    },
    Group {
        group: usize,
    },
    Split {
        left_group: usize,
        right_group: usize,
        gap: f64,
    },
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RunSection {
    pub max_laps: u64,
    pub steps_per_lap: u64,
    pub moves_per_step: u64,
    pub target_coverage: f64,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RunFile {
    pub output_dir: PathBuf,
    pub lattice: LatticeSection,
    pub potential: PotentialSection,
    pub temperature: TemperatureSection,
    pub run: RunSection,
    #[serde(default)]
    pub prepopulation: PrepopulationSection,
}

/// Everything the run command needs, resolved from the file model plus
/// command-line overrides.
pub struct RunSetup {
    pub lattice: Lattice,
    pub config: SimulationConfig,
    pub potential: Box<dyn Potential>,
    pub schedule: Box<dyn TemperatureSchedule>,
    pub seed: Option<u64>,
}

impl RunFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file: RunFile = toml::from_str(&contents).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        debug!(path = %path.display(), "run configuration loaded");
        Ok(file)
    }

    pub fn into_setup(self, args: &RunArgs) -> Result<RunSetup> {
        let kelvin_is_positive = |kelvin: f64, name: &str| {
            if kelvin <= 0.0 {
                return Err(CliError::Config(format!(
                    "{name} temperature must be positive, got {kelvin}"
                )));
            }
            Ok(())
        };

        let max_laps = args.laps.unwrap_or(self.run.max_laps);
        let output_dir = args.output.clone().unwrap_or(self.output_dir);
        let seed = args.seed.or(self.run.seed);

        let lattice = HexPatch {
            rows: self.lattice.rows,
            cols: self.lattice.cols,
            lattice_constant: self.lattice.lattice_constant,
            fcc_probability: self.lattice.fcc_probability,
            hcp_probability: self.lattice.hcp_probability,
        }
        .build()?;

        let potential: Box<dyn Potential> = match self.potential {
            PotentialSection::BondCounting { bond_energy } => {
                Box::new(BondCounting::new(bond_energy))
            }
            PotentialSection::ShellWeighted { weights } => Box::new(ShellWeighted::new(weights)),
        };

        let schedule: Box<dyn TemperatureSchedule> = match self.temperature {
            TemperatureSection::Constant { kelvin } => {
                kelvin_is_positive(kelvin, "constant")?;
                Box::new(Constant::new(kelvin))
            }
            TemperatureSection::LinearRamp { start, end } => {
                kelvin_is_positive(start, "ramp start")?;
                kelvin_is_positive(end, "ramp end")?;
                Box::new(LinearRamp::new(start, end, max_laps))
            }
            TemperatureSection::ExponentialCooling { start, rate } => {
                kelvin_is_positive(start, "cooling start")?;
                Box::new(ExponentialCooling::new(start, rate))
            }
        };

        let prepopulation = match self.prepopulation {
            PrepopulationSection::None => Prepopulation::None,
            PrepopulationSection::RandomFraction { fraction } => {
                Prepopulation::RandomFraction { fraction }
            }
            PrepopulationSection::Group { group } => Prepopulation::Group { group },
            PrepopulationSection::Split {
                left_group,
                right_group,
                gap,
            } => Prepopulation::Split {
                left_group,
                right_group,
                gap,
            },
        };

        let config = SimulationConfigBuilder::new()
            .max_laps(max_laps)
            .steps_per_lap(self.run.steps_per_lap)
            .moves_per_step(self.run.moves_per_step)
            .target_coverage(self.run.target_coverage)
            .prepopulation(prepopulation)
            .output_dir(output_dir)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(RunSetup {
            lattice,
            config,
            potential,
            schedule,
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        output-dir = "out/run1"

        [lattice]
        rows = 5
        cols = 10
        lattice-constant = 1.0
        hcp-probability = 0.5

        [potential]
        kind = "bond-counting"
        bond-energy = -0.25

        [temperature]
        kind = "constant"
        kelvin = 450.0

        [run]
        max-laps = 20
        steps-per-lap = 50
        moves-per-step = 5
        target-coverage = 0.3
        seed = 42

        [prepopulation]
        kind = "random-fraction"
        fraction = 0.05
    "#;

    fn no_overrides() -> RunArgs {
        RunArgs {
            config: PathBuf::from("unused.toml"),
            output: None,
            seed: None,
            laps: None,
        }
    }

    #[test]
    fn sample_file_parses_and_resolves() {
        let file: RunFile = toml::from_str(SAMPLE).unwrap();
        assert_eq!(file.run.max_laps, 20);
        assert_eq!(file.lattice.fcc_probability, 1.0);
        assert_eq!(file.lattice.hcp_probability, 0.5);

        let setup = file.into_setup(&no_overrides()).unwrap();
        assert_eq!(setup.lattice.site_count(), 100);
        assert_eq!(setup.config.max_laps, 20);
        assert_eq!(setup.config.output_dir, PathBuf::from("out/run1"));
        assert_eq!(setup.seed, Some(42));
        assert_eq!(
            setup.config.prepopulation,
            Prepopulation::RandomFraction { fraction: 0.05 }
        );
    }

    #[test]
    fn command_line_overrides_win_over_the_file() {
        let file: RunFile = toml::from_str(SAMPLE).unwrap();
        let args = RunArgs {
            config: PathBuf::from("unused.toml"),
            output: Some(PathBuf::from("elsewhere")),
            seed: Some(7),
            laps: Some(3),
        };
        let setup = file.into_setup(&args).unwrap();
        assert_eq!(setup.config.max_laps, 3);
        assert_eq!(setup.config.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(setup.seed, Some(7));
    }

    #[test]
    fn missing_prepopulation_defaults_to_none() {
        let trimmed = SAMPLE.split("[prepopulation]").next().unwrap();
        let file: RunFile = toml::from_str(trimmed).unwrap();
        let setup = file.into_setup(&no_overrides()).unwrap();
        assert_eq!(setup.config.prepopulation, Prepopulation::None);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let tainted = format!("{SAMPLE}\n[extra]\nfoo = 1\n");
        assert!(toml::from_str::<RunFile>(&tainted).is_err());
    }

    #[test]
    fn non_positive_temperature_is_a_config_error() {
        let frozen = SAMPLE.replace("kelvin = 450.0", "kelvin = 0.0");
        let file: RunFile = toml::from_str(&frozen).unwrap();
        assert!(matches!(
            file.into_setup(&no_overrides()),
            Err(CliError::Config(_))
        ));
    }
}
