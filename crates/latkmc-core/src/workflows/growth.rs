use rand::Rng;
use std::sync::mpsc::{SyncSender, TrySendError};
use tracing::{debug, info, instrument, warn};

use crate::core::lattice::Lattice;
use crate::core::potential::Potential;
use crate::core::temperature::{TemperatureSchedule, inverse_kt};
use crate::engine::checkpoint::CheckpointWriter;
use crate::engine::config::{Prepopulation, SimulationConfig};
use crate::engine::context::SimulationContext;
use crate::engine::deposition;
use crate::engine::diffusion;
use crate::engine::error::EngineError;
use crate::engine::progress::{LapStats, Progress, ProgressReporter, RenderEvent};
use crate::engine::state::{Counters, SurfaceState};

/// Aggregate statistics of a finished growth run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthReport {
    pub laps: u64,
    pub total_steps: u64,
    pub final_energy: f64,
    pub final_temperature: f64,
    pub final_coverage: f64,
    pub adatoms: usize,
    pub counters: Counters,
}

/// Runs a complete growth simulation: prepopulates the surface, writes the
/// geometry artifact, then iterates laps. Each lap re-evaluates the
/// temperature schedule, executes `steps_per_lap` steps (at most one
/// deposition attempt while coverage is below target, then
/// `moves_per_step × current adatom count` diffusion attempts, the budget
/// recomputed from the live occupancy every step), writes one occupancy
/// checkpoint, and posts the lap index to the optional render queue. A
/// `Shutdown` sentinel follows the final lap.
///
/// All state mutation is single-threaded; the render hand-off is the only
/// concurrency boundary and is fire-and-forget. Randomness comes exclusively
/// from the caller-provided generator, so a seeded generator makes the run
/// reproducible.
#[instrument(skip_all, name = "growth_workflow")]
pub fn run(
    lattice: &Lattice,
    config: &SimulationConfig,
    potential: &dyn Potential,
    schedule: &dyn TemperatureSchedule,
    reporter: &ProgressReporter,
    render_queue: Option<&SyncSender<RenderEvent>>,
    rng: &mut impl Rng,
) -> Result<GrowthReport, EngineError> {
    let ctx = SimulationContext::new(lattice, config, potential, schedule, reporter);
    let mut state = SurfaceState::new(lattice.site_count());

    let writer = CheckpointWriter::create(&config.output_dir)?;
    writer.write_geometry(lattice)?;

    prepopulate(&mut state, &ctx, rng)?;
    info!(
        sites = lattice.site_count(),
        adatoms = state.adatom_count(),
        laps = config.max_laps,
        "growth run starting"
    );
    reporter.report(Progress::RunStart {
        total_laps: config.max_laps,
    });

    let mut total_steps: u64 = 0;
    let mut temperature = schedule.temperature(0);
    for lap in 0..config.max_laps {
        temperature = schedule.temperature(lap);
        let beta = inverse_kt(temperature);
        run_lap(&mut state, &ctx, beta, &mut total_steps, rng)?;
        writer.write_occupancy(lap, state.occ())?;
        post_render(render_queue, RenderEvent::Lap(lap));
        reporter.report(Progress::LapFinish {
            stats: lap_stats(&state, lap, temperature, total_steps),
        });
    }

    if let Some(queue) = render_queue {
        // the sentinel must arrive, unlike the per-lap frames
        if queue.send(RenderEvent::Shutdown).is_err() {
            debug!("render worker already gone at shutdown");
        }
    }
    reporter.report(Progress::RunFinish);

    let report = GrowthReport {
        laps: config.max_laps,
        total_steps,
        final_energy: state.energy(),
        final_temperature: temperature,
        final_coverage: state.coverage(),
        adatoms: state.adatom_count(),
        counters: state.counters,
    };
    info!(
        laps = report.laps,
        coverage = report.final_coverage,
        energy = report.final_energy,
        "growth run finished"
    );
    Ok(report)
}

fn run_lap(
    state: &mut SurfaceState,
    ctx: &SimulationContext,
    beta: f64,
    total_steps: &mut u64,
    rng: &mut impl Rng,
) -> Result<(), EngineError> {
    for _ in 0..ctx.config.steps_per_lap {
        if state.coverage() < ctx.config.target_coverage {
            match deposition::deposit(state, ctx, rng) {
                Ok(_) => state.counters.accepted_depositions += 1,
                Err(EngineError::ExhaustedAttempts { attempts }) => {
                    state.counters.rejected_depositions += 1;
                    warn!(attempts, "deposition skipped, no admissible vacant site");
                }
                Err(e) => return Err(e),
            }
        }
        let budget = ctx.config.moves_per_step * state.adatom_count() as u64;
        for _ in 0..budget {
            diffusion::hop(state, ctx, beta, rng)?;
        }
        *total_steps += 1;
    }
    Ok(())
}

fn prepopulate(
    state: &mut SurfaceState,
    ctx: &SimulationContext,
    rng: &mut impl Rng,
) -> Result<(), EngineError> {
    let lattice = ctx.lattice;
    let chosen: Vec<usize> = match ctx.config.prepopulation {
        Prepopulation::None => return Ok(()),
        Prepopulation::RandomFraction { fraction } => {
            let count = (fraction * lattice.site_count() as f64) as usize;
            rand::seq::index::sample(rng, lattice.site_count(), count).into_vec()
        }
        Prepopulation::Group { group } => group_indices(lattice, group)?.to_vec(),
        Prepopulation::Split {
            left_group,
            right_group,
            gap,
        } => {
            let left = group_indices(lattice, left_group)?;
            let right = group_indices(lattice, right_group)?;
            left.iter()
                .copied()
                .filter(|&s| lattice.coordinate(s).x < -gap / 2.0)
                .chain(
                    right
                        .iter()
                        .copied()
                        .filter(|&s| lattice.coordinate(s).x > gap / 2.0),
                )
                .collect()
        }
    };

    info!(
        adatoms = chosen.len(),
        sites = lattice.site_count(),
        "prepopulating surface"
    );
    for &site in &chosen {
        state.occupy(site)?;
    }
    state.counters.prepopulated_depositions = chosen.len() as u64;

    let all: Vec<usize> = (0..lattice.site_count()).collect();
    state.update_energy(&all, ctx.potential, lattice)?;
    state.keep_modification(&all)?;
    Ok(())
}

fn group_indices(lattice: &Lattice, group: usize) -> Result<&[usize], EngineError> {
    lattice
        .groups()
        .get(group)
        .map(|g| g.indices.as_slice())
        .ok_or(EngineError::IndexOutOfRange {
            index: group,
            len: lattice.groups().len(),
        })
}

fn post_render(queue: Option<&SyncSender<RenderEvent>>, event: RenderEvent) {
    let Some(queue) = queue else { return };
    match queue.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(event)) => debug!(?event, "render queue full, frame dropped"),
        Err(TrySendError::Disconnected(event)) => {
            debug!(?event, "render worker gone, hand-off disabled")
        }
    }
}

fn lap_stats(state: &SurfaceState, lap: u64, temperature: f64, total_steps: u64) -> LapStats {
    LapStats {
        lap,
        energy: state.energy(),
        temperature,
        coverage: state.coverage(),
        adatoms: state.adatom_count(),
        total_steps,
        counters: state.counters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::potential::BondCounting;
    use crate::core::temperature::Constant;
    use crate::engine::config::SimulationConfigBuilder;
    use crate::test_util::{ring_lattice, two_group_ring};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::mpsc;

    #[test]
    fn run_respects_the_coverage_target_and_checkpoints_every_lap() {
        let tmp = tempfile::tempdir().unwrap();
        let n = 30;
        let lattice = ring_lattice(n);
        let config = SimulationConfigBuilder::new()
            .max_laps(3)
            .steps_per_lap(10)
            .moves_per_step(2)
            .target_coverage(0.2)
            .output_dir(tmp.path())
            .build()
            .unwrap();
        let potential = BondCounting::new(-0.3);
        let schedule = Constant::new(600.0);
        let reporter = ProgressReporter::new();
        let mut rng = StdRng::seed_from_u64(42);

        let report = run(
            &lattice,
            &config,
            &potential,
            &schedule,
            &reporter,
            None,
            &mut rng,
        )
        .unwrap();

        assert_eq!(report.laps, 3);
        assert_eq!(report.total_steps, 30);
        assert!(report.final_coverage <= 0.2 + 1.0 / n as f64);
        assert_eq!(
            report.adatoms as u64,
            report.counters.accepted_depositions
        );
        assert_eq!(report.final_temperature, 600.0);

        assert!(tmp.path().join("init.toml").is_file());
        for lap in 0..3u64 {
            assert!(tmp.path().join(format!("occ_{lap:010}.csv")).is_file());
        }
        assert!(!tmp.path().join("occ_0000000003.csv").exists());
    }

    #[test]
    fn deposition_stops_once_the_target_is_reached() {
        let tmp = tempfile::tempdir().unwrap();
        let n = 30;
        let lattice = ring_lattice(n);
        let config = SimulationConfigBuilder::new()
            .max_laps(5)
            .steps_per_lap(20)
            .moves_per_step(0)
            .target_coverage(0.1)
            .output_dir(tmp.path())
            .build()
            .unwrap();
        let potential = BondCounting::new(-0.3);
        let schedule = Constant::new(600.0);
        let reporter = ProgressReporter::new();
        let mut rng = StdRng::seed_from_u64(7);

        let report = run(
            &lattice,
            &config,
            &potential,
            &schedule,
            &reporter,
            None,
            &mut rng,
        )
        .unwrap();

        // 0.1 × 30 = 3 adatoms reach the target; later steps must not deposit
        assert_eq!(report.adatoms, 3);
        assert_eq!(report.counters.accepted_depositions, 3);
        assert_eq!(report.counters.rejected_depositions, 0);
    }

    #[test]
    fn random_fraction_prepopulation_commits_a_consistent_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let n = 30;
        let lattice = ring_lattice(n);
        let config = SimulationConfigBuilder::new()
            .max_laps(1)
            .steps_per_lap(0)
            .moves_per_step(0)
            .target_coverage(0.0)
            .prepopulation(Prepopulation::RandomFraction { fraction: 0.5 })
            .output_dir(tmp.path())
            .build()
            .unwrap();
        let potential = BondCounting::new(-0.3);
        let schedule = Constant::new(600.0);
        let reporter = ProgressReporter::new();
        let mut rng = StdRng::seed_from_u64(3);

        let report = run(
            &lattice,
            &config,
            &potential,
            &schedule,
            &reporter,
            None,
            &mut rng,
        )
        .unwrap();

        assert_eq!(report.adatoms, 15);
        assert_eq!(report.counters.prepopulated_depositions, 15);
        assert_eq!(report.counters.accepted_depositions, 0);
    }

    #[test]
    fn group_prepopulation_fills_exactly_one_group() {
        let tmp = tempfile::tempdir().unwrap();
        let lattice = two_group_ring(30, 1.0, 1.0);
        let config = SimulationConfigBuilder::new()
            .max_laps(1)
            .steps_per_lap(0)
            .moves_per_step(0)
            .target_coverage(0.0)
            .prepopulation(Prepopulation::Group { group: 1 })
            .output_dir(tmp.path())
            .build()
            .unwrap();
        let potential = BondCounting::new(-0.3);
        let schedule = Constant::new(600.0);
        let reporter = ProgressReporter::new();
        let mut rng = StdRng::seed_from_u64(3);

        let report = run(
            &lattice,
            &config,
            &potential,
            &schedule,
            &reporter,
            None,
            &mut rng,
        )
        .unwrap();

        // the odd-site group of a 30-ring has 15 members
        assert_eq!(report.adatoms, 15);
        assert_eq!(report.counters.prepopulated_depositions, 15);
    }

    #[test]
    fn split_prepopulation_leaves_the_gap_vacant() {
        let tmp = tempfile::tempdir().unwrap();
        let lattice = two_group_ring(30, 1.0, 1.0);
        let gap = 0.5;
        let config = SimulationConfigBuilder::new()
            .max_laps(1)
            .steps_per_lap(0)
            .moves_per_step(0)
            .target_coverage(0.0)
            .prepopulation(Prepopulation::Split {
                left_group: 0,
                right_group: 1,
                gap,
            })
            .output_dir(tmp.path())
            .build()
            .unwrap();
        let potential = BondCounting::new(-0.3);
        let schedule = Constant::new(600.0);
        let reporter = ProgressReporter::new();
        let mut rng = StdRng::seed_from_u64(3);

        run(
            &lattice,
            &config,
            &potential,
            &schedule,
            &reporter,
            None,
            &mut rng,
        )
        .unwrap();

        // recompute the expected membership from the coordinates
        let expected: Vec<usize> = (0..30)
            .filter(|&s| {
                let x = lattice.coordinate(s).x;
                (lattice.group_index_of(s) == 0 && x < -gap / 2.0)
                    || (lattice.group_index_of(s) == 1 && x > gap / 2.0)
            })
            .collect();
        assert!(!expected.is_empty());

        // the report does not expose per-site occupancy; the lap-0
        // checkpoint does
        let contents =
            std::fs::read_to_string(tmp.path().join("occ_0000000000.csv")).unwrap();
        let occupied: Vec<usize> = contents
            .lines()
            .skip(1)
            .enumerate()
            .filter_map(|(i, v)| (v == "1").then_some(i))
            .collect();
        assert_eq!(occupied, expected);
    }

    #[test]
    fn render_queue_receives_each_lap_and_the_sentinel() {
        let tmp = tempfile::tempdir().unwrap();
        let lattice = ring_lattice(30);
        let config = SimulationConfigBuilder::new()
            .max_laps(2)
            .steps_per_lap(1)
            .moves_per_step(1)
            .target_coverage(0.1)
            .output_dir(tmp.path())
            .build()
            .unwrap();
        let potential = BondCounting::new(-0.3);
        let schedule = Constant::new(600.0);
        let reporter = ProgressReporter::new();
        let (tx, rx) = mpsc::sync_channel(16);
        let mut rng = StdRng::seed_from_u64(5);

        run(
            &lattice,
            &config,
            &potential,
            &schedule,
            &reporter,
            Some(&tx),
            &mut rng,
        )
        .unwrap();
        drop(tx);

        let events: Vec<RenderEvent> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                RenderEvent::Lap(0),
                RenderEvent::Lap(1),
                RenderEvent::Shutdown
            ]
        );
    }

    #[test]
    fn lap_stats_are_reported_per_lap() {
        let tmp = tempfile::tempdir().unwrap();
        let lattice = ring_lattice(30);
        let config = SimulationConfigBuilder::new()
            .max_laps(4)
            .steps_per_lap(2)
            .moves_per_step(1)
            .target_coverage(0.2)
            .output_dir(tmp.path())
            .build()
            .unwrap();
        let potential = BondCounting::new(-0.3);
        let schedule = Constant::new(600.0);

        let laps_seen = std::sync::Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::LapFinish { stats } = event {
                laps_seen.lock().unwrap().push(stats.lap);
            }
        }));
        let mut rng = StdRng::seed_from_u64(9);

        run(
            &lattice,
            &config,
            &potential,
            &schedule,
            &reporter,
            None,
            &mut rng,
        )
        .unwrap();
        drop(reporter);

        assert_eq!(laps_seen.into_inner().unwrap(), vec![0, 1, 2, 3]);
    }
}
