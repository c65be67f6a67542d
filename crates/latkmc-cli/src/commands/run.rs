use crate::cli::RunArgs;
use crate::config::RunFile;
use crate::error::{CliError, Result};
use crate::progress::CliProgressHandler;
use crate::render;
use latkmc::engine::progress::ProgressReporter;
use latkmc::workflows::growth;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::mpsc;
use tracing::info;

const RENDER_QUEUE_DEPTH: usize = 64;

pub fn execute(args: RunArgs) -> Result<()> {
    let setup = RunFile::load(&args.config)?.into_setup(&args)?;
    info!(
        sites = setup.lattice.site_count(),
        laps = setup.config.max_laps,
        "lattice generated, starting growth run"
    );

    let (render_tx, render_rx) = mpsc::sync_channel(RENDER_QUEUE_DEPTH);
    let render_handle = render::spawn(render_rx);

    let handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(handler.get_callback());

    let mut rng = match setup.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let report = growth::run(
        &setup.lattice,
        &setup.config,
        setup.potential.as_ref(),
        setup.schedule.as_ref(),
        &reporter,
        Some(&render_tx),
        &mut rng,
    )?;

    drop(render_tx);
    let frames = render_handle
        .join()
        .map_err(|_| CliError::Other(anyhow::anyhow!("render worker panicked")))?;

    println!("Growth run finished after {} laps ({} steps).", report.laps, report.total_steps);
    println!(
        "  energy        {:.6} eV at {:.1} K",
        report.final_energy, report.final_temperature
    );
    println!(
        "  coverage      {:.4} ({} adatoms)",
        report.final_coverage, report.adatoms
    );
    println!(
        "  depositions   {} prepopulated, {} accepted, {} rejected",
        report.counters.prepopulated_depositions,
        report.counters.accepted_depositions,
        report.counters.rejected_depositions
    );
    println!(
        "  moves         {} attempted: {} hops, {} stays, {} blocked, {} rejected",
        report.counters.attempted_moves,
        report.counters.successful_moves,
        report.counters.not_moved_moves,
        report.counters.blocked_moves,
        report.counters.rejected_moves
    );
    println!("  checkpoints   {} ({} frames handed off)", setup.config.output_dir.display(), frames);

    Ok(())
}
