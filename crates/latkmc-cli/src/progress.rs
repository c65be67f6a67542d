use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use latkmc::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Maps engine progress events onto one indicatif bar: a lap counter with
/// the per-lap energy, temperature, coverage, and adatom count as the
/// message.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::bar_style())
            .with_message("waiting");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::RunStart { total_laps } => {
                    pb_guard.reset();
                    pb_guard.set_style(Self::bar_style());
                    pb_guard.set_length(total_laps);
                    pb_guard.set_position(0);
                    pb_guard.set_message("lap 0");
                }
                Progress::LapFinish { stats } => {
                    pb_guard.inc(1);
                    pb_guard.set_message(format!(
                        "E={:.4} eV  T={:.0} K  coverage={:.3}  adatoms={}",
                        stats.energy, stats.temperature, stats.coverage, stats.adatoms
                    ));
                }
                Progress::Message(msg) => {
                    pb_guard.println(format!("  {}", msg));
                }
                Progress::RunFinish => {
                    pb_guard.finish();
                }
            }
        })
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} laps ({eta}) {msg}")
            .expect("Failed to create bar style template")
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    write!(w, "{:.1}s", state.eta().as_secs_f64()).unwrap()
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
