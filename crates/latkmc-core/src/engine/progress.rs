use super::state::Counters;

/// Per-lap aggregate statistics, reported after every lap and at the end of
/// the run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LapStats {
    pub lap: u64,
    pub energy: f64,
    pub temperature: f64,
    pub coverage: f64,
    pub adatoms: usize,
    pub total_steps: u64,
    pub counters: Counters,
}

#[derive(Debug, Clone)]
pub enum Progress {
    RunStart { total_laps: u64 },
    LapFinish { stats: LapStats },
    Message(String),
    RunFinish,
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

/// Messages posted on the visualization hand-off channel. The driver posts
/// one `Lap` per completed lap (fire-and-forget) and a single `Shutdown`
/// sentinel after the final lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    Lap(u64),
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::RunStart { total_laps: 3 });
    }

    #[test]
    fn reporter_forwards_events_to_the_callback() {
        let laps_seen = AtomicU64::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::LapFinish { stats } = event {
                laps_seen.fetch_add(stats.lap + 1, Ordering::SeqCst);
            }
        }));
        reporter.report(Progress::LapFinish {
            stats: LapStats {
                lap: 4,
                ..LapStats::default()
            },
        });
        reporter.report(Progress::RunFinish);
        assert_eq!(laps_seen.load(Ordering::SeqCst), 5);
    }
}
