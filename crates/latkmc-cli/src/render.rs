use latkmc::engine::progress::RenderEvent;
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Drains the visualization hand-off queue until the shutdown sentinel
/// arrives and returns the number of lap frames seen. Actual image
/// rendering is left to external tooling working from the occupancy
/// checkpoints; this worker only acknowledges laps so the simulation loop
/// never waits on visualization.
pub fn spawn(receiver: Receiver<RenderEvent>) -> JoinHandle<u64> {
    thread::spawn(move || {
        let mut frames = 0;
        while let Ok(event) = receiver.recv() {
            match event {
                RenderEvent::Lap(lap) => {
                    frames += 1;
                    debug!(lap, "lap checkpoint ready for rendering");
                }
                RenderEvent::Shutdown => break,
            }
        }
        frames
    })
}
