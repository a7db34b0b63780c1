//! The background solve worker behind the scissors selection variant.
//!
//! One worker owns exactly one thread running one incremental search. A
//! cancelled or superseded worker is simply dropped: dropping it drops its
//! channel, so anything it sends afterward is silently undeliverable. That
//! makes the "ignore events from a worker that is no longer current"
//! invariant automatic rather than something callers have to check by id.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use crate::grid::Grid;
use crate::shortest_paths::ShortestPaths;
use crate::snapshot::PathfindingSnapshot;
use crate::weigher::{Weigher, WeightedGrid};

/// A message sent from the solve thread to whoever polls the worker.
pub enum WorkerMessage {
    Progress { snapshot: PathfindingSnapshot, percent: u8 },
    Done(PathfindingSnapshot),
    Failed(String),
}

/// A single background solve: a grid search running on its own thread,
/// reporting batched progress until it finishes, fails, or is cancelled.
pub struct SolveWorker {
    cancel: Arc<AtomicBool>,
    receiver: mpsc::Receiver<WorkerMessage>,
}

impl SolveWorker {
    pub fn spawn(
        grid: Arc<Grid>,
        weigher: Arc<dyn Weigher + Send + Sync>,
        start_id: u32,
        batch_size: u32,
    ) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_in_thread = cancel.clone();
        let (tx, rx) = mpsc::channel();

        let builder = thread::Builder::new().name("scissors-solve".to_string());
        let spawn_result = builder.spawn(move || {
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let weighted = WeightedGrid::new(&grid, weigher.as_ref());
                let mut engine = ShortestPaths::new(&weighted);
                engine.set_start(start_id);
                let n = engine.vertex_count();
                loop {
                    if cancel_in_thread.load(Ordering::Relaxed) {
                        log::trace!("scissors worker: cancelled");
                        return;
                    }
                    let snapshot = engine.extend_search(batch_size);
                    if engine.all_paths_found() {
                        log::debug!("scissors worker: solve complete");
                        let _ = tx.send(WorkerMessage::Done(snapshot));
                        return;
                    }
                    let percent = if n == 0 {
                        100
                    } else {
                        ((u64::from(engine.settled_count()) * 100) / u64::from(n)) as u8
                    };
                    if tx.send(WorkerMessage::Progress { snapshot, percent }).is_err() {
                        // Receiver dropped: we have been superseded or cancelled.
                        return;
                    }
                }
            }));
            if let Err(payload) = outcome {
                let _ = tx.send(WorkerMessage::Failed(panic_message(&payload)));
            }
        });

        if let Err(err) = spawn_result {
            // Could not even start the thread: report it as an immediate
            // failure so the caller's poll loop handles it uniformly.
            let (tx, rx) = mpsc::channel();
            let _ = tx.send(WorkerMessage::Failed(format!(
                "failed to spawn background solve thread: {err}"
            )));
            return Self { cancel, receiver: rx };
        }

        Self { cancel, receiver: rx }
    }

    /// Ask the worker to stop at its next batch boundary. Does not block:
    /// the thread is left to exit on its own.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Drain every message sent since the last drain, in order.
    pub fn drain(&self) -> Vec<WorkerMessage> {
        self.receiver.try_iter().collect()
    }
}

impl Drop for SolveWorker {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "background solver panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::weigher::CrossGradMono;
    use image::{DynamicImage, RgbImage};
    use std::time::{Duration, Instant};

    fn small_grid_and_weigher() -> (Arc<Grid>, Arc<dyn Weigher + Send + Sync>) {
        let img = RgbImage::new(8, 8);
        let raster = crate::raster::Raster::from_dynamic_image(&DynamicImage::ImageRgb8(img));
        let grid = Arc::new(Grid::new(8, 8));
        let weigher: Arc<dyn Weigher + Send + Sync> = Arc::new(CrossGradMono::new(&raster));
        (grid, weigher)
    }

    #[test]
    fn runs_to_completion_and_reports_done() {
        let (grid, weigher) = small_grid_and_weigher();
        let worker = SolveWorker::spawn(grid, weigher, 0, 4);

        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            for msg in worker.drain() {
                if let WorkerMessage::Done(snapshot) = msg {
                    assert!(snapshot.settled(0));
                    return;
                }
            }
            assert!(Instant::now() < deadline, "worker never finished");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn cancel_stops_delivery() {
        let (grid, weigher) = small_grid_and_weigher();
        let worker = SolveWorker::spawn(grid, weigher, 0, 1);
        worker.cancel();
        // Give the thread a moment to observe the flag; no assertion on
        // timing, only that dropping afterward doesn't panic or hang.
        thread::sleep(Duration::from_millis(20));
        drop(worker);
    }
}
