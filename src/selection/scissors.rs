//! The intelligent-scissors selection variant: segments are least-cost
//! paths through the image, computed by a cancellable background worker.
//!
//! Solve lifecycle (mirrors the generic model's `Processing` excursion):
//! whenever the active endpoint changes, `previous_state` is recorded as
//! whatever state was current at that moment, the model moves to
//! `Processing`, and a solve is launched from the new endpoint. On success,
//! the state reverts to `previous_state`, except `NoSelection` resolves
//! forward into `Selecting` now that a first control point exists.
//!
//! Cancellation is *not* simply the reverse of `previous_state`: whether a
//! segment needs to be popped depends on what the launch itself did, not on
//! what state it was launched from. `append_to_selection` commits a segment
//! before launching (so cancelling un-commits it), while `undo_point`
//! launches from `Selecting` too but has already popped the segment it
//! needs to pop — cancelling it must leave the selection alone. Each launch
//! site therefore records its own [`CancelAction`], and `rollback` acts on
//! that instead of re-deriving an action from `previous_state`.

use std::sync::Arc;

use bevy_math::UVec2;

use crate::config::ScissorsConfig;
use crate::error::ScissorsError;
use crate::grid::{to_uvec2, Grid};
use crate::observer::Event;
use crate::polyline::{Polyline, PolylineBuffer};
use crate::snapshot::PathfindingSnapshot;
use crate::weigher::{make_weigher, Weigher};

use super::worker::{SolveWorker, WorkerMessage};
use super::{SelectionCore, SelectionState, SelectionVariant};

/// The deferred half of a `move_point` call: the segment replacement
/// cannot happen until the relaunched solve succeeds.
struct PendingMove {
    index: usize,
    before_idx: usize,
    after_idx: usize,
    before_anchor: (i32, i32),
    after_anchor: (i32, i32),
    new_point: (i32, i32),
}

/// What cancelling the in-flight solve must undo, set by whichever call
/// site launched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CancelAction {
    /// `start_selection`: nothing has been committed yet; discard the
    /// start point entirely.
    ClearStart,
    /// `append_to_selection`: a segment was committed before the launch;
    /// un-commit it.
    PopSegment,
    /// `undo_point`: the segment was already popped before the launch;
    /// cancelling just returns to `Selecting` without touching it again.
    RestoreSelecting,
    /// `move_point`: nothing new was committed; restore `Selected`.
    RestoreSelected,
}

/// A selection variant whose segments are least-cost paths found by an
/// incremental Dijkstra search over the image, run on a background thread.
pub struct Scissors {
    weigher_name: String,
    batch_size: u32,
    grid: Option<Arc<Grid>>,
    weigher: Option<Arc<dyn Weigher + Send + Sync>>,
    paths: Option<PathfindingSnapshot>,
    pending_snapshot: Option<PathfindingSnapshot>,
    pending_move: Option<PendingMove>,
    worker: Option<SolveWorker>,
    previous_state: SelectionState,
    cancel_action: CancelAction,
    progress: u8,
}

impl Scissors {
    pub fn new(config: &ScissorsConfig) -> Self {
        Self {
            weigher_name: config.default_weigher.clone(),
            batch_size: config.batch_size,
            grid: None,
            weigher: None,
            paths: None,
            pending_snapshot: None,
            pending_move: None,
            worker: None,
            previous_state: SelectionState::NoSelection,
            cancel_action: CancelAction::ClearStart,
            progress: 0,
        }
    }

    /// The most recently completed search, if any.
    #[must_use]
    pub fn paths(&self) -> Option<&PathfindingSnapshot> {
        self.paths.as_ref()
    }

    /// The most recent in-flight search snapshot, published while a solve
    /// is still running.
    #[must_use]
    pub fn pending_paths(&self) -> Option<&PathfindingSnapshot> {
        self.pending_snapshot.as_ref()
    }

    /// Percent of the grid settled by the current (or most recent) solve.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    fn grid(&self) -> Result<&Arc<Grid>, ScissorsError> {
        self.grid
            .as_ref()
            .ok_or(ScissorsError::IllegalState("no image has been set"))
    }

    fn weigher(&self) -> Result<&Arc<dyn Weigher + Send + Sync>, ScissorsError> {
        self.weigher
            .as_ref()
            .ok_or(ScissorsError::IllegalState("no image has been set"))
    }

    fn vertex_id(&self, p: (i32, i32)) -> Result<u32, ScissorsError> {
        let v: UVec2 = to_uvec2(p)?;
        self.grid()?.id_at(v)
    }

    /// Record `previous_state = core.state()`, transition to `Processing`,
    /// and spawn a solve from `start_point`. `cancel_action` records what a
    /// cancellation of this particular solve must undo.
    fn launch_solve(
        &mut self,
        core: &mut SelectionCore,
        start_point: (i32, i32),
        cancel_action: CancelAction,
    ) -> Result<(), ScissorsError> {
        self.previous_state = core.state();
        self.cancel_action = cancel_action;
        let start_id = self.vertex_id(start_point)?;
        let grid = self.grid()?.clone();
        let weigher = self.weigher()?.clone();
        self.pending_snapshot = None;
        self.progress = 0;
        self.worker = Some(SolveWorker::spawn(grid, weigher, start_id, self.batch_size));
        core.set_state(SelectionState::Processing);
        Ok(())
    }

    fn path_segment(&self, snapshot: &PathfindingSnapshot, to: (i32, i32)) -> Result<Polyline, ScissorsError> {
        let id = self.vertex_id(to)?;
        let ids = snapshot.path_to(id)?;
        self.grid()?.path_to_polyline(&ids)
    }

    /// The state a successful solve settles into: the first solve (launched
    /// from NO_SELECTION) establishes the first control point and moves on
    /// into SELECTING; every other solve returns to the state it interrupted.
    fn success_state(&self) -> SelectionState {
        match self.previous_state {
            SelectionState::NoSelection => SelectionState::Selecting,
            other => other,
        }
    }

    /// Undo whatever `cancel_action` says the current solve's launch did.
    fn rollback(&mut self, core: &mut SelectionCore) {
        self.worker = None;
        self.pending_snapshot = None;
        self.pending_move = None;
        match self.cancel_action {
            CancelAction::ClearStart => {
                core.clear_start();
                core.set_state(SelectionState::NoSelection);
            }
            CancelAction::PopSegment => {
                core.pop_segment();
                core.set_state(SelectionState::Selecting);
            }
            CancelAction::RestoreSelecting => {
                core.set_state(SelectionState::Selecting);
            }
            CancelAction::RestoreSelected => {
                core.set_state(SelectionState::Selected);
            }
        }
    }

    fn finish_move(&self, core: &mut SelectionCore, pm: &PendingMove, snapshot: &PathfindingSnapshot) -> Result<(), ScissorsError> {
        let after_segment = self.path_segment(snapshot, pm.after_anchor)?;

        let before_ids_from_q = snapshot.path_to(self.vertex_id(pm.before_anchor)?)?;
        let mut buf = PolylineBuffer::new();
        for id in before_ids_from_q.iter().rev() {
            let p = self.grid()?.point_at(*id);
            buf.append(p.x as i32, p.y as i32);
        }
        let before_segment = buf.to_polyline()?;

        core.replace_segment(pm.before_idx, before_segment);
        core.replace_segment(pm.after_idx, after_segment);
        if pm.index == 0 {
            core.set_start_point(pm.new_point);
        }
        core.fire(Event::Selection);
        Ok(())
    }
}

impl SelectionVariant for Scissors {
    fn start_selection(&mut self, core: &mut SelectionCore, start: (i32, i32)) -> Result<(), ScissorsError> {
        self.launch_solve(core, start, CancelAction::ClearStart)
    }

    fn append_to_selection(&mut self, core: &mut SelectionCore, p: (i32, i32)) -> Result<(), ScissorsError> {
        let snapshot = self
            .paths
            .clone()
            .ok_or(ScissorsError::IllegalState("no completed search to append from"))?;
        let segment = self.path_segment(&snapshot, p)?;
        core.push_segment(segment);
        if core.state() != SelectionState::Selected {
            self.launch_solve(core, p, CancelAction::PopSegment)?;
        }
        Ok(())
    }

    fn undo_point(&mut self, core: &mut SelectionCore) -> Result<(), ScissorsError> {
        // The wrapper only calls this when `selection` is non-empty (or the
        // state was SELECTED), so a start point always remains after the pop.
        // The pop itself is already done here, so cancelling this solve must
        // not pop again: it only needs to restore SELECTING.
        core.pop_segment();
        core.set_state(SelectionState::Selecting);
        let endpoint = core.last_point();
        self.launch_solve(core, endpoint, CancelAction::RestoreSelecting)
    }

    fn live_wire(&self, _core: &SelectionCore, p: (i32, i32)) -> Result<Polyline, ScissorsError> {
        let snapshot = self
            .paths
            .as_ref()
            .ok_or(ScissorsError::IllegalState("no completed search to preview from"))?;
        self.path_segment(snapshot, p)
    }

    fn finish_selection(&mut self, core: &mut SelectionCore) -> Result<(), ScissorsError> {
        let start = core
            .start()
            .ok_or(ScissorsError::IllegalState("finish_selection without a start point"))?;
        let snapshot = self
            .paths
            .clone()
            .ok_or(ScissorsError::IllegalState("no completed search to close with"))?;
        let segment = self.path_segment(&snapshot, start)?;
        core.push_segment(segment);
        core.set_state(SelectionState::Selected);
        Ok(())
    }

    fn move_point(&mut self, core: &mut SelectionCore, index: usize, q: (i32, i32)) -> Result<(), ScissorsError> {
        let n = core.selection().len();
        if index >= n {
            return Err(ScissorsError::InvalidArgument(format!(
                "control point index {index} out of range for {n} segments"
            )));
        }
        let before_idx = (index + n - 1) % n;
        let after_idx = index;
        let before_anchor = core.control_point(before_idx);
        let after_anchor = core.selection()[after_idx].end();

        self.pending_move = Some(PendingMove {
            index,
            before_idx,
            after_idx,
            before_anchor,
            after_anchor,
            new_point: q,
        });
        self.launch_solve(core, q, CancelAction::RestoreSelected)
    }

    fn cancel_processing(&mut self, core: &mut SelectionCore) -> Result<(), ScissorsError> {
        if core.state() != SelectionState::Processing {
            return Err(ScissorsError::IllegalState(
                "cancel_processing requires PROCESSING",
            ));
        }
        self.rollback(core);
        Ok(())
    }

    fn on_set_image(&mut self, core: &mut SelectionCore) -> Result<(), ScissorsError> {
        self.worker = None;
        self.paths = None;
        self.pending_snapshot = None;
        self.pending_move = None;
        self.progress = 0;
        match core.image() {
            Some(raster) => {
                self.grid = Some(Arc::new(Grid::new(raster.width(), raster.height())));
                self.weigher = Some(Arc::from(make_weigher(&self.weigher_name, raster)?));
            }
            None => {
                self.grid = None;
                self.weigher = None;
            }
        }
        Ok(())
    }

    fn poll(&mut self, core: &mut SelectionCore) -> Result<(), ScissorsError> {
        let Some(worker) = &self.worker else {
            return Ok(());
        };
        for msg in worker.drain() {
            match msg {
                WorkerMessage::Progress { snapshot, percent } => {
                    self.pending_snapshot = Some(snapshot);
                    self.progress = percent;
                    core.fire(Event::PendingPaths);
                    core.fire(Event::Progress(percent));
                }
                WorkerMessage::Done(snapshot) => {
                    self.worker = None;
                    self.pending_snapshot = None;
                    self.progress = 100;
                    if let Some(pm) = self.pending_move.take() {
                        self.finish_move(core, &pm, &snapshot)?;
                    }
                    self.paths = Some(snapshot);
                    core.set_state(self.success_state());
                    core.fire(Event::Progress(100));
                    return Ok(());
                }
                WorkerMessage::Failed(message) => {
                    self.rollback(core);
                    return Err(ScissorsError::WorkerFailure(message));
                }
            }
        }
        Ok(())
    }
}
