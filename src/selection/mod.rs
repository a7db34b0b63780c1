//! The selection state machine shared by both selection variants
//! (point-to-point and intelligent scissors).
//!
//! [`SelectionCore`] owns the state every variant needs (the current
//! state, the committed segments, the image, the observer registry) and
//! the bookkeeping common to both (pushing/popping segments, firing
//! events). [`SelectionVariant`] supplies the parts that differ: how a new
//! segment is actually computed, and how background work (if any) is
//! driven.

pub mod point_to_point;
pub mod scissors;
pub mod worker;

use std::io::Write;

use crate::error::ScissorsError;
use crate::observer::{Event, Observers};
use crate::png_export;
use crate::polyline::Polyline;
use crate::raster::Raster;

/// The selection model's lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    NoSelection,
    Selecting,
    Selected,
    Processing,
}

/// State shared by every selection variant.
#[derive(Debug)]
pub struct SelectionCore {
    state: SelectionState,
    start: Option<(i32, i32)>,
    selection: Vec<Polyline>,
    image: Option<Raster>,
    observers: Observers,
}

impl Default for SelectionCore {
    fn default() -> Self {
        Self {
            state: SelectionState::NoSelection,
            start: None,
            selection: Vec::new(),
            image: None,
            observers: Observers::new(),
        }
    }
}

impl SelectionCore {
    #[inline]
    #[must_use]
    pub fn state(&self) -> SelectionState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> Option<(i32, i32)> {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn selection(&self) -> &[Polyline] {
        &self.selection
    }

    #[inline]
    #[must_use]
    pub fn image(&self) -> Option<&Raster> {
        self.image.as_ref()
    }

    pub fn fire(&mut self, event: Event) {
        self.observers.fire(event);
    }

    pub fn subscribe<F: FnMut(&Event) + 'static>(&mut self, listener: F) {
        self.observers.subscribe(listener);
    }

    /// Transition to `new`, firing a `State` event only when the state
    /// actually changes.
    pub fn set_state(&mut self, new: SelectionState) {
        let old = self.state;
        if old == new {
            return;
        }
        self.state = new;
        self.observers.fire(Event::State { old, new });
    }

    /// The point future paths/segments extend from: the last committed
    /// segment's end, or the start point if nothing has been committed yet.
    #[must_use]
    pub fn last_point(&self) -> (i32, i32) {
        self.selection
            .last()
            .map(Polyline::end)
            .or(self.start)
            .expect("last_point called while SELECTING requires a start point")
    }

    /// The `i`-th control point: `start` for `i == 0`, otherwise the end of
    /// segment `i - 1`.
    #[must_use]
    pub fn control_point(&self, i: usize) -> (i32, i32) {
        if i == 0 {
            self.start.expect("control points require a start point")
        } else {
            self.selection[i - 1].end()
        }
    }

    /// Append `segment`, transitioning to `Selected` if its end closes the
    /// loop back to `start`.
    pub fn push_segment(&mut self, segment: Polyline) {
        let closes = Some(segment.end()) == self.start;
        self.selection.push(segment);
        self.observers.fire(Event::Selection);
        if closes {
            self.set_state(SelectionState::Selected);
        }
    }

    /// Drop the most recently committed segment, if any.
    pub fn pop_segment(&mut self) {
        if self.selection.pop().is_some() {
            self.observers.fire(Event::Selection);
        }
    }

    pub(crate) fn clear_start(&mut self) {
        self.start = None;
    }

    pub(crate) fn set_start_point(&mut self, p: (i32, i32)) {
        self.start = Some(p);
    }

    pub(crate) fn replace_segment(&mut self, index: usize, segment: Polyline) {
        self.selection[index] = segment;
    }
}

/// The four-hook contract a selection variant implements so the
/// state-machine bookkeeping above is written once and shared by both
/// point-to-point and intelligent-scissors selections.
pub trait SelectionVariant {
    /// A selection has just started at `start`; set up whatever the
    /// variant needs to compute future segments from it.
    fn start_selection(&mut self, core: &mut SelectionCore, start: (i32, i32)) -> Result<(), ScissorsError>;

    /// Commit a new segment from the current endpoint to `p`.
    fn append_to_selection(&mut self, core: &mut SelectionCore, p: (i32, i32)) -> Result<(), ScissorsError>;

    /// Drop the most recent segment (or the start point, if there is no
    /// segment yet) and prepare to measure future segments from the new
    /// endpoint.
    fn undo_point(&mut self, core: &mut SelectionCore) -> Result<(), ScissorsError>;

    /// A non-mutating preview of the segment that would be committed by
    /// `append_to_selection(p)`.
    fn live_wire(&self, core: &SelectionCore, p: (i32, i32)) -> Result<Polyline, ScissorsError>;

    /// Close the selection by appending a final segment back to `start`.
    fn finish_selection(&mut self, core: &mut SelectionCore) -> Result<(), ScissorsError>;

    /// Move control point `index` to `q`, replacing the segments joined
    /// there.
    fn move_point(&mut self, core: &mut SelectionCore, index: usize, q: (i32, i32)) -> Result<(), ScissorsError>;

    /// Cancel whatever background work is in flight and restore the state
    /// that was active before it started.
    fn cancel_processing(&mut self, core: &mut SelectionCore) -> Result<(), ScissorsError>;

    /// The image changed (or was cleared): drop any derived state tied to
    /// the old one and rebuild whatever the variant needs for the new one.
    fn on_set_image(&mut self, core: &mut SelectionCore) -> Result<(), ScissorsError>;

    /// Drain completed background work, if any. Called by
    /// [`SelectionModel::poll`].
    fn poll(&mut self, core: &mut SelectionCore) -> Result<(), ScissorsError>;
}

/// The selection model: the generic state machine parameterized by a
/// [`SelectionVariant`] (point-to-point or intelligent scissors).
pub struct SelectionModel<V: SelectionVariant> {
    core: SelectionCore,
    variant: V,
}

impl<V: SelectionVariant> SelectionModel<V> {
    pub fn new(variant: V) -> Self {
        Self {
            core: SelectionCore::default(),
            variant,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> SelectionState {
        self.core.state
    }

    #[inline]
    #[must_use]
    pub fn selection(&self) -> &[Polyline] {
        &self.core.selection
    }

    #[inline]
    #[must_use]
    pub fn image(&self) -> Option<&Raster> {
        self.core.image.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn variant(&self) -> &V {
        &self.variant
    }

    #[inline]
    #[must_use]
    pub fn variant_mut(&mut self) -> &mut V {
        &mut self.variant
    }

    pub fn subscribe<F: FnMut(&Event) + 'static>(&mut self, listener: F) {
        self.core.subscribe(listener);
    }

    /// Replace the image, cancelling any in-flight work and resetting the
    /// selection to `NoSelection`.
    pub fn set_image(&mut self, image: Raster) -> Result<(), ScissorsError> {
        // Cancel first regardless of current state: it is always safe to
        // ask for cancellation, even if nothing is running.
        if self.core.state == SelectionState::Processing {
            self.variant.cancel_processing(&mut self.core)?;
        }
        let old = self.core.state;
        self.core.start = None;
        self.core.selection.clear();
        self.core.state = SelectionState::NoSelection;
        self.core.image = Some(image);
        self.variant.on_set_image(&mut self.core)?;
        // Unlike `set_state`, this notification fires even when already
        // NO_SELECTION: a fresh image always invalidates whatever the
        // observer previously knew about the selection's state.
        self.core.observers.fire(Event::State {
            old,
            new: SelectionState::NoSelection,
        });
        self.core.observers.fire(Event::Image);
        self.core.observers.fire(Event::Selection);
        Ok(())
    }

    /// Add a point: starts a selection from `NoSelection`, or commits a new
    /// segment while `Selecting`.
    pub fn add_point(&mut self, p: (i32, i32)) -> Result<(), ScissorsError> {
        match self.core.state {
            SelectionState::NoSelection => {
                self.core.set_start_point(p);
                self.variant.start_selection(&mut self.core, p)
            }
            SelectionState::Selecting => self.variant.append_to_selection(&mut self.core, p),
            SelectionState::Selected => Err(ScissorsError::IllegalState(
                "add_point is not valid while SELECTED",
            )),
            SelectionState::Processing => Err(ScissorsError::IllegalState(
                "add_point is not valid while PROCESSING",
            )),
        }
    }

    /// Undo the most recent step.
    pub fn undo(&mut self) -> Result<(), ScissorsError> {
        match self.core.state {
            SelectionState::Selected => self.variant.undo_point(&mut self.core),
            SelectionState::Selecting => {
                if self.core.selection.is_empty() {
                    self.core.clear_start();
                    self.core.set_state(SelectionState::NoSelection);
                    Ok(())
                } else {
                    self.variant.undo_point(&mut self.core)
                }
            }
            SelectionState::Processing => self.variant.cancel_processing(&mut self.core),
            SelectionState::NoSelection => {
                Err(ScissorsError::IllegalState("undo is not valid while NO_SELECTION"))
            }
        }
    }

    /// Close the selection.
    pub fn finish_selection(&mut self) -> Result<(), ScissorsError> {
        if self.core.state != SelectionState::Selecting {
            return Err(ScissorsError::IllegalState(
                "finish_selection requires SELECTING",
            ));
        }
        if self.core.selection.is_empty() {
            self.core.clear_start();
            self.core.set_state(SelectionState::NoSelection);
            Ok(())
        } else {
            self.variant.finish_selection(&mut self.core)
        }
    }

    /// Move control point `index` to `q`.
    pub fn move_point(&mut self, index: usize, q: (i32, i32)) -> Result<(), ScissorsError> {
        if self.core.state != SelectionState::Selected {
            return Err(ScissorsError::IllegalState("move_point requires SELECTED"));
        }
        self.variant.move_point(&mut self.core, index, q)
    }

    /// A non-mutating preview of the segment that would be committed next.
    pub fn live_wire(&self, p: (i32, i32)) -> Result<Polyline, ScissorsError> {
        if self.core.state != SelectionState::Selecting {
            return Err(ScissorsError::IllegalState("live_wire requires SELECTING"));
        }
        self.variant.live_wire(&self.core, p)
    }

    /// The control point nearest `p`, within `max_distance` (in the same
    /// linear units as the selection's coordinates), or `None` if none
    /// qualify.
    #[must_use]
    pub fn closest_point(&self, p: (i32, i32), max_distance: f64) -> Option<usize> {
        if self.core.state != SelectionState::Selected {
            return None;
        }
        let n = self.core.selection.len();
        let tol_sq = max_distance * max_distance;
        let mut best: Option<(usize, f64)> = None;
        for i in 0..n {
            let cp = self.core.control_point(i);
            let dx = f64::from(cp.0 - p.0);
            let dy = f64::from(cp.1 - p.1);
            let d2 = dx * dx + dy * dy;
            if d2 <= tol_sq && best.map_or(true, |(_, bd)| d2 < bd) {
                best = Some((i, d2));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Clear the selection and cancel any in-flight work, regardless of
    /// the current state.
    pub fn reset(&mut self) {
        if self.core.state == SelectionState::Processing {
            let _ = self.variant.cancel_processing(&mut self.core);
        }
        self.core.start = None;
        self.core.selection.clear();
        self.core.set_state(SelectionState::NoSelection);
        self.core.observers.fire(Event::Selection);
    }

    /// Drain any completed background work. A host application calls this
    /// periodically (after input events, or on a timer) while `Processing`.
    pub fn poll(&mut self) -> Result<(), ScissorsError> {
        self.variant.poll(&mut self.core)
    }

    /// Render the finished selection as a PNG: the bounding box of the
    /// polygon the segments trace, masked against the image.
    pub fn save_selection<W: Write>(&self, writer: W) -> Result<(), ScissorsError> {
        if self.core.state != SelectionState::Selected {
            return Err(ScissorsError::IllegalState("save_selection requires SELECTED"));
        }
        let image = self
            .core
            .image
            .as_ref()
            .ok_or(ScissorsError::IllegalState("save_selection requires an image"))?;
        png_export::save_selection(image, &self.core.selection, writer)
    }
}

#[cfg(test)]
mod test {
    use super::point_to_point::PointToPoint;
    use super::*;

    fn model() -> SelectionModel<PointToPoint> {
        SelectionModel::new(PointToPoint)
    }

    #[test]
    fn starts_in_no_selection() {
        assert_eq!(model().state(), SelectionState::NoSelection);
    }

    #[test]
    fn add_point_from_no_selection_enters_selecting() {
        let mut m = model();
        m.add_point((0, 0)).unwrap();
        assert_eq!(m.state(), SelectionState::Selecting);
    }

    #[test]
    fn add_point_while_selected_is_illegal() {
        let mut m = model();
        m.add_point((0, 0)).unwrap();
        m.add_point((10, 0)).unwrap();
        m.add_point((10, 10)).unwrap();
        m.add_point((0, 0)).unwrap(); // closes the loop -> Selected
        assert_eq!(m.state(), SelectionState::Selected);
        assert!(m.add_point((5, 5)).is_err());
    }

    #[test]
    fn undo_on_empty_selecting_clears_start() {
        let mut m = model();
        m.add_point((0, 0)).unwrap();
        m.undo().unwrap();
        assert_eq!(m.state(), SelectionState::NoSelection);
    }

    #[test]
    fn undo_on_no_selection_is_illegal() {
        let mut m = model();
        assert!(m.undo().is_err());
    }

    #[test]
    fn finish_selection_on_empty_resets() {
        let mut m = model();
        m.add_point((0, 0)).unwrap();
        m.finish_selection().unwrap();
        assert_eq!(m.state(), SelectionState::NoSelection);
    }

    #[test]
    fn closest_point_finds_nearest_control_point_s5() {
        let mut m = model();
        m.add_point((0, 0)).unwrap();
        m.add_point((10, 0)).unwrap();
        m.add_point((10, 10)).unwrap();
        m.add_point((0, 10)).unwrap();
        m.add_point((0, 0)).unwrap();
        assert_eq!(m.state(), SelectionState::Selected);

        assert_eq!(m.closest_point((10, 0), 4.0), Some(1));
        assert_eq!(m.closest_point((100, -100), 9.0), None);
    }

    #[test]
    fn save_selection_requires_selected_and_an_image() {
        let mut m = model();
        let mut buf = Vec::new();
        assert!(m.save_selection(&mut buf).is_err());

        m.add_point((0, 0)).unwrap();
        m.add_point((4, 0)).unwrap();
        m.add_point((4, 4)).unwrap();
        m.add_point((0, 0)).unwrap();
        assert_eq!(m.state(), SelectionState::Selected);
        assert!(m.save_selection(&mut buf).is_err());

        let img = image::RgbImage::from_pixel(10, 10, image::Rgb([200, 200, 200]));
        m.set_image(Raster::from_dynamic_image(&image::DynamicImage::ImageRgb8(img)))
            .unwrap();
        // setting the image resets the selection back to NO_SELECTION.
        assert!(m.save_selection(&mut buf).is_err());
    }
}
