//! The point-to-point selection variant: every segment is a straight line
//! between two clicked points, computed synchronously with no background
//! work at all.

use crate::error::ScissorsError;
use crate::polyline::Polyline;

use super::{SelectionCore, SelectionVariant};

/// A selection variant whose segments are straight lines between
/// consecutive points. Has no state of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointToPoint;

impl SelectionVariant for PointToPoint {
    fn start_selection(&mut self, core: &mut SelectionCore, _start: (i32, i32)) -> Result<(), ScissorsError> {
        core.set_state(super::SelectionState::Selecting);
        Ok(())
    }

    fn append_to_selection(&mut self, core: &mut SelectionCore, p: (i32, i32)) -> Result<(), ScissorsError> {
        let last = core.last_point();
        core.push_segment(Polyline::two_point(last, p));
        Ok(())
    }

    fn undo_point(&mut self, core: &mut SelectionCore) -> Result<(), ScissorsError> {
        if core.selection().is_empty() {
            core.clear_start();
            core.set_state(super::SelectionState::NoSelection);
        } else {
            core.pop_segment();
            core.set_state(super::SelectionState::Selecting);
        }
        Ok(())
    }

    fn live_wire(&self, core: &SelectionCore, p: (i32, i32)) -> Result<Polyline, ScissorsError> {
        Ok(Polyline::two_point(core.last_point(), p))
    }

    fn finish_selection(&mut self, core: &mut SelectionCore) -> Result<(), ScissorsError> {
        let start = core
            .start()
            .ok_or(ScissorsError::IllegalState("finish_selection without a start point"))?;
        let last = core.last_point();
        core.push_segment(Polyline::two_point(last, start));
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
        let before_start = core.control_point(before_idx);
        let after_end = core.selection()[after_idx].end();

        core.replace_segment(before_idx, Polyline::two_point(before_start, q));
        core.replace_segment(after_idx, Polyline::two_point(q, after_end));
        if index == 0 {
            core.set_start_point(q);
        }
        core.fire(crate::observer::Event::Selection);
        Ok(())
    }

    fn cancel_processing(&mut self, _core: &mut SelectionCore) -> Result<(), ScissorsError> {
        Err(ScissorsError::IllegalState(
            "point-to-point selections never enter PROCESSING",
        ))
    }

    fn on_set_image(&mut self, _core: &mut SelectionCore) -> Result<(), ScissorsError> {
        Ok(())
    }

    fn poll(&mut self, _core: &mut SelectionCore) -> Result<(), ScissorsError> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::selection::{SelectionModel, SelectionState};

    #[test]
    fn move_point_updates_both_adjacent_segments() {
        let mut m = SelectionModel::new(PointToPoint);
        m.add_point((0, 0)).unwrap();
        m.add_point((10, 0)).unwrap();
        m.add_point((10, 10)).unwrap();
        m.add_point((0, 0)).unwrap();
        assert_eq!(m.state(), SelectionState::Selected);

        m.move_point(1, (20, 20)).unwrap();
        let selection = m.selection();
        assert_eq!(selection[0].end(), (20, 20));
        assert_eq!(selection[1].start(), (20, 20));
    }

    #[test]
    fn move_point_zero_updates_start() {
        let mut m = SelectionModel::new(PointToPoint);
        m.add_point((0, 0)).unwrap();
        m.add_point((10, 0)).unwrap();
        m.add_point((10, 10)).unwrap();
        m.add_point((0, 0)).unwrap();

        m.move_point(0, (-5, -5)).unwrap();
        assert_eq!(m.selection().last().unwrap().end(), (-5, -5));
    }
}
