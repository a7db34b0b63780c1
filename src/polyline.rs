//! Integer-coordinate polylines: an immutable [`Polyline`] for finished
//! path segments, and a [`PolylineBuffer`] for building one up point by
//! point while a search is in progress.

use crate::error::ScissorsError;

/// An immutable sequence of at least two integer points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polyline {
    xs: Vec<i32>,
    ys: Vec<i32>,
}

impl Polyline {
    /// A two-point polyline, useful for the straight-line segments of the
    /// point-to-point selection variant.
    #[must_use]
    pub fn two_point(start: (i32, i32), end: (i32, i32)) -> Self {
        Self {
            xs: vec![start.0, end.0],
            ys: vec![start.1, end.1],
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    #[must_use]
    pub fn point(&self, i: usize) -> (i32, i32) {
        (self.xs[i], self.ys[i])
    }

    #[must_use]
    pub fn start(&self) -> (i32, i32) {
        self.point(0)
    }

    #[must_use]
    pub fn end(&self) -> (i32, i32) {
        self.point(self.len() - 1)
    }

    pub fn points(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.xs.iter().zip(self.ys.iter()).map(|(&x, &y)| (x, y))
    }
}

/// A growable point buffer that dedups consecutive duplicate points as they
/// are appended. Interior points are never deduped beyond that: a buffer
/// built by joining several segments end-to-end only collapses the points
/// at each join, not any other coincidental repeats within a segment.
#[derive(Debug, Clone, Default)]
pub struct PolylineBuffer {
    xs: Vec<i32>,
    ys: Vec<i32>,
}

impl PolylineBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Append `(x, y)`, skipping it if it repeats the buffer's current last
    /// point.
    pub fn append(&mut self, x: i32, y: i32) {
        if let (Some(&lx), Some(&ly)) = (self.xs.last(), self.ys.last()) {
            if lx == x && ly == y {
                return;
            }
        }
        self.xs.push(x);
        self.ys.push(y);
    }

    /// Append every point of `other` in order; the join point is deduped
    /// like any other append.
    pub fn append_polyline(&mut self, other: &Polyline) {
        for (x, y) in other.points() {
            self.append(x, y);
        }
    }

    pub fn reverse(&mut self) {
        self.xs.reverse();
        self.ys.reverse();
    }

    /// Freeze the buffer into a [`Polyline`]. A single accumulated point is
    /// widened into a degenerate two-point polyline at that point; an empty
    /// buffer is an error since a polyline always has a start and an end.
    pub fn to_polyline(&self) -> Result<Polyline, ScissorsError> {
        if self.xs.is_empty() {
            return Err(ScissorsError::InvalidArgument(
                "cannot build a polyline from an empty buffer".to_string(),
            ));
        }
        if self.xs.len() == 1 {
            return Ok(Polyline {
                xs: vec![self.xs[0]; 2],
                ys: vec![self.ys[0]; 2],
            });
        }
        Ok(Polyline {
            xs: self.xs.clone(),
            ys: self.ys.clone(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn append_dedups_consecutive_duplicates() {
        let mut buf = PolylineBuffer::new();
        buf.append(0, 0);
        buf.append(0, 0);
        buf.append(1, 0);
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn to_polyline_widens_single_point() {
        let mut buf = PolylineBuffer::new();
        buf.append(3, 4);
        let poly = buf.to_polyline().unwrap();
        assert_eq!(poly.len(), 2);
        assert_eq!(poly.start(), (3, 4));
        assert_eq!(poly.end(), (3, 4));
    }

    #[test]
    fn to_polyline_errors_on_empty_buffer() {
        let buf = PolylineBuffer::new();
        assert!(buf.to_polyline().is_err());
    }

    #[test]
    fn join_only_dedups_at_the_seam() {
        let mut buf = PolylineBuffer::new();
        buf.append_polyline(&Polyline::two_point((0, 0), (1, 1)));
        // second segment starts exactly where the first ended: seam dedups.
        buf.append_polyline(&Polyline::two_point((1, 1), (2, 2)));
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn reverse_flips_point_order() {
        let mut buf = PolylineBuffer::new();
        buf.append(0, 0);
        buf.append(1, 1);
        buf.append(2, 2);
        buf.reverse();
        let poly = buf.to_polyline().unwrap();
        assert_eq!(poly.start(), (2, 2));
        assert_eq!(poly.end(), (0, 0));
    }
}
