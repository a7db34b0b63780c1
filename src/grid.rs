//! The implicit 8-connected pixel grid graph: vertex ids are row-major
//! pixel indices (`id = x + width * y`); edges exist to every in-bounds
//! neighbor in one of the 8 [`Direction`]s.

use bevy_math::UVec2;

use crate::direction::Direction;
use crate::error::ScissorsError;
use crate::polyline::{Polyline, PolylineBuffer};

/// An edge of the grid graph, carrying enough geometry for a weigher to
/// compute its cost without re-deriving coordinates from the id.
#[derive(Debug, Clone, Copy)]
pub struct GridEdge {
    pub start: u32,
    pub end: u32,
    pub start_point: UVec2,
    pub dir: Direction,
}

/// A `width x height` grid of pixel vertices, 8-connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self { width, height }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.width * self.height
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, p: UVec2) -> bool {
        p.x < self.width && p.y < self.height
    }

    #[inline]
    #[must_use]
    pub fn id(&self, p: UVec2) -> u32 {
        p.x + self.width * p.y
    }

    pub fn id_at(&self, p: UVec2) -> Result<u32, ScissorsError> {
        if !self.contains(p) {
            return Err(ScissorsError::InvalidArgument(format!(
                "point {p:?} is outside the {}x{} grid",
                self.width, self.height
            )));
        }
        Ok(self.id(p))
    }

    #[inline]
    #[must_use]
    pub fn point_at(&self, id: u32) -> UVec2 {
        UVec2::new(id % self.width, id / self.width)
    }

    /// Outgoing edges of `id` to every in-bounds 8-connected neighbor.
    #[must_use]
    pub fn edges(&self, id: u32) -> Vec<GridEdge> {
        let p = self.point_at(id);
        Direction::ALL
            .into_iter()
            .filter_map(|dir| {
                let off = dir.offset();
                let nx = p.x as i64 + off.x as i64;
                let ny = p.y as i64 + off.y as i64;
                if nx < 0 || ny < 0 || nx >= self.width as i64 || ny >= self.height as i64 {
                    return None;
                }
                let neighbor = UVec2::new(nx as u32, ny as u32);
                Some(GridEdge {
                    start: id,
                    end: self.id(neighbor),
                    start_point: p,
                    dir,
                })
            })
            .collect()
    }

    /// Build a [`Polyline`] from a sequence of vertex ids, such as one
    /// returned by [`crate::snapshot::PathfindingSnapshot::path_to`].
    pub fn path_to_polyline(&self, ids: &[u32]) -> Result<Polyline, ScissorsError> {
        let mut buf = PolylineBuffer::new();
        for &id in ids {
            let p = self.point_at(id);
            buf.append(p.x as i32, p.y as i32);
        }
        buf.to_polyline()
    }
}

/// Convert a signed selection-space point into a grid point, rejecting
/// negative coordinates.
pub fn to_uvec2(p: (i32, i32)) -> Result<UVec2, ScissorsError> {
    if p.0 < 0 || p.1 < 0 {
        return Err(ScissorsError::InvalidArgument(format!(
            "point {p:?} has a negative coordinate"
        )));
    }
    Ok(UVec2::new(p.0 as u32, p.1 as u32))
}
