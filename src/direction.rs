//! The 8-connected neighborhood of a grid vertex.
//!
//! Directions are numbered 0..8, counterclockwise, starting at "right":
//! `0`=east, `1`=northeast, `2`=north, `3`=northwest, `4`=west,
//! `5`=southwest, `6`=south, `7`=southeast. Even codes are axis-aligned
//! (unit length); odd codes are diagonal (length `sqrt(2)`).

use bevy_math::IVec2;

/// One of the 8 directions to a neighboring grid vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction(u8);

impl Direction {
    pub const COUNT: u8 = 8;

    pub const EAST: Direction = Direction(0);
    pub const NORTH_EAST: Direction = Direction(1);
    pub const NORTH: Direction = Direction(2);
    pub const NORTH_WEST: Direction = Direction(3);
    pub const WEST: Direction = Direction(4);
    pub const SOUTH_WEST: Direction = Direction(5);
    pub const SOUTH: Direction = Direction(6);
    pub const SOUTH_EAST: Direction = Direction(7);

    pub const ALL: [Direction; 8] = [
        Direction(0),
        Direction(1),
        Direction(2),
        Direction(3),
        Direction(4),
        Direction(5),
        Direction(6),
        Direction(7),
    ];

    const OFFSETS: [IVec2; 8] = [
        IVec2::new(1, 0),
        IVec2::new(1, 1),
        IVec2::new(0, 1),
        IVec2::new(-1, 1),
        IVec2::new(-1, 0),
        IVec2::new(-1, -1),
        IVec2::new(0, -1),
        IVec2::new(1, -1),
    ];

    #[inline]
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        debug_assert!(code < Self::COUNT, "direction code out of range: {code}");
        Direction(code)
    }

    #[inline]
    #[must_use]
    pub fn code(&self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn offset(&self) -> IVec2 {
        Self::OFFSETS[self.0 as usize]
    }

    #[inline]
    #[must_use]
    pub fn is_diagonal(&self) -> bool {
        self.0 % 2 == 1
    }

    #[inline]
    #[must_use]
    pub fn is_axis_aligned(&self) -> bool {
        !self.is_diagonal()
    }

    /// East (0) or west (4): the horizontal pair, whose perpendicular axis
    /// is vertical.
    #[inline]
    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        self.0 == Self::EAST.0 || self.0 == Self::WEST.0
    }

    /// North (2) or south (6): the vertical pair, whose perpendicular axis
    /// is horizontal.
    #[inline]
    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.0 == Self::NORTH.0 || self.0 == Self::SOUTH.0
    }

    /// Euclidean length of a single step in this direction: `1` for
    /// axis-aligned directions, `sqrt(2)` for diagonals.
    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        if self.is_diagonal() {
            std::f64::consts::SQRT_2
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn codes_are_counterclockwise_from_east() {
        assert_eq!(Direction::EAST.offset(), IVec2::new(1, 0));
        assert_eq!(Direction::NORTH_EAST.offset(), IVec2::new(1, 1));
        assert_eq!(Direction::NORTH.offset(), IVec2::new(0, 1));
        assert_eq!(Direction::NORTH_WEST.offset(), IVec2::new(-1, 1));
        assert_eq!(Direction::WEST.offset(), IVec2::new(-1, 0));
        assert_eq!(Direction::SOUTH_WEST.offset(), IVec2::new(-1, -1));
        assert_eq!(Direction::SOUTH.offset(), IVec2::new(0, -1));
        assert_eq!(Direction::SOUTH_EAST.offset(), IVec2::new(1, -1));
    }

    #[test]
    fn even_codes_are_axis_aligned() {
        for d in Direction::ALL {
            assert_eq!(d.code() % 2 == 0, d.is_axis_aligned());
            assert_eq!(d.code() % 2 == 1, d.is_diagonal());
        }
    }

    #[test]
    fn lengths_match_geometry() {
        assert_eq!(Direction::EAST.length(), 1.0);
        assert_eq!(Direction::NORTH.length(), 1.0);
        assert!((Direction::NORTH_EAST.length() - std::f64::consts::SQRT_2).abs() < 1e-12);
    }
}
