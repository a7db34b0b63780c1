//! Edge weighers: turn local pixel-intensity gradients into non-negative
//! edge weights, lower where the image is "busy" (a likely boundary) and
//! higher across flat regions.

use crate::direction::Direction;
use crate::error::ScissorsError;
use crate::grid::{Grid, GridEdge};
use crate::raster::Raster;
use crate::shortest_paths::{Graph, WeightedEdge};

/// `180 - 64`: the weight assigned to an axis-aligned edge that touches the
/// image border, where the perpendicular pixels needed for a real gradient
/// estimate don't exist. Chosen low enough to keep border edges attractive
/// to the search without making them free. Load-bearing; do not "round" it.
pub const BORDER_WEIGHT: u32 = 116;

/// Something that can price a [`GridEdge`].
pub trait Weigher {
    fn weight(&self, edge: &GridEdge) -> u32;
}

const WEIGHER_CROSS_GRAD_MONO: &str = "CrossGradMono";
const WEIGHER_COLORED_WEIGHT: &str = "ColoredWeight";

/// The names accepted by [`make_weigher`].
#[must_use]
pub fn weigher_names() -> &'static [&'static str] {
    &[WEIGHER_CROSS_GRAD_MONO, WEIGHER_COLORED_WEIGHT]
}

/// Construct a named weigher over `raster`.
pub fn make_weigher(name: &str, raster: &Raster) -> Result<Box<dyn Weigher + Send + Sync>, ScissorsError> {
    match name {
        WEIGHER_CROSS_GRAD_MONO => Ok(Box::new(CrossGradMono::new(raster))),
        WEIGHER_COLORED_WEIGHT => Ok(Box::new(ColoredWeight::new(raster))),
        other => Err(ScissorsError::InvalidArgument(format!(
            "unknown weigher: {other} (expected one of {:?})",
            weigher_names()
        ))),
    }
}

fn grad_ceiling(dir: Direction) -> u32 {
    if dir.is_axis_aligned() {
        180
    } else {
        255
    }
}

/// Perpendicular intensity gradient across one edge of `band`, scaled by
/// the edge's length. Axis-aligned edges on the image border fall back to
/// [`BORDER_WEIGHT`] since the perpendicular pixels they'd need don't
/// exist.
fn cross_grad(raster: &Raster, x: u32, y: u32, band: usize, dir: Direction) -> u32 {
    let w = raster.width();
    let h = raster.height();

    if dir.is_horizontal() {
        if y == 0 || y == h - 1 {
            return BORDER_WEIGHT;
        }
        let end_x = (x as i64 + dir.offset().x as i64) as u32;
        let top = raster.get(x, y + 1, band) as i32 + raster.get(end_x, y + 1, band) as i32;
        let bottom = raster.get(x, y - 1, band) as i32 + raster.get(end_x, y - 1, band) as i32;
        ((top - bottom).unsigned_abs()) / 4
    } else if dir.is_vertical() {
        if x == 0 || x == w - 1 {
            return BORDER_WEIGHT;
        }
        let end_y = (y as i64 + dir.offset().y as i64) as u32;
        let right = raster.get(x + 1, y, band) as i32 + raster.get(x + 1, end_y, band) as i32;
        let left = raster.get(x - 1, y, band) as i32 + raster.get(x - 1, end_y, band) as i32;
        ((right - left).unsigned_abs()) / 4
    } else {
        let (p1, p2) = diagonal_perpendicular_pixels(x, y, dir);
        (raster.get(p1.0, p1.1, band) as i32 - raster.get(p2.0, p2.1, band) as i32).unsigned_abs()
    }
}

/// The two corners of the 2x2 block spanned by a diagonal edge that are
/// *not* the edge's own start/end.
fn diagonal_perpendicular_pixels(x: u32, y: u32, dir: Direction) -> ((u32, u32), (u32, u32)) {
    match dir.code() {
        1 => ((x + 1, y), (x, y + 1)),     // northeast
        3 => ((x - 1, y), (x, y + 1)),     // northwest
        5 => ((x - 1, y), (x, y - 1)),     // southwest
        7 => ((x + 1, y), (x, y - 1)),     // southeast
        other => unreachable!("direction code {other} is not diagonal"),
    }
}

/// Weighs edges by the cross gradient of a single luminance band, averaged
/// from all of the source raster's bands.
pub struct CrossGradMono {
    gray: Raster,
}

impl CrossGradMono {
    #[must_use]
    pub fn new(raster: &Raster) -> Self {
        Self {
            gray: raster.to_grayscale(),
        }
    }
}

impl Weigher for CrossGradMono {
    fn weight(&self, edge: &GridEdge) -> u32 {
        let ceiling = grad_ceiling(edge.dir);
        let grad = cross_grad(&self.gray, edge.start_point.x, edge.start_point.y, 0, edge.dir);
        debug_assert!(grad <= ceiling, "cross gradient exceeded its ceiling");
        ceiling - grad.min(ceiling)
    }
}

/// Weighs edges by the largest per-band cross gradient, so a boundary
/// visible in any single color channel lowers the edge's cost.
pub struct ColoredWeight {
    raster: Raster,
}

impl ColoredWeight {
    #[must_use]
    pub fn new(raster: &Raster) -> Self {
        Self {
            raster: raster.clone(),
        }
    }
}

impl Weigher for ColoredWeight {
    fn weight(&self, edge: &GridEdge) -> u32 {
        let ceiling = grad_ceiling(edge.dir);
        let grad = (0..self.raster.band_count())
            .map(|band| {
                cross_grad(
                    &self.raster,
                    edge.start_point.x,
                    edge.start_point.y,
                    band,
                    edge.dir,
                )
            })
            .max()
            .unwrap_or(0);
        debug_assert!(grad <= ceiling, "cross gradient exceeded its ceiling");
        ceiling - grad.min(ceiling)
    }
}

/// Adapts a [`Grid`] plus a [`Weigher`] into the [`Graph`] the shortest-paths
/// engine searches.
pub struct WeightedGrid<'g, 'w> {
    grid: &'g Grid,
    weigher: &'w dyn Weigher,
}

impl<'g, 'w> WeightedGrid<'g, 'w> {
    #[must_use]
    pub fn new(grid: &'g Grid, weigher: &'w dyn Weigher) -> Self {
        Self { grid, weigher }
    }
}

impl Graph for WeightedGrid<'_, '_> {
    fn vertex_count(&self) -> u32 {
        self.grid.vertex_count()
    }

    fn out_edges(&self, id: u32) -> Vec<WeightedEdge> {
        self.grid
            .edges(id)
            .into_iter()
            .map(|e| WeightedEdge {
                end: e.end,
                weight: self.weigher.weight(&e),
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use bevy_math::UVec2;

    fn checkerboard(width: u32, height: u32) -> Raster {
        let mut bands = vec![vec![0u8; (width * height) as usize]];
        for y in 0..height {
            for x in 0..width {
                bands[0][(x + width * y) as usize] = if (x + y) % 2 == 0 { 255 } else { 0 };
            }
        }
        unsafe_raster(width, height, bands)
    }

    // Test-only constructor mirroring Raster's private layout, since Raster
    // has no public non-image constructor.
    fn unsafe_raster(width: u32, height: u32, bands: Vec<Vec<u8>>) -> Raster {
        use image::{DynamicImage, RgbImage};
        let mut img = RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = bands[0][(x + width * y) as usize];
                img.put_pixel(x, y, image::Rgb([v, v, v]));
            }
        }
        Raster::from_dynamic_image(&DynamicImage::ImageRgb8(img))
    }

    #[test]
    fn border_edges_use_border_weight() {
        let raster = checkerboard(4, 4);
        let grid = Grid::new(4, 4);
        let weigher = CrossGradMono::new(&raster);
        let edges = grid.edges(grid.id(UVec2::new(1, 0)));
        let east = edges.iter().find(|e| e.dir == Direction::EAST).unwrap();
        assert_eq!(weigher.weight(east), 180 - BORDER_WEIGHT);
    }

    #[test]
    fn weights_are_never_negative() {
        let raster = checkerboard(6, 6);
        let grid = Grid::new(6, 6);
        let mono = CrossGradMono::new(&raster);
        let color = ColoredWeight::new(&raster);
        for id in 0..grid.vertex_count() {
            for edge in grid.edges(id) {
                // u32 itself cannot go negative; this documents the
                // invariant that subtraction in `weight` never underflows
                // (checked via ceiling >= grad in debug builds).
                let _ = mono.weight(&edge);
                let _ = color.weight(&edge);
            }
        }
    }

    #[test]
    fn unknown_weigher_name_is_an_error() {
        let raster = checkerboard(2, 2);
        assert!(make_weigher("NoSuchWeigher", &raster).is_err());
    }

    #[test]
    fn make_weigher_accepts_every_listed_name() {
        let raster = checkerboard(2, 2);
        for name in weigher_names() {
            assert!(make_weigher(name, &raster).is_ok());
        }
    }
}
