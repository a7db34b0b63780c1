//! Rendering a finished selection out to a PNG: the polygon traced by its
//! segments, masked against the underlying image.

use std::io::Write;

use image::{ImageFormat, RgbaImage};

use crate::error::ScissorsError;
use crate::polyline::{Polyline, PolylineBuffer};
use crate::raster::Raster;

/// Concatenate segment polylines in order into the closed polygon they
/// trace, deduping only at the seams between segments (and at the final
/// seam back to the start) per [`PolylineBuffer::append_polyline`].
pub(crate) fn make_polygon(segments: &[Polyline]) -> Result<Polyline, ScissorsError> {
    if segments.is_empty() {
        return Err(ScissorsError::IllegalState(
            "cannot build a polygon from an empty selection",
        ));
    }
    let mut buf = PolylineBuffer::new();
    for segment in segments {
        buf.append_polyline(segment);
    }
    buf.append(segments[0].start().0, segments[0].start().1);
    buf.to_polyline()
}

/// Even-odd ray-casting point-in-polygon test, sampling at the pixel's
/// center so boundary pixels resolve consistently.
fn contains(polygon: &Polyline, x: i32, y: i32) -> bool {
    let px = f64::from(x) + 0.5;
    let py = f64::from(y) + 0.5;
    let n = polygon.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = polygon.point(i);
        let (xj, yj) = polygon.point(j);
        let (xi, yi, xj, yj) = (f64::from(xi), f64::from(yi), f64::from(xj), f64::from(yj));
        if (yi > py) != (yj > py) {
            let x_intersect = xi + (py - yi) / (yj - yi) * (xj - xi);
            if px < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Render `segments` over `raster` as a PNG: the output is the axis-aligned
/// bounding box of the polygon the segments trace, with pixels inside it
/// copied from `raster` and pixels outside left fully transparent.
pub(crate) fn save_selection<W: Write>(
    raster: &Raster,
    segments: &[Polyline],
    writer: W,
) -> Result<(), ScissorsError> {
    let polygon = make_polygon(segments)?;

    let (mut min_x, mut min_y) = (i32::MAX, i32::MAX);
    let (mut max_x, mut max_y) = (i32::MIN, i32::MIN);
    for (x, y) in polygon.points() {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    min_x = min_x.max(0);
    min_y = min_y.max(0);
    max_x = max_x.min(raster.width() as i32 - 1);
    max_y = max_y.min(raster.height() as i32 - 1);

    let width = (max_x - min_x + 1).max(0) as u32;
    let height = (max_y - min_y + 1).max(0) as u32;
    let mut out = RgbaImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let (src_x, src_y) = (min_x + x as i32, min_y + y as i32);
            let pixel = if contains(&polygon, src_x, src_y) {
                let [r, g, b] = raster.rgb(src_x as u32, src_y as u32);
                image::Rgba([r, g, b, 255])
            } else {
                image::Rgba([0, 0, 0, 0])
            };
            out.put_pixel(x, y, pixel);
        }
    }

    let mut writer = writer;
    out.write_to(&mut writer, ImageFormat::Png).map_err(|e| match e {
        image::ImageError::IoError(io_err) => ScissorsError::IoError(io_err),
        other => ScissorsError::EncodeError(other),
    })?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn square_segments() -> Vec<Polyline> {
        vec![
            Polyline::two_point((0, 0), (4, 0)),
            Polyline::two_point((4, 0), (4, 4)),
            Polyline::two_point((4, 4), (0, 4)),
            Polyline::two_point((0, 4), (0, 0)),
        ]
    }

    fn white_raster(width: u32, height: u32) -> Raster {
        let img = RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));
        Raster::from_dynamic_image(&DynamicImage::ImageRgb8(img))
    }

    #[test]
    fn make_polygon_dedups_only_at_seams() {
        let polygon = make_polygon(&square_segments()).unwrap();
        // 4 segments of 2 points each, joined at 4 seams, closing seam
        // included: 4 unique corners, the loop re-closes onto the first.
        assert_eq!(polygon.len(), 5);
        assert_eq!(polygon.start(), (0, 0));
        assert_eq!(polygon.end(), (0, 0));
    }

    #[test]
    fn make_polygon_rejects_an_empty_selection() {
        assert!(make_polygon(&[]).is_err());
    }

    #[test]
    fn contains_is_true_strictly_inside_and_false_outside() {
        let polygon = make_polygon(&square_segments()).unwrap();
        assert!(contains(&polygon, 2, 2));
        assert!(!contains(&polygon, 10, 10));
    }

    #[test]
    fn save_selection_produces_a_bounding_box_sized_png() {
        let raster = white_raster(10, 10);
        let mut buf = Vec::new();
        save_selection(&raster, &square_segments(), &mut buf).unwrap();
        let decoded = image::load_from_memory(&buf).unwrap();
        assert_eq!(decoded.width(), 5);
        assert_eq!(decoded.height(), 5);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn save_selection_surfaces_writer_failures_as_io_error() {
        let raster = white_raster(10, 10);
        let err = save_selection(&raster, &square_segments(), FailingWriter).unwrap_err();
        assert!(matches!(err, ScissorsError::IoError(_)));
    }

    #[test]
    fn save_selection_makes_outside_pixels_transparent() {
        let raster = white_raster(10, 10);
        let mut buf = Vec::new();
        save_selection(&raster, &square_segments(), &mut buf).unwrap();
        let decoded = image::load_from_memory(&buf).unwrap().to_rgba8();
        let corner = decoded.get_pixel(0, 0);
        assert_eq!(corner[3], 0);
        let center = decoded.get_pixel(2, 2);
        assert_eq!(center[3], 255);
    }
}
