pub mod svg;

use std::path::Path;

use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::geometry::RenderGeometry;
use crate::input::SigMfMeta;

pub use svg::{Image, Line, Rect, Shape, SvgDocument};

/// Raster opacity, low enough that overlay strokes stay legible on top.
pub const RASTER_OPACITY: f64 = 0.7;
pub const BOUNDARY_STYLE: &str = "stroke:#0000c6;stroke-width:3.0";
pub const ANNOTATION_STYLE: &str = "stroke:#bd0000; fill:#bd0000; fill-opacity:0.4";

/// Build the overlay for a waterfall raster: the raster itself at the bottom,
/// then capture boundaries, then annotation boxes.
///
/// Captures and annotations starting beyond the rendered sample count are
/// skipped. An annotation whose frequency span resolves to a non-positive
/// width fails the whole build.
pub fn build_overlay(
    meta: &SigMfMeta,
    geometry: &RenderGeometry,
    raster_href: &str,
) -> RenderResult<SvgDocument> {
    let mut doc = SvgDocument::new(geometry.pixel_width, geometry.pixel_height);
    let width = geometry.width();

    doc.push(Shape::Image(Image {
        width,
        height: geometry.height(),
        opacity: RASTER_OPACITY,
        href: raster_href.to_string(),
    }));

    // A line at the start of each capture segment except the first
    for segment in meta.captures.iter().skip(1) {
        let index_start = segment.sample_start;
        if index_start > geometry.sample_count {
            debug!(index_start, "capture boundary out of bounds, skipping");
            continue;
        }
        let y = geometry.sample_index_to_row(index_start);
        debug!(index_start, y, "drawing capture segment boundary");
        doc.push(Shape::Line(Line {
            x1: 0.0,
            y1: y,
            x2: width,
            y2: y,
            style: BOUNDARY_STYLE,
        }));
    }

    for (index, annotation) in meta.annotations.iter().enumerate() {
        let index_start = annotation.sample_start;
        if index_start > geometry.sample_count {
            debug!(index_start, "annotation out of bounds, skipping");
            continue;
        }

        let y = geometry.sample_index_to_row(index_start);
        // Same linear factor as positions, so this is the row span of the count.
        let h = geometry.sample_index_to_row(annotation.sample_count);

        let x = annotation
            .freq_lower_edge
            .map_or(0.0, |f| geometry.frequency_to_column(f));
        let x_end = annotation
            .freq_upper_edge
            .map_or(width, |f| geometry.frequency_to_column(f));
        let w = x_end - x;
        if w <= 0.0 || w.is_nan() {
            return Err(RenderError::InvalidAnnotation { index, width: w });
        }

        debug!(index_start, x, y, w, h, "drawing annotation box");
        doc.push(Shape::Rect(Rect {
            x,
            y,
            width: w,
            height: h,
            style: ANNOTATION_STYLE,
            title: annotation.label.clone(),
        }));
    }

    Ok(doc)
}

/// Write a finished overlay to disk in one shot.
pub fn write_overlay<P: AsRef<Path>>(path: P, doc: &SvgDocument) -> RenderResult<()> {
    std::fs::write(path, doc.to_string())?;
    Ok(())
}
