use crate::models::{Detection, PixelBox, Polygon, RatioStatistics};

/// Run one contour through the ratio filter.
/// Returns `None` for empty or degenerate contours and for boxes outside
/// the fitted ranges.
pub fn filter_region(
    polygon: &[imageproc::point::Point<i32>],
    stats: &RatioStatistics,
    image_width: u32,
    image_height: u32,
) -> Option<Detection> {
    let bbox = PixelBox::from_points(polygon)?;
    if bbox.is_degenerate() {
        return None;
    }

    let norm_height = bbox.height() as f32 / image_height as f32;
    let aspect_ratio = bbox.aspect_ratio();

    if !stats.accepts(norm_height, aspect_ratio) {
        tracing::trace!(
            "rejected box {:?}: height={:.4}, ratio={:.4}",
            bbox,
            norm_height,
            aspect_ratio
        );
        return None;
    }

    Some(Detection::from_pixel_box(&bbox, image_width, image_height))
}

/// Filter all proposed regions of one image
pub fn filter_regions(
    polygons: &[Polygon],
    stats: &RatioStatistics,
    image_width: u32,
    image_height: u32,
) -> Vec<Detection> {
    polygons
        .iter()
        .filter_map(|p| filter_region(p, stats, image_width, image_height))
        .collect()
}
