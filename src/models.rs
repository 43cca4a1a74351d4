use imageproc::point::Point;

/// A raw contour as traced from a binary mask
pub type Polygon = Vec<Point<i32>>;

/// One ground-truth object from a label file.
/// Everything except `class_id` is normalized to the image size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub class_id: f32,
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Annotation {
    /// Box width over box height
    pub fn size_ratio(&self) -> f32 {
        self.width / self.height
    }
}

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Tightest range covering every sample, `None` when there are none
    pub fn spanning(values: impl IntoIterator<Item = f32>) -> Option<Self> {
        values.into_iter().fold(None, |range, v| {
            Some(match range {
                None => ValueRange::new(v, v),
                Some(r) => ValueRange::new(r.min.min(v), r.max.max(v)),
            })
        })
    }

    /// Inclusive on both ends
    pub fn contains(&self, value: f32) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Acceptance ranges learned from a training set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioStatistics {
    /// Normalized box height
    pub height_range: ValueRange,
    /// Box width / box height
    pub size_ratio_range: ValueRange,
    /// Number of annotations the ranges were computed from
    pub annotation_count: usize,
}

impl RatioStatistics {
    /// Compute ranges over already-validated annotations.
    /// Returns `None` for an empty input.
    pub fn from_annotations<'a>(
        annotations: impl IntoIterator<Item = &'a Annotation>,
    ) -> Option<Self> {
        let mut heights = Vec::new();
        let mut ratios = Vec::new();
        for annotation in annotations {
            heights.push(annotation.height);
            ratios.push(annotation.size_ratio());
        }

        Some(Self {
            height_range: ValueRange::spanning(heights.iter().copied())?,
            size_ratio_range: ValueRange::spanning(ratios.iter().copied())?,
            annotation_count: heights.len(),
        })
    }

    /// Whether a box with this normalized height and aspect ratio passes
    pub fn accepts(&self, norm_height: f32, aspect_ratio: f32) -> bool {
        self.height_range.contains(norm_height) && self.size_ratio_range.contains(aspect_ratio)
    }
}

/// Axis-aligned bounds of a contour in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl PixelBox {
    /// Bounds of a point set, `None` if it is empty
    pub fn from_points(points: &[Point<i32>]) -> Option<Self> {
        let first = points.first()?;
        let init = PixelBox {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };

        Some(points.iter().skip(1).fold(init, |b, p| PixelBox {
            min_x: b.min_x.min(p.x),
            max_x: b.max_x.max(p.x),
            min_y: b.min_y.min(p.y),
            max_y: b.max_y.max(p.y),
        }))
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// A box with zero extent along either axis
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Width over height. Not finite for a zero-height box, so callers
    /// check `is_degenerate` first.
    pub fn aspect_ratio(&self) -> f32 {
        self.width() as f32 / self.height() as f32
    }
}

/// An accepted box, normalized to the source image like an `Annotation`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Detection {
    /// Normalize a pixel box against an image of `image_width` x `image_height`
    pub fn from_pixel_box(bbox: &PixelBox, image_width: u32, image_height: u32) -> Self {
        let w = image_width as f32;
        let h = image_height as f32;
        Self {
            center_x: (bbox.min_x + bbox.max_x) as f32 / (2.0 * w),
            center_y: (bbox.min_y + bbox.max_y) as f32 / (2.0 * h),
            width: bbox.width() as f32 / w,
            height: bbox.height() as f32 / h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanning_empty_is_none() {
        assert_eq!(ValueRange::spanning(std::iter::empty()), None);
    }

    #[test]
    fn spanning_is_tight() {
        let range = ValueRange::spanning([0.3, 0.1, 0.7]).unwrap();
        assert_eq!(range, ValueRange::new(0.1, 0.7));
        assert!(range.contains(0.1));
        assert!(range.contains(0.7));
        assert!(!range.contains(0.71));
    }

    #[test]
    fn pixel_box_from_points() {
        let points = [Point::new(40, 80), Point::new(60, 40), Point::new(50, 60)];
        let bbox = PixelBox::from_points(&points).unwrap();
        let expected = PixelBox {
            min_x: 40,
            max_x: 60,
            min_y: 40,
            max_y: 80,
        };
        assert_eq!(bbox, expected);
        assert_eq!(bbox.width(), 20);
        assert_eq!(bbox.height(), 40);
        assert_eq!(bbox.aspect_ratio(), 0.5);
        assert!(!bbox.is_degenerate());
        assert!(PixelBox::from_points(&[]).is_none());
    }

    #[test]
    fn detection_normalizes_box() {
        let bbox = PixelBox {
            min_x: 40,
            max_x: 60,
            min_y: 40,
            max_y: 80,
        };
        let det = Detection::from_pixel_box(&bbox, 100, 100);
        let expected = Detection {
            center_x: 0.5,
            center_y: 0.6,
            width: 0.2,
            height: 0.4,
        };
        assert_eq!(det, expected);
    }
}
