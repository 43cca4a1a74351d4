use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};
use imageproc::point::Point;
use rectprop::{Polygon, RegionProposer, TrainingSet};
use std::fs;
use tempfile::TempDir;

/// A training set in a temp directory. Keep the struct alive while the
/// set is in use.
pub struct TempTrainingSet {
    pub dir: TempDir,
    pub set: TrainingSet,
}

impl TempTrainingSet {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let images = dir.path().join("images");
        let labels = dir.path().join("labels");
        fs::create_dir_all(&images).expect("Failed to create images dir");
        fs::create_dir_all(&labels).expect("Failed to create labels dir");
        let set = TrainingSet::new(images, labels);
        Self { dir, set }
    }

    /// Add a small test image without a label file
    pub fn add_image(&self, file_name: &str) -> &Self {
        let img: RgbImage = ImageBuffer::from_fn(8, 8, |_, _| Rgb([255u8, 0u8, 0u8]));
        img.save_with_format(self.set.images_dir.join(file_name), image::ImageFormat::Png)
            .expect("Failed to save test image");
        self
    }

    /// Add an image plus a label file with the given contents
    pub fn add_labeled(&self, file_name: &str, labels: &str) -> &Self {
        self.add_image(file_name);
        let stem = std::path::Path::new(file_name)
            .file_stem()
            .expect("image name has a stem");
        let mut label_name = stem.to_os_string();
        label_name.push(".txt");
        fs::write(self.set.labels_dir.join(label_name), labels).expect("Failed to write labels");
        self
    }
}

/// Black RGB image with one filled bright rectangle, corners inclusive
pub fn image_with_rect(
    width: u32,
    height: u32,
    (min_x, max_x): (u32, u32),
    (min_y, max_y): (u32, u32),
) -> DynamicImage {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        if (min_x..=max_x).contains(&x) && (min_y..=max_y).contains(&y) {
            Rgb([230u8, 230u8, 230u8])
        } else {
            Rgb([15u8, 15u8, 15u8])
        }
    });
    DynamicImage::ImageRgb8(img)
}

/// Axis-aligned rectangle outline as a polygon
pub fn rect_polygon(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Polygon {
    vec![
        Point::new(min_x, min_y),
        Point::new(max_x, min_y),
        Point::new(max_x, max_y),
        Point::new(min_x, max_y),
    ]
}

/// Proposer that returns the same regions for every image
pub struct FixedProposer(pub Vec<Polygon>);

impl RegionProposer for FixedProposer {
    fn propose(&self, _image: &DynamicImage) -> rectprop::Result<Vec<Polygon>> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "Fixed"
    }
}

pub const SINGLE_ANNOTATION: &str = "0 0.5 0.5 0.2 0.4\n";
