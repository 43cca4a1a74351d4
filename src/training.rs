use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DetectionError, Result};
use crate::models::{Annotation, RatioStatistics};

const LABEL_EXTENSION: &str = "txt";
const FIELDS_PER_LINE: usize = 5;

/// Images directory plus a labels directory holding `<stem>.txt` per image
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
}

impl TrainingSet {
    pub fn new(images_dir: impl Into<PathBuf>, labels_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            labels_dir: labels_dir.into(),
        }
    }

    /// Regular files in the images directory, sorted by file name
    pub fn image_files(&self) -> Result<Vec<PathBuf>> {
        let entries =
            fs::read_dir(&self.images_dir).map_err(|e| DetectionError::io(&self.images_dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DetectionError::io(&self.images_dir, e))?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Where the label file for `image` is expected to live
    pub fn label_path(&self, image: &Path) -> PathBuf {
        let mut name = image.file_stem().unwrap_or(image.as_os_str()).to_os_string();
        name.push(".");
        name.push(LABEL_EXTENSION);
        self.labels_dir.join(name)
    }

    /// Read every annotation for every image, in image order
    pub fn annotations(&self) -> Result<Vec<Annotation>> {
        let mut annotations = Vec::new();
        for image in self.image_files()? {
            let label = self.label_path(&image);
            if !label.is_file() {
                return Err(DetectionError::MissingLabelFile {
                    image,
                    expected: label,
                });
            }
            annotations.extend(read_label_file(&label)?);
        }
        Ok(annotations)
    }
}

/// Parse a label file, one annotation per non-blank line
pub fn read_label_file(path: &Path) -> Result<Vec<Annotation>> {
    let contents = fs::read_to_string(path).map_err(|e| DetectionError::io(path, e))?;

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_annotation(line).map_err(|reason| DetectionError::MalformedAnnotation {
                path: path.to_path_buf(),
                line: idx + 1,
                reason,
            })
        })
        .collect()
}

/// Parse `class_id center_x center_y width height`
pub fn parse_annotation(line: &str) -> std::result::Result<Annotation, String> {
    let fields = line
        .split_whitespace()
        .map(|field| match field.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(format!("'{}' is not a finite number", field)),
        })
        .collect::<std::result::Result<Vec<f32>, String>>()?;

    let [class_id, center_x, center_y, width, height] = fields[..] else {
        return Err(format!(
            "expected {} fields, found {}",
            FIELDS_PER_LINE,
            fields.len()
        ));
    };

    // Zero height would make the size ratio infinite
    if height <= 0.0 {
        return Err(format!("height must be positive, got {}", height));
    }

    Ok(Annotation {
        class_id,
        center_x,
        center_y,
        width,
        height,
    })
}

/// Learn height and size-ratio ranges from a training set.
/// Nothing is returned unless every label parses.
pub fn fit(training_set: &TrainingSet) -> Result<RatioStatistics> {
    let annotations = training_set.annotations()?;

    let stats = RatioStatistics::from_annotations(&annotations).ok_or_else(|| {
        DetectionError::EmptyTrainingSet {
            images_dir: training_set.images_dir.clone(),
        }
    })?;

    tracing::info!(
        "fitted {} annotations: height [{:.4}, {:.4}], size ratio [{:.4}, {:.4}]",
        stats.annotation_count,
        stats.height_range.min,
        stats.height_range.max,
        stats.size_ratio_range.min,
        stats.size_ratio_range.max,
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_five_fields() {
        let a = parse_annotation("0 0.5 0.5 0.2 0.4").unwrap();
        assert_eq!(a.class_id, 0.0);
        assert_eq!(a.width, 0.2);
        assert_eq!(a.height, 0.4);
    }

    #[test]
    fn tolerates_extra_whitespace() {
        assert!(parse_annotation("  1\t0.1  0.2 0.3 0.4 ").is_ok());
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(parse_annotation("0 0.5 0.5 0.2").is_err());
        assert!(parse_annotation("0 0.5 0.5 0.2 0.4 0.9").is_err());
    }

    #[test]
    fn rejects_non_numeric_field() {
        let err = parse_annotation("0 0.5 abc 0.2 0.4").unwrap_err();
        assert!(err.contains("abc"));
        assert!(parse_annotation("0 0.5 0.5 0.2 NaN").is_err());
    }

    #[test]
    fn rejects_zero_height() {
        assert!(parse_annotation("0 0.5 0.5 0.2 0").is_err());
        assert!(parse_annotation("0 0.5 0.5 0.2 -0.1").is_err());
    }

    #[test]
    fn label_path_uses_stem() {
        let set = TrainingSet::new("imgs", "labels");
        assert_eq!(
            set.label_path(Path::new("imgs/frame_01.jpg")),
            PathBuf::from("labels/frame_01.txt")
        );
        assert_eq!(
            set.label_path(Path::new("imgs/scan.v2.png")),
            PathBuf::from("labels/scan.v2.txt")
        );
    }
}
