use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while fitting ratio statistics or running proposals
#[derive(Error, Debug)]
pub enum DetectionError {
    /// An image in the training set has no label file next to it
    #[error("no label file for image {}: expected {}", .image.display(), .expected.display())]
    MissingLabelFile { image: PathBuf, expected: PathBuf },

    /// A label line does not hold five finite numbers with a positive height
    #[error("malformed annotation at {}:{line}: {reason}", .path.display())]
    MalformedAnnotation {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// The training set produced no annotation at all
    #[error("training set {} contains no annotations", .images_dir.display())]
    EmptyTrainingSet { images_dir: PathBuf },

    /// Blur or edge detection settings that cannot be applied
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// `predict` was called before the classifier had statistics
    #[error("classifier has not been fitted")]
    NotFitted,

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write debug image: {0}")]
    Image(#[from] image::ImageError),

    #[error("debug directory is not empty: {}", .0.display())]
    DebugDirNotEmpty(PathBuf),
}

impl DetectionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DetectionError>;
