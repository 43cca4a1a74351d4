pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod training;

pub use detection::RegionProposalClassifier;
pub use detection::proposal::{
    EdgeParams, EdgeSegmentation, ProposalStrategy, RegionProposer, ThresholdSegmentation,
};
pub use error::{DetectionError, Result};
pub use models::{Annotation, Detection, PixelBox, Polygon, RatioStatistics, ValueRange};
pub use pipeline::{Pipeline, PipelineContext, PipelineStep};
pub use training::{TrainingSet, fit};
