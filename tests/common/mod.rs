#![allow(dead_code)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from rectprop for tests
pub use rectprop::{
    Detection, DetectionError, EdgeParams, ProposalStrategy, RatioStatistics,
    RegionProposalClassifier, TrainingSet, ValueRange,
};
