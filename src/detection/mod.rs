pub mod canny;
pub mod contours;
pub mod filter;
pub mod preprocessing;
pub mod proposal;

use image::{DynamicImage, GenericImageView};
use std::path::PathBuf;

use crate::error::{DetectionError, Result};
use crate::models::{Detection, RatioStatistics};
use crate::training::{self, TrainingSet};
use proposal::{ProposalStrategy, RegionProposer};

/// Region proposals filtered by ratio statistics learned from a training set
pub struct RegionProposalClassifier {
    proposer: Box<dyn RegionProposer>,
    stats: Option<RatioStatistics>,
}

impl RegionProposalClassifier {
    /// Unfitted classifier around any proposer
    pub fn new(proposer: Box<dyn RegionProposer>) -> Self {
        Self {
            proposer,
            stats: None,
        }
    }

    pub fn from_strategy(strategy: &ProposalStrategy) -> Self {
        Self::new(strategy.build())
    }

    /// Use statistics fitted elsewhere
    pub fn with_statistics(mut self, stats: RatioStatistics) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Save every intermediate mask under `output_dir`.
    /// The directory must be empty or non-existent.
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        self.proposer.enable_debug(output_dir)?;
        Ok(self)
    }

    /// Learn acceptance ranges from `training_set`. On error the classifier
    /// keeps whatever statistics it had before.
    pub fn fit(&mut self, training_set: &TrainingSet) -> Result<RatioStatistics> {
        let stats = training::fit(training_set)?;
        self.stats = Some(stats);
        Ok(stats)
    }

    pub fn statistics(&self) -> Option<&RatioStatistics> {
        self.stats.as_ref()
    }

    pub fn is_fitted(&self) -> bool {
        self.stats.is_some()
    }

    pub fn proposer_name(&self) -> &str {
        self.proposer.name()
    }

    /// Propose regions in `image` and keep those whose normalized height
    /// and aspect ratio fall inside the fitted ranges
    pub fn predict(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let stats = self.stats.as_ref().ok_or(DetectionError::NotFitted)?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Ok(Vec::new());
        }

        let regions = self.proposer.propose(image)?;
        tracing::debug!("{}: {} regions proposed", self.proposer.name(), regions.len());

        let detections = filter::filter_regions(&regions, stats, width, height);
        tracing::info!(
            "{} detections from {} regions",
            detections.len(),
            regions.len()
        );

        Ok(detections)
    }
}
