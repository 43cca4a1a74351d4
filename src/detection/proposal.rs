use image::DynamicImage;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::detection::contours;
use crate::error::Result;
use crate::models::Polygon;
use crate::pipeline::{BlurStep, ContrastStep, EdgeDetectionStep, OtsuThresholdStep, Pipeline};

/// Produces candidate regions for an image, before any ratio filtering
pub trait RegionProposer: Send + Sync {
    fn propose(&self, image: &DynamicImage) -> Result<Vec<Polygon>>;

    /// Human-readable name (used in log output)
    fn name(&self) -> &str;

    /// Dump intermediate masks into `output_dir` on every call to `propose`.
    /// Proposers without intermediate images ignore this.
    fn enable_debug(&mut self, _output_dir: PathBuf) -> Result<()> {
        Ok(())
    }
}

/// Otsu binarization followed by contour tracing
pub struct ThresholdSegmentation {
    pipeline: Pipeline,
}

impl ThresholdSegmentation {
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::new().add_step(Arc::new(OtsuThresholdStep)),
        }
    }
}

impl Default for ThresholdSegmentation {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionProposer for ThresholdSegmentation {
    fn propose(&self, image: &DynamicImage) -> Result<Vec<Polygon>> {
        let mask = self.pipeline.run(image)?;
        Ok(contours::find_contours(&mask))
    }

    fn name(&self) -> &str {
        "Threshold Segmentation"
    }

    fn enable_debug(&mut self, output_dir: PathBuf) -> Result<()> {
        self.pipeline.set_debug(output_dir)
    }
}

/// Tunables for edge-based segmentation
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeParams {
    /// Odd Gaussian kernel size
    pub blur_size: usize,
    /// Gaussian sigma, non-positive to derive it from `blur_size`
    pub blur_sigma: f32,
    pub contrast: f32,
    pub brightness: f32,
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            blur_size: 5,
            blur_sigma: 0.0,
            contrast: 2.0,
            brightness: 0.0,
            low_threshold: 50.0,
            high_threshold: 100.0,
        }
    }
}

/// Blur, contrast boost and Canny edges, then contour tracing on the edge map
pub struct EdgeSegmentation {
    params: EdgeParams,
    pipeline: Pipeline,
}

impl EdgeSegmentation {
    pub fn new(params: EdgeParams) -> Self {
        let pipeline = Pipeline::new()
            .add_step(Arc::new(BlurStep {
                size: params.blur_size,
                sigma: params.blur_sigma,
            }))
            .add_step(Arc::new(ContrastStep {
                contrast: params.contrast,
                brightness: params.brightness,
            }))
            .add_step(Arc::new(EdgeDetectionStep {
                low_threshold: params.low_threshold,
                high_threshold: params.high_threshold,
            }));

        Self { params, pipeline }
    }

    pub fn params(&self) -> &EdgeParams {
        &self.params
    }
}

impl Default for EdgeSegmentation {
    fn default() -> Self {
        Self::new(EdgeParams::default())
    }
}

impl RegionProposer for EdgeSegmentation {
    fn propose(&self, image: &DynamicImage) -> Result<Vec<Polygon>> {
        let edges = self.pipeline.run(image)?;
        Ok(contours::find_contours(&edges))
    }

    fn name(&self) -> &str {
        "Edge Segmentation"
    }

    fn enable_debug(&mut self, output_dir: PathBuf) -> Result<()> {
        self.pipeline.set_debug(output_dir)
    }
}

/// Which built-in proposer to use
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProposalStrategy {
    #[default]
    Threshold,
    Edge(EdgeParams),
}

impl ProposalStrategy {
    pub fn build(&self) -> Box<dyn RegionProposer> {
        match self {
            ProposalStrategy::Threshold => Box::new(ThresholdSegmentation::new()),
            ProposalStrategy::Edge(params) => Box::new(EdgeSegmentation::new(*params)),
        }
    }
}
