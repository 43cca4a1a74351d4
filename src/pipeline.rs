use image::{DynamicImage, GrayImage};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::detection::preprocessing;
use crate::error::{DetectionError, Result};

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// Context available to all pipeline steps
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// A single grayscale transform in a proposal pipeline
pub trait PipelineStep: Send + Sync {
    fn process(&self, image: GrayImage, context: &PipelineContext) -> Result<GrayImage>;

    /// Human-readable name, also used for debug directory names
    fn name(&self) -> &str;
}

/// Binarize with Otsu's global threshold, bright pixels become foreground
pub struct OtsuThresholdStep;

impl PipelineStep for OtsuThresholdStep {
    fn process(&self, image: GrayImage, _context: &PipelineContext) -> Result<GrayImage> {
        Ok(preprocessing::binarize_otsu(&image))
    }

    fn name(&self) -> &str {
        "Otsu Threshold"
    }
}

/// Separable Gaussian blur with a `size`-tap kernel.
/// A non-positive `sigma` derives it from the size.
pub struct BlurStep {
    pub size: usize,
    pub sigma: f32,
}

impl PipelineStep for BlurStep {
    fn process(&self, image: GrayImage, _context: &PipelineContext) -> Result<GrayImage> {
        let kernel = preprocessing::gaussian_kernel(self.size, self.sigma)?;
        Ok(preprocessing::apply_blur(&image, &kernel))
    }

    fn name(&self) -> &str {
        "Gaussian Blur"
    }
}

/// Linear contrast adjustment, saturated to the u8 range
pub struct ContrastStep {
    pub contrast: f32,
    pub brightness: f32,
}

impl PipelineStep for ContrastStep {
    fn process(&self, image: GrayImage, _context: &PipelineContext) -> Result<GrayImage> {
        Ok(preprocessing::adjust_contrast(&image, self.contrast, self.brightness))
    }

    fn name(&self) -> &str {
        "Contrast Adjustment"
    }
}

/// Detect edges using Canny
pub struct EdgeDetectionStep {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl PipelineStep for EdgeDetectionStep {
    fn process(&self, image: GrayImage, _context: &PipelineContext) -> Result<GrayImage> {
        preprocessing::detect_edges(&image, self.low_threshold, self.high_threshold)
    }

    fn name(&self) -> &str {
        "Edge Detection"
    }
}

/// Composable grayscale pipeline: converts the input to grayscale, then
/// runs each step in order
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
    runs: AtomicUsize,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
            runs: AtomicUsize::new(0),
        }
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Enable debug mode with output directory.
    /// The directory must be empty or non-existent.
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        self.set_debug(output_dir)?;
        Ok(self)
    }

    /// In-place form of [`Pipeline::with_debug`]; leaves the pipeline
    /// unchanged on error
    pub fn set_debug(&mut self, output_dir: PathBuf) -> Result<()> {
        prepare_debug_dir(&output_dir)?;
        self.context.debug = Some(DebugConfig { output_dir });
        Ok(())
    }

    pub fn debug_dir(&self) -> Option<&std::path::Path> {
        self.context.debug.as_ref().map(|d| d.output_dir.as_path())
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step on `input` and return the final mask
    pub fn run(&self, input: &DynamicImage) -> Result<GrayImage> {
        let run_id = self.runs.fetch_add(1, Ordering::Relaxed) + 1;

        let mut image = preprocessing::to_grayscale(input);
        self.save_debug_output(run_id, 0, "input", &image)?;

        for (step_idx, step) in self.steps.iter().enumerate() {
            tracing::debug!("running step: {}", step.name());
            image = step.process(image, &self.context)?;
            self.save_debug_output(run_id, step_idx + 1, step.name(), &image)?;
        }

        Ok(image)
    }

    fn save_debug_output(
        &self,
        run_id: usize,
        step_idx: usize,
        step_name: &str,
        image: &GrayImage,
    ) -> Result<()> {
        let Some(debug_config) = &self.context.debug else {
            return Ok(());
        };

        let step_dir_name = format!(
            "{:02}_{}",
            step_idx,
            step_name.to_lowercase().replace(' ', "_")
        );
        let step_dir = debug_config.output_dir.join(&step_dir_name);
        std::fs::create_dir_all(&step_dir).map_err(|e| DetectionError::io(&step_dir, e))?;

        let filename = format!("{:02}.png", run_id);
        image.save(step_dir.join(&filename))?;
        tracing::debug!("saved debug image {}/{}", step_dir_name, filename);

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn prepare_debug_dir(output_dir: &std::path::Path) -> Result<()> {
    if output_dir.exists() {
        let mut entries =
            std::fs::read_dir(output_dir).map_err(|e| DetectionError::io(output_dir, e))?;
        if entries.next().is_some() {
            return Err(DetectionError::DebugDirNotEmpty(output_dir.to_path_buf()));
        }
    } else {
        std::fs::create_dir_all(output_dir).map_err(|e| DetectionError::io(output_dir, e))?;
    }
    Ok(())
}
