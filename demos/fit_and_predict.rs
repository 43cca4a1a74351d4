use image::ImageReader;
use rectprop::{EdgeParams, ProposalStrategy, RegionProposalClassifier, TrainingSet};
use std::path::PathBuf;

/// Fit both strategies on `<root>/train/{images,labels}` and report the
/// detections for every image in `<root>/test/images`.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let root = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "dataset".to_string()));
    let train = TrainingSet::new(root.join("train/images"), root.join("train/labels"));
    let test = TrainingSet::new(root.join("test/images"), root.join("test/labels"));

    let stats = rectprop::fit(&train)?;
    println!(
        "Fitted {} annotations: height {:.3}..{:.3}, ratio {:.3}..{:.3}",
        stats.annotation_count,
        stats.height_range.min,
        stats.height_range.max,
        stats.size_ratio_range.min,
        stats.size_ratio_range.max
    );

    for strategy in [ProposalStrategy::Threshold, ProposalStrategy::Edge(EdgeParams::default())] {
        let classifier = RegionProposalClassifier::from_strategy(&strategy).with_statistics(stats);
        println!("\n=== {} ===", classifier.proposer_name());

        for path in test.image_files()? {
            let img = ImageReader::open(&path)?
                .decode()
                .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

            let detections = classifier.predict(&img)?;
            println!("{}: {} detections", path.display(), detections.len());
            for d in &detections {
                println!(
                    "  center=({:.3}, {:.3}) size={:.3}x{:.3}",
                    d.center_x, d.center_y, d.width, d.height
                );
            }
        }
    }

    Ok(())
}
