//! Photo pre-screening library for marketplace listings
//!
//! This crate scores listing photos for quality, flags likely screen captures
//! and aggregates a batch into seller-facing feedback: best main photo, tips
//! and a price multiplier hint.

pub mod batch;
pub mod config;
pub mod input;
pub mod quality;
pub mod screenshot;

pub use batch::{
    average_score, find_best_main_image, find_possible_duplicates, generate_overall_tips,
    predict_price_multiplier, BatchAnalyzer, BatchReport, DuplicatePair,
};
pub use config::{AnalysisConfig, ConfigError};
pub use input::ImageInput;
pub use quality::{Grade, ImageAnalysisResult, Orientation, QualityIssue, QualityScorer, SceneHint};
pub use screenshot::{ScreenshotClassifier, ScreenshotDetectionResult, ScreenshotSignal, SignalOutcome};

pub use pixel_stats::{PixelBuffer, PixelStatistics};

/// Score one already-decoded image
pub fn analyze_image(buffer: &PixelBuffer<'_>, file_size_bytes: u64) -> ImageAnalysisResult {
    QualityScorer::new().analyze_image(buffer, file_size_bytes)
}

/// Analyse an ordered batch with the default configuration
pub fn analyze_images(images: &[ImageInput]) -> BatchReport {
    BatchAnalyzer::default().analyze(images)
}

pub fn detect_screenshot(buffer: &PixelBuffer<'_>, filename: &str) -> ScreenshotDetectionResult {
    ScreenshotClassifier::new().detect(buffer, filename)
}
