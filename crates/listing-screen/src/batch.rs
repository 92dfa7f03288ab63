//! Batch analysis across a listing's photos
//!
//! Each image is scored and classified independently, then the per-image
//! results are folded into a report: best main photo, ranking, aggregate tips
//! and a price multiplier hint.

use pixel_stats::PixelBuffer;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::input::ImageInput;
use crate::quality::{ImageAnalysisResult, QualityScorer};
use crate::screenshot::{ScreenshotClassifier, ScreenshotDetectionResult};

/// Listings with fewer photos than this get an "add more" tip
pub const RECOMMENDED_PHOTO_COUNT: usize = 3;

/// Appeal gain quoted per missing photo, in percent
const APPEAL_GAIN_PER_PHOTO: usize = 18;

/// Same dimensions and sizes closer than this are flagged as possible duplicates
const DUPLICATE_SIZE_TOLERANCE_BYTES: f64 = 0.01 * 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatePair {
    /// Index of the earlier image
    pub original: usize,
    /// Index of the later image that may repeat it
    pub duplicate: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Per-image results, in input order
    pub per_image: Vec<ImageAnalysisResult>,
    /// Screenshot verdicts, parallel to `per_image`
    pub screenshots: Vec<ScreenshotDetectionResult>,
    pub best_main_image_index: usize,
    /// Indices ordered by score, best first; ties keep input order
    pub ranking: Vec<usize>,
    pub tips: Vec<String>,
    pub price_multiplier: f64,
    pub average_score: f64,
    pub best_score: u8,
    pub worst_score: u8,
    pub possible_duplicates: Vec<DuplicatePair>,
}

impl BatchReport {
    /// Build a report from already-computed per-image results
    pub fn from_results(
        per_image: Vec<ImageAnalysisResult>,
        screenshots: Vec<ScreenshotDetectionResult>,
    ) -> Self {
        let average = average_score(&per_image);
        let best_main_image_index = find_best_main_image(&per_image);

        let mut ranking: Vec<usize> = (0..per_image.len()).collect();
        ranking.sort_by(|&a, &b| per_image[b].score.cmp(&per_image[a].score));

        Self {
            tips: generate_overall_tips(&per_image),
            price_multiplier: predict_price_multiplier(average),
            average_score: average,
            best_score: per_image.iter().map(|r| r.score).max().unwrap_or(0),
            worst_score: per_image.iter().map(|r| r.score).min().unwrap_or(0),
            possible_duplicates: find_possible_duplicates(&per_image),
            best_main_image_index,
            ranking,
            per_image,
            screenshots,
        }
    }

    pub fn best_main_image(&self) -> Option<&ImageAnalysisResult> {
        self.per_image.get(self.best_main_image_index)
    }

    pub fn unreadable_count(&self) -> usize {
        self.per_image.iter().filter(|r| r.is_unreadable()).count()
    }

    pub fn screenshot_count(&self) -> usize {
        self.screenshots.iter().filter(|s| s.is_screenshot).count()
    }

    pub fn len(&self) -> usize {
        self.per_image.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_image.is_empty()
    }
}

pub struct BatchAnalyzer {
    config: AnalysisConfig,
    scorer: QualityScorer,
    classifier: ScreenshotClassifier,
}

impl BatchAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            scorer: QualityScorer::new(),
            classifier: ScreenshotClassifier::new(),
        }
    }

    /// Score and classify one input; unreadable inputs get the sentinel and a
    /// filename-only screenshot check
    pub fn analyze_one(&self, input: &ImageInput) -> (ImageAnalysisResult, ScreenshotDetectionResult) {
        match &input.pixels {
            Some(decoded) => (
                self.scorer.analyze_decoded(decoded, input.file_size_bytes),
                self.classifier.detect_decoded(decoded, &input.filename),
            ),
            None => (
                ImageAnalysisResult::unreadable(input.file_size_bytes),
                self.classifier.detect(&PixelBuffer::empty(), &input.filename),
            ),
        }
    }

    /// Analyse every input and aggregate; output order always matches input order
    pub fn analyze(&self, images: &[ImageInput]) -> BatchReport {
        self.fold(images, |input| self.analyze_one(input))
    }

    /// Decode, analyse and drop each file inside the per-image task, so only
    /// in-flight rasters are held in memory
    pub fn analyze_paths<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> BatchReport {
        self.fold(paths, |path| {
            let input = ImageInput::from_file(path, &self.config);
            self.analyze_one(&input)
        })
    }

    fn fold<T, F>(&self, items: &[T], analyze: F) -> BatchReport
    where
        T: Sync,
        F: Fn(&T) -> (ImageAnalysisResult, ScreenshotDetectionResult) + Sync,
    {
        let pairs: Vec<(ImageAnalysisResult, ScreenshotDetectionResult)> = if self.config.parallel {
            items.par_iter().map(&analyze).collect()
        } else {
            items.iter().map(&analyze).collect()
        };

        let (per_image, screenshots): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        let report = BatchReport::from_results(per_image, screenshots);

        info!(
            images = report.len(),
            average_score = %format!("{:.1}", report.average_score),
            best_index = report.best_main_image_index,
            screenshots = report.screenshot_count(),
            price_multiplier = %format!("{:.2}", report.price_multiplier),
            "batch analysed"
        );
        report
    }
}

impl Default for BatchAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

/// Mean score, 0.0 for an empty batch
pub fn average_score(results: &[ImageAnalysisResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.score as f64).sum::<f64>() / results.len() as f64
}

/// Index of the highest score; the earliest wins a tie, 0 for an empty batch
pub fn find_best_main_image(results: &[ImageAnalysisResult]) -> usize {
    let mut best_index = 0;
    let mut best_score = results.first().map(|r| r.score).unwrap_or(0);

    for (i, result) in results.iter().enumerate().skip(1) {
        if result.score > best_score {
            best_score = result.score;
            best_index = i;
        }
    }

    best_index
}

pub fn generate_overall_tips(results: &[ImageAnalysisResult]) -> Vec<String> {
    let mut tips = Vec::new();

    if results.len() < RECOMMENDED_PHOTO_COUNT {
        let missing = RECOMMENDED_PHOTO_COUNT - results.len();
        tips.push(format!(
            "add {} more photos, can improve appeal by {}%",
            missing,
            APPEAL_GAIN_PER_PHOTO * missing
        ));
    }

    let average = average_score(results);
    if average < 70.0 {
        tips.push("overall quality low, reshoot in bright focused conditions".to_string());
    } else if average < 85.0 {
        tips.push("quality good but improvable".to_string());
    } else {
        tips.push("quality excellent, ready to publish".to_string());
    }

    if results.iter().any(|r| r.width < 1000 || r.height < 1000) {
        tips.push("some images low-resolution, use ≥1000×1000".to_string());
    }

    if results.iter().any(|r| r.brightness < 100.0) {
        tips.push("some images too dark, add lighting".to_string());
    }

    let best = find_best_main_image(results);
    if best != 0 {
        tips.push(format!(
            "image at position {} would make a better main photo than the first",
            best + 1
        ));
    }

    tips
}

/// Price hint from the batch's average score; never a valuation
pub fn predict_price_multiplier(avg_score: f64) -> f64 {
    match avg_score {
        s if s >= 90.0 => 1.20,
        s if s >= 80.0 => 1.10,
        s if s >= 70.0 => 1.00,
        s if s >= 60.0 => 0.95,
        _ => 0.90,
    }
}

/// Pairs of readable images with equal dimensions and near-equal file sizes
pub fn find_possible_duplicates(results: &[ImageAnalysisResult]) -> Vec<DuplicatePair> {
    let mut pairs = Vec::new();

    for (i, first) in results.iter().enumerate() {
        if first.is_unreadable() {
            continue;
        }
        for (j, second) in results.iter().enumerate().skip(i + 1) {
            if second.is_unreadable() {
                continue;
            }
            let same_dimensions = first.width == second.width && first.height == second.height;
            let size_gap = (first.file_size_bytes as f64 - second.file_size_bytes as f64).abs();

            if same_dimensions && size_gap < DUPLICATE_SIZE_TOLERANCE_BYTES {
                pairs.push(DuplicatePair {
                    original: i,
                    duplicate: j,
                });
            }
        }
    }

    pairs
}
