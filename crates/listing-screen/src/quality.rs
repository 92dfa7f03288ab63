//! Image quality scoring for listing photos
//!
//! Turns pixel statistics and basic file metadata into a 0-100 score, a letter
//! grade and paired issue/suggestion lists. Scoring is an additive point
//! system starting at 50, so every point in the final score can be traced to a
//! single rule below.

use pixel_stats::{DecodedImage, PixelBuffer, PixelStatistics};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub const BASE_SCORE: i32 = 50;
pub const MAX_SCORE: u8 = 100;

/// Files above 3 MiB are penalised and flagged
pub const LARGE_FILE_BYTES: u64 = 3 * 1024 * 1024;

/// Minimum width for a main-photo recommendation
pub const MAIN_IMAGE_MIN_WIDTH: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 90 => Grade::A,
            s if s >= 80 => Grade::B,
            s if s >= 70 => Grade::C,
            s if s >= 60 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

/// A detected defect. Each variant carries its own suggestion so the two
/// output lists can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssue {
    LowResolution,
    TooDark,
    TooBright,
    Flat,
    Blurry,
    FileTooLarge,
    /// Upstream decoding failed; nothing could be measured
    Unreadable,
}

impl QualityIssue {
    pub fn tag(&self) -> &'static str {
        match self {
            QualityIssue::LowResolution => "low resolution",
            QualityIssue::TooDark => "too dark",
            QualityIssue::TooBright => "too bright",
            QualityIssue::Flat => "image too flat",
            QualityIssue::Blurry => "image blurry",
            QualityIssue::FileTooLarge => "file too large",
            QualityIssue::Unreadable => "cannot analyze image",
        }
    }

    pub fn suggestion(&self) -> &'static str {
        match self {
            QualityIssue::LowResolution => "use at least 1000×1000",
            QualityIssue::TooDark => "add light or shoot in brighter location",
            QualityIssue::TooBright => "reduce light / avoid direct glare",
            QualityIssue::Flat => "increase contrast",
            QualityIssue::Blurry => "focus properly or stabilize camera",
            QualityIssue::FileTooLarge => "compress below 3MB",
            QualityIssue::Unreadable => "try another image",
        }
    }
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Coarse scene cues derived from brightness and contrast alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneHint {
    ClearSubject,
    BrightBackground,
    DarkBackground,
}

impl SceneHint {
    pub fn detect(brightness: f64, contrast: f64) -> Vec<SceneHint> {
        let mut hints = Vec::new();
        if contrast > 40.0 {
            hints.push(SceneHint::ClearSubject);
        }
        if brightness > 150.0 {
            hints.push(SceneHint::BrightBackground);
        } else if brightness < 100.0 {
            hints.push(SceneHint::DarkBackground);
        }
        hints
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
    Square,
}

impl Orientation {
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if height == 0 {
            return Orientation::Square;
        }
        let ratio = width as f64 / height as f64;
        if (ratio - 1.0).abs() < 0.1 {
            Orientation::Square
        } else if ratio > 1.0 {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysisResult {
    /// Overall quality score (0 - 100)
    pub score: u8,
    pub grade: Grade,
    pub width: u32,
    pub height: u32,
    /// Mean brightness (0.0 - 255.0)
    pub brightness: f64,
    pub contrast: f64,
    pub sharpness: f64,
    pub file_size_bytes: u64,
    /// Defect tags in detection order
    pub issues: Vec<String>,
    /// One suggestion per entry in `issues`
    pub suggestions: Vec<String>,
    pub scene_hints: Vec<SceneHint>,
    pub is_main_image_candidate: bool,
}

impl ImageAnalysisResult {
    /// Sentinel for an image that could not be decoded
    pub fn unreadable(file_size_bytes: u64) -> Self {
        let (issues, suggestions) = split_issues(&[QualityIssue::Unreadable]);
        Self {
            score: 0,
            grade: Grade::F,
            width: 0,
            height: 0,
            brightness: 0.0,
            contrast: 0.0,
            sharpness: 0.0,
            file_size_bytes,
            issues,
            suggestions,
            scene_hints: Vec::new(),
            is_main_image_candidate: false,
        }
    }

    pub fn is_unreadable(&self) -> bool {
        self.issues.iter().any(|issue| issue == QualityIssue::Unreadable.tag())
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_dimensions(self.width, self.height)
    }

    /// Human-readable quality category
    pub fn quality_category(&self) -> &'static str {
        match self.grade {
            Grade::A => "Excellent",
            Grade::B => "Good",
            Grade::C => "Fair",
            Grade::D => "Poor",
            Grade::F => "Retake Needed",
        }
    }
}

fn split_issues(issues: &[QualityIssue]) -> (Vec<String>, Vec<String>) {
    issues
        .iter()
        .map(|issue| (issue.tag().to_string(), issue.suggestion().to_string()))
        .unzip()
}

fn resolution_points(width: u32, height: u32) -> i32 {
    match (width, height) {
        (w, h) if w >= 1000 && h >= 1000 => 20,
        (w, h) if w >= 800 && h >= 800 => 15,
        (w, h) if w >= 600 && h >= 600 => 10,
        _ => 0,
    }
}

fn brightness_points(brightness: f64) -> i32 {
    match brightness {
        b if (100.0..=180.0).contains(&b) => 15,
        b if (80.0..=200.0).contains(&b) => 10,
        b if (60.0..=220.0).contains(&b) => 5,
        _ => 0,
    }
}

fn contrast_points(contrast: f64) -> i32 {
    match contrast {
        c if c >= 40.0 => 10,
        c if c >= 30.0 => 5,
        _ => 0,
    }
}

fn sharpness_points(sharpness: f64) -> i32 {
    if sharpness >= 30.0 {
        5
    } else {
        0
    }
}

fn file_size_points(file_size_bytes: u64) -> i32 {
    if file_size_bytes > LARGE_FILE_BYTES {
        -5
    } else {
        0
    }
}

fn detect_issues(stats: &PixelStatistics, width: u32, height: u32, file_size_bytes: u64) -> Vec<QualityIssue> {
    let mut issues = Vec::new();

    if width < 800 || height < 800 {
        issues.push(QualityIssue::LowResolution);
    }

    if stats.brightness < 80.0 {
        issues.push(QualityIssue::TooDark);
    } else if stats.brightness > 200.0 {
        issues.push(QualityIssue::TooBright);
    }

    if stats.contrast < 30.0 {
        issues.push(QualityIssue::Flat);
    }

    if stats.sharpness < 20.0 {
        issues.push(QualityIssue::Blurry);
    }

    if file_size_bytes > LARGE_FILE_BYTES {
        issues.push(QualityIssue::FileTooLarge);
    }

    issues
}

/// Stateless scorer; every call builds a fresh result
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityScorer;

impl QualityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score already-computed statistics against the given dimensions
    pub fn score(
        &self,
        stats: PixelStatistics,
        width: u32,
        height: u32,
        file_size_bytes: u64,
    ) -> ImageAnalysisResult {
        let raw = BASE_SCORE
            + resolution_points(width, height)
            + brightness_points(stats.brightness)
            + contrast_points(stats.contrast)
            + sharpness_points(stats.sharpness)
            + file_size_points(file_size_bytes);
        let score = raw.clamp(0, MAX_SCORE as i32) as u8;

        let (issues, suggestions) = split_issues(&detect_issues(&stats, width, height, file_size_bytes));

        let is_main_image_candidate = score >= 80
            && (100.0..=180.0).contains(&stats.brightness)
            && stats.contrast >= 35.0
            && width >= MAIN_IMAGE_MIN_WIDTH;

        ImageAnalysisResult {
            score,
            grade: Grade::from_score(score),
            width,
            height,
            brightness: stats.brightness,
            contrast: stats.contrast,
            sharpness: stats.sharpness,
            file_size_bytes,
            issues,
            suggestions,
            scene_hints: SceneHint::detect(stats.brightness, stats.contrast),
            is_main_image_candidate,
        }
    }

    /// Measure and score a buffer at its own dimensions
    pub fn analyze_image(&self, buffer: &PixelBuffer<'_>, file_size_bytes: u64) -> ImageAnalysisResult {
        let stats = PixelStatistics::compute(buffer);
        let result = self.score(stats, buffer.width(), buffer.height(), file_size_bytes);
        debug!(
            width = result.width,
            height = result.height,
            score = result.score,
            grade = %result.grade,
            "scored image"
        );
        result
    }

    /// Measure the (possibly downscaled) raster, score against the original size
    pub fn analyze_decoded(&self, decoded: &DecodedImage, file_size_bytes: u64) -> ImageAnalysisResult {
        let stats = PixelStatistics::compute(&decoded.buffer());
        let result = self.score(stats, decoded.original_width, decoded.original_height, file_size_bytes);
        debug!(
            width = result.width,
            height = result.height,
            analysed_width = decoded.rgba.width(),
            analysed_height = decoded.rgba.height(),
            score = result.score,
            grade = %result.grade,
            "scored decoded image"
        );
        result
    }
}
