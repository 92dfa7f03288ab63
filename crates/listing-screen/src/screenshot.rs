//! Screenshot / desktop-capture detection
//!
//! A fixed-weight additive classifier over five independent heuristics. Every
//! signal is always evaluated; the verdict, the confidence and the list of
//! reasons are all derived from the same evaluated signal list, so a positive
//! verdict can always be explained.

use pixel_stats::{DecodedImage, PixelBuffer, QuantizedColor, CHANNELS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Confidence at or above which an image is treated as a screenshot
pub const SCREENSHOT_THRESHOLD: u32 = 50;

const TOP_BAND_ROWS: u32 = 50;
const TOP_BAND_COLUMN_STRIDE: usize = 10;
const TOP_BAND_MAX_COLORS: usize = 5;

/// Exclusive `(low, high)` width/height ranges: 16:9, 16:10, 21:9
const DESKTOP_ASPECT_RANGES: [(f64, f64); 3] = [(1.6, 1.8), (1.55, 1.65), (2.2, 2.4)];

/// Byte stride over the flattened buffer (every 25th pixel)
const EDGE_BYTE_STRIDE: usize = 100;
const EDGE_DIFF_THRESHOLD: u32 = 100;
const EDGE_DENSITY_THRESHOLD: f64 = 0.15;

const FILENAME_PATTERNS: [&str; 8] = [
    "screenshot",
    "screen shot",
    "screen_shot",
    "capture",
    "snap",
    "desktop",
    "scr_",
    "img_202",
];

/// Byte stride over the flattened buffer (every 100th pixel)
const PALETTE_BYTE_STRIDE: usize = 400;
const PALETTE_MAX_COLORS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenshotSignal {
    /// Near-solid title/status bar across the top rows
    TopBand,
    /// Width/height matches a common monitor shape
    DesktopAspect,
    /// Dense hard transitions typical of rendered text and UI chrome
    EdgeDensity,
    /// Filename looks like an OS capture
    Filename,
    /// Too few distinct colours for a camera photo
    LimitedPalette,
}

impl ScreenshotSignal {
    /// Evaluation order; also the order of `reasons`
    pub const ALL: [ScreenshotSignal; 5] = [
        ScreenshotSignal::TopBand,
        ScreenshotSignal::DesktopAspect,
        ScreenshotSignal::EdgeDensity,
        ScreenshotSignal::Filename,
        ScreenshotSignal::LimitedPalette,
    ];

    pub fn weight(&self) -> u32 {
        match self {
            ScreenshotSignal::TopBand => 30,
            ScreenshotSignal::DesktopAspect => 20,
            ScreenshotSignal::EdgeDensity => 25,
            ScreenshotSignal::Filename => 15,
            ScreenshotSignal::LimitedPalette => 10,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            ScreenshotSignal::TopBand => "solid-color top bar detected",
            ScreenshotSignal::DesktopAspect => "desktop screen aspect ratio",
            ScreenshotSignal::EdgeDensity => "high edge density typical of text and UI",
            ScreenshotSignal::Filename => "filename matches a screenshot pattern",
            ScreenshotSignal::LimitedPalette => "limited color palette",
        }
    }

    fn evaluate(&self, buffer: &PixelBuffer<'_>, width: u32, height: u32, filename: &str) -> bool {
        match self {
            ScreenshotSignal::TopBand => has_uniform_top_band(buffer),
            ScreenshotSignal::DesktopAspect => is_desktop_aspect(width, height),
            ScreenshotSignal::EdgeDensity => has_dense_edges(buffer),
            ScreenshotSignal::Filename => filename_looks_captured(filename),
            ScreenshotSignal::LimitedPalette => has_limited_palette(buffer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalOutcome {
    pub signal: ScreenshotSignal,
    pub weight: u32,
    pub triggered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenshotDetectionResult {
    pub is_screenshot: bool,
    /// Sum of triggered signal weights
    pub confidence: u32,
    /// One entry per triggered signal, in evaluation order
    pub reasons: Vec<String>,
    pub signals: Vec<SignalOutcome>,
}

impl ScreenshotDetectionResult {
    /// Build a verdict from evaluated signals; weights always come from
    /// [`ScreenshotSignal::weight`]
    pub(crate) fn from_signals<I>(evaluated: I) -> Self
    where
        I: IntoIterator<Item = (ScreenshotSignal, bool)>,
    {
        let signals: Vec<SignalOutcome> = evaluated
            .into_iter()
            .map(|(signal, triggered)| SignalOutcome {
                signal,
                weight: signal.weight(),
                triggered,
            })
            .collect();

        let confidence: u32 = signals.iter().filter(|o| o.triggered).map(|o| o.weight).sum();
        debug_assert!(confidence <= 100, "signal weights sum past 100");

        let reasons = signals
            .iter()
            .filter(|o| o.triggered)
            .map(|o| o.signal.reason().to_string())
            .collect();

        Self {
            is_screenshot: confidence >= SCREENSHOT_THRESHOLD,
            confidence,
            reasons,
            signals,
        }
    }

    pub fn triggered(&self, signal: ScreenshotSignal) -> bool {
        self.signals.iter().any(|o| o.signal == signal && o.triggered)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenshotClassifier;

impl ScreenshotClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a buffer, using its own dimensions for the aspect check
    pub fn detect(&self, buffer: &PixelBuffer<'_>, filename: &str) -> ScreenshotDetectionResult {
        self.detect_with_dimensions(buffer, buffer.width(), buffer.height(), filename)
    }

    /// Classify a decoded image; the aspect check uses the pre-downscale size
    pub fn detect_decoded(&self, decoded: &DecodedImage, filename: &str) -> ScreenshotDetectionResult {
        self.detect_with_dimensions(
            &decoded.buffer(),
            decoded.original_width,
            decoded.original_height,
            filename,
        )
    }

    /// Classify with explicit dimensions for the aspect-ratio signal
    pub fn detect_with_dimensions(
        &self,
        buffer: &PixelBuffer<'_>,
        width: u32,
        height: u32,
        filename: &str,
    ) -> ScreenshotDetectionResult {
        let result = ScreenshotDetectionResult::from_signals(
            ScreenshotSignal::ALL
                .iter()
                .map(|signal| (*signal, signal.evaluate(buffer, width, height, filename))),
        );
        debug!(
            filename,
            confidence = result.confidence,
            is_screenshot = result.is_screenshot,
            "screenshot check"
        );
        result
    }
}

fn has_uniform_top_band(buffer: &PixelBuffer<'_>) -> bool {
    let rows = buffer.height().min(TOP_BAND_ROWS);
    let mut colors = HashSet::new();

    for y in 0..rows {
        for x in (0..buffer.width()).step_by(TOP_BAND_COLUMN_STRIDE) {
            let [r, g, b] = buffer.rgb_at(x, y);
            colors.insert(QuantizedColor::from_rgb(r, g, b));
        }
    }

    !colors.is_empty() && colors.len() < TOP_BAND_MAX_COLORS
}

fn is_desktop_aspect(width: u32, height: u32) -> bool {
    if height == 0 {
        return false;
    }
    let ratio = width as f64 / height as f64;
    DESKTOP_ASPECT_RANGES
        .iter()
        .any(|&(low, high)| ratio > low && ratio < high)
}

/// Each sample is compared with the sample one byte further on, i.e. R-G, G-B
/// and B-A of the same pixel rather than the neighbouring pixel.
fn has_dense_edges(buffer: &PixelBuffer<'_>) -> bool {
    let data = buffer.as_bytes();
    let mut samples = 0usize;
    let mut edges = 0usize;

    for i in (0..data.len()).step_by(EDGE_BYTE_STRIDE) {
        if i + CHANNELS > data.len() {
            break;
        }
        let diff: u32 = (0..3)
            .map(|c| data[i + c].abs_diff(data[i + c + 1]) as u32)
            .sum();

        samples += 1;
        if diff > EDGE_DIFF_THRESHOLD {
            edges += 1;
        }
    }

    samples > 0 && edges as f64 / samples as f64 > EDGE_DENSITY_THRESHOLD
}

fn filename_looks_captured(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    FILENAME_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}

fn has_limited_palette(buffer: &PixelBuffer<'_>) -> bool {
    let data = buffer.as_bytes();
    let colors: HashSet<QuantizedColor> = (0..data.len())
        .step_by(PALETTE_BYTE_STRIDE)
        .filter(|&i| i + 3 <= data.len())
        .map(|i| QuantizedColor::from_slice(&data[i..i + 3]))
        .collect();

    !colors.is_empty() && colors.len() < PALETTE_MAX_COLORS
}
