//! Human-readable and JSON output for batch reports

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use listing_screen::{BatchReport, ImageAnalysisResult, ScreenshotDetectionResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub generated_at: DateTime<Utc>,
    pub files: Vec<PathBuf>,
    pub report: BatchReport,
}

impl ReportEnvelope {
    pub fn new(files: Vec<PathBuf>, report: BatchReport) -> Self {
        Self {
            generated_at: Utc::now(),
            files,
            report,
        }
    }

    pub fn write_json(&self, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report to JSON")?;
        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write output to {}", output_path.display()))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn screenshot_line(result: &ScreenshotDetectionResult) -> String {
    if result.is_screenshot {
        format!("🖥️  likely screenshot ({}%): {}", result.confidence, result.reasons.join(", "))
    } else if result.confidence > 0 {
        format!("📷 photo ({}% screenshot signals: {})", result.confidence, result.reasons.join(", "))
    } else {
        "📷 photo".to_string()
    }
}

fn print_image(index: usize, path: &Path, result: &ImageAnalysisResult, best: bool) {
    let marker = if best { "⭐" } else { "  " };
    println!(
        "{} {}. {} score {} ({} - {})",
        marker,
        index + 1,
        display_name(path),
        result.score,
        result.grade,
        result.quality_category()
    );

    if !result.is_unreadable() {
        println!(
            "     {}x{} {:?}, brightness {:.1}, contrast {:.1}, sharpness {:.1}",
            result.width,
            result.height,
            result.orientation(),
            result.brightness,
            result.contrast,
            result.sharpness
        );
    }

    for (issue, suggestion) in result.issues.iter().zip(&result.suggestions) {
        println!("     ⚠️  {}: {}", issue, suggestion);
    }
}

pub fn print_report(paths: &[PathBuf], report: &BatchReport) {
    println!("\n📈 ANALYSIS RESULTS");
    println!("==================");
    println!("Images: {}", report.len());
    println!(
        "Average score: {:.1} (best {}, worst {})",
        report.average_score, report.best_score, report.worst_score
    );
    println!("Price multiplier hint: {:.2}x", report.price_multiplier);
    println!("Likely screenshots: {}", report.screenshot_count());

    println!("\n📸 IMAGES:");
    println!("==========");
    for (i, (path, result)) in paths.iter().zip(&report.per_image).enumerate() {
        print_image(i, path, result, i == report.best_main_image_index);
        if let Some(screenshot) = report.screenshots.get(i) {
            println!("     {}", screenshot_line(screenshot));
        }
    }

    if !report.possible_duplicates.is_empty() {
        println!("\n🔁 POSSIBLE DUPLICATES:");
        for pair in &report.possible_duplicates {
            println!(
                "  {} / {}",
                paths.get(pair.original).map(|p| display_name(p)).unwrap_or_default(),
                paths.get(pair.duplicate).map(|p| display_name(p)).unwrap_or_default()
            );
        }
    }

    if !report.tips.is_empty() {
        println!("\n💡 TIPS:");
        for tip in &report.tips {
            println!("  • {}", tip);
        }
    }
}

pub fn print_screenshots(paths: &[PathBuf], report: &BatchReport) {
    for (path, result) in paths.iter().zip(&report.screenshots) {
        println!("{}: {}", display_name(path), screenshot_line(result));
    }
}
