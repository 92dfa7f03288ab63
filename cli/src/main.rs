use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use listing_screen::{predict_price_multiplier, AnalysisConfig, BatchAnalyzer};
use std::path::PathBuf;
use tracing::info;

mod logging;
mod report;
mod scan;

use logging::LogFormat;
use report::ReportEnvelope;

#[derive(Parser)]
#[command(name = "listing-screen")]
#[command(about = "Pre-screen listing photos for quality and screen captures")]
struct Cli {
    /// Log output format (stderr)
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze image files and/or folders of images
    Analyze {
        /// Image files or folders (folders are not searched recursively)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write the full report as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only print screenshot verdicts
        #[arg(long)]
        screenshots_only: bool,

        /// JSON analysis config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Long-edge cap before measuring (0 disables downscaling)
        #[arg(long)]
        max_dimension: Option<u32>,

        /// Analyze images one at a time instead of in parallel
        #[arg(long)]
        sequential: bool,
    },

    /// Print the price multiplier hint for an average score
    Price {
        avg_score: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format)?;

    match cli.command {
        Commands::Analyze {
            paths,
            output,
            screenshots_only,
            config,
            max_dimension,
            sequential,
        } => {
            let config = load_config(config, max_dimension, sequential)?;
            analyze(paths, config, output, screenshots_only)
        }
        Commands::Price { avg_score } => {
            println!("{:.2}", predict_price_multiplier(avg_score));
            Ok(())
        }
    }
}

fn load_config(path: Option<PathBuf>, max_dimension: Option<u32>, sequential: bool) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(path) => AnalysisConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    if let Some(max_dimension) = max_dimension {
        let cap = if max_dimension == 0 { None } else { Some(max_dimension) };
        config = config.with_max_analysis_dimension(cap);
    }
    if sequential {
        config = config.sequential();
    }

    Ok(config)
}

fn analyze(
    paths: Vec<PathBuf>,
    config: AnalysisConfig,
    output_path: Option<PathBuf>,
    screenshots_only: bool,
) -> Result<()> {
    let image_paths = scan::collect_image_paths(&paths)?;
    if image_paths.is_empty() {
        println!("⚠️  No supported image files found");
        return Ok(());
    }

    info!(count = image_paths.len(), "found image files");

    let report = BatchAnalyzer::new(config).analyze_paths(&image_paths);

    let unreadable = report.unreadable_count();
    if unreadable > 0 {
        println!("⚠️  Could not decode {} of {} files", unreadable, report.len());
    }

    if screenshots_only {
        report::print_screenshots(&image_paths, &report);
    } else {
        report::print_report(&image_paths, &report);
    }

    if let Some(output_path) = output_path {
        ReportEnvelope::new(image_paths, report).write_json(&output_path)?;
        println!("💾 Results saved to: {}", output_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_config_overrides() {
        let config = load_config(None, Some(0), true).unwrap();
        assert_eq!(config.max_analysis_dimension, None);
        assert!(!config.parallel);

        let config = load_config(None, Some(640), false).unwrap();
        assert_eq!(config.max_analysis_dimension, Some(640));
        assert!(config.parallel);
    }

    #[test]
    fn test_config_file_then_flags() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{ "max_analysis_dimension": 500, "parallel": true }"#).unwrap();

        let config = load_config(Some(path.clone()), None, true).unwrap();
        assert_eq!(config.max_analysis_dimension, Some(500));
        assert!(!config.parallel);

        assert!(load_config(Some(temp_dir.path().join("missing.json")), None, false).is_err());
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "listing-screen",
            "analyze",
            "a.jpg",
            "photos",
            "--output",
            "out.json",
            "--sequential",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Analyze { paths, output, sequential, screenshots_only, .. } => {
                assert_eq!(paths, vec![PathBuf::from("a.jpg"), PathBuf::from("photos")]);
                assert_eq!(output, Some(PathBuf::from("out.json")));
                assert!(sequential);
                assert!(!screenshots_only);
            }
            Commands::Price { .. } => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_analyze_writes_envelope() {
        let temp_dir = tempdir().unwrap();
        let image_path = temp_dir.path().join("front.png");
        image::RgbaImage::from_pixel(64, 64, image::Rgba([140, 140, 140, 255]))
            .save(&image_path)
            .unwrap();
        let output = temp_dir.path().join("report.json");

        analyze(
            vec![temp_dir.path().to_path_buf()],
            AnalysisConfig::default(),
            Some(output.clone()),
            false,
        )
        .unwrap();

        let envelope: ReportEnvelope = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(envelope.files, vec![image_path]);
        assert_eq!(envelope.report.per_image[0].width, 64);
    }
}
