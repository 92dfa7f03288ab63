use image::{Rgba, RgbaImage};
use listing_screen::{
    analyze_image, analyze_images, detect_screenshot, predict_price_multiplier, Grade, ImageInput,
    PixelBuffer, ScreenshotSignal,
};
use pixel_stats::DecodedImage;

/// Noisy raster whose channels move in small steps; alpha mirrors blue
fn photo_like(width: u32, height: u32) -> RgbaImage {
    let mut state: u32 = 0x9e37_79b9;
    RgbaImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let b = 20 + (state % 200) as u8;
        let g = b + ((state >> 8) % 30) as u8;
        let r = g - ((state >> 16) % 20) as u8;
        Rgba([r, g, b, b])
    })
}

#[test]
fn test_uniform_gray_scores_b() {
    let img = RgbaImage::from_pixel(1200, 1200, Rgba([140, 140, 140, 255]));
    let result = analyze_image(&PixelBuffer::from_rgba(&img), 500 * 1024);

    assert_eq!(result.brightness, 140.0);
    assert_eq!(result.contrast, 0.0);
    assert_eq!(result.sharpness, 0.0);
    assert_eq!(result.score, 85);
    assert_eq!(result.grade, Grade::B);
    assert!(result.issues.contains(&"image too flat".to_string()));
    assert!(result.issues.contains(&"image blurry".to_string()));
    assert_eq!(result.issues.len(), result.suggestions.len());
}

#[test]
fn test_black_oversized_file_fails() {
    let img = RgbaImage::from_pixel(500, 500, Rgba([0, 0, 0, 255]));
    let result = analyze_image(&PixelBuffer::from_rgba(&img), 4 * 1024 * 1024);

    assert_eq!(result.score, 45);
    assert_eq!(result.grade, Grade::F);
    assert_eq!(
        result.issues,
        vec!["low resolution", "too dark", "image too flat", "image blurry", "file too large"]
    );
}

#[test]
fn test_screenshot_filename_aspect_and_top_bar() {
    let body = photo_like(1920, 1080);
    let img = RgbaImage::from_fn(1920, 1080, |x, y| {
        if y < 50 {
            Rgba([240, 240, 240, 255])
        } else {
            *body.get_pixel(x, y)
        }
    });

    let result = detect_screenshot(&PixelBuffer::from_rgba(&img), "Screenshot_2024.png");

    assert_eq!(result.confidence, 65);
    assert!(result.is_screenshot);
    assert!(result.triggered(ScreenshotSignal::TopBand));
    assert!(result.triggered(ScreenshotSignal::DesktopAspect));
    assert!(result.triggered(ScreenshotSignal::Filename));
    assert_eq!(
        result.reasons,
        vec![
            "solid-color top bar detected",
            "desktop screen aspect ratio",
            "filename matches a screenshot pattern",
        ]
    );
}

#[test]
fn test_filename_alone_is_not_enough() {
    let img = photo_like(400, 300);
    let result = detect_screenshot(&PixelBuffer::from_rgba(&img), "Screenshot_2024.png");

    assert_eq!(result.confidence, 15);
    assert!(!result.is_screenshot);
}

#[test]
fn test_two_image_batch_recommends_second() {
    // Scores 50 + 10 (brightness 90) = 60
    let dim = ImageInput::from_rgba(RgbaImage::from_pixel(100, 100, Rgba([90, 90, 90, 255])), 40_000, "a.jpg");

    // Two flat halves (105 / 175): brightness 140, contrast 35, measured from a 1200px original
    let halves = RgbaImage::from_fn(200, 200, |x, _| {
        let v = if x < 100 { 105 } else { 175 };
        Rgba([v, v, v, 255])
    });
    let bright = ImageInput::from_decoded(
        DecodedImage {
            rgba: halves,
            original_width: 1200,
            original_height: 1200,
        },
        300_000,
        "b.jpg",
    );

    let report = analyze_images(&[dim, bright]);

    assert_eq!(report.per_image[0].score, 60);
    assert_eq!(report.per_image[1].score, 90);
    assert_eq!(report.best_main_image_index, 1);
    assert_eq!(report.average_score, 75.0);
    assert_eq!(report.price_multiplier, 1.00);
    assert_eq!(
        report.tips,
        vec![
            "add 1 more photos, can improve appeal by 18%",
            "quality good but improvable",
            "some images low-resolution, use ≥1000×1000",
            "some images too dark, add lighting",
            "image at position 2 would make a better main photo than the first",
        ]
    );
}

#[test]
fn test_price_multiplier_examples() {
    assert_eq!(predict_price_multiplier(92.0), 1.20);
    assert_eq!(predict_price_multiplier(65.0), 0.95);
    assert_eq!(predict_price_multiplier(50.0), 0.90);
}

#[test]
fn test_repeated_analysis_is_identical() {
    let img = photo_like(320, 240);
    let buffer = PixelBuffer::from_rgba(&img);

    assert_eq!(analyze_image(&buffer, 12_345), analyze_image(&buffer, 12_345));
    assert_eq!(
        detect_screenshot(&buffer, "IMG_0001.jpg"),
        detect_screenshot(&buffer, "IMG_0001.jpg")
    );
}

#[test]
fn test_batch_matches_single_image_analysis() {
    let rasters = vec![
        photo_like(300, 200),
        RgbaImage::from_pixel(64, 64, Rgba([200, 200, 200, 255])),
        RgbaImage::from_pixel(900, 900, Rgba([30, 60, 90, 255])),
    ];
    let sizes = [10_000u64, 20_000, 4 * 1024 * 1024];

    let expected: Vec<_> = rasters
        .iter()
        .zip(sizes)
        .map(|(img, size)| analyze_image(&PixelBuffer::from_rgba(img), size))
        .collect();

    let inputs: Vec<ImageInput> = rasters
        .into_iter()
        .zip(sizes)
        .enumerate()
        .map(|(i, (img, size))| ImageInput::from_rgba(img, size, format!("photo-{i}.jpg")))
        .collect();

    let report = analyze_images(&inputs);
    assert_eq!(report.per_image, expected);
}

#[test]
fn test_unreadable_image_does_not_abort_batch() {
    let good = ImageInput::from_rgba(RgbaImage::from_pixel(1200, 1200, Rgba([140, 140, 140, 255])), 1000, "ok.jpg");
    let broken = ImageInput::unreadable(2048, "broken.jpg");

    let report = analyze_images(&[broken, good]);

    assert_eq!(report.per_image[0].score, 0);
    assert_eq!(report.per_image[0].grade, Grade::F);
    assert_eq!(report.per_image[0].issues, vec!["cannot analyze image"]);
    assert_eq!(report.per_image[1].score, 85);
    assert_eq!(report.best_main_image_index, 1);
}

#[test]
fn test_empty_batch() {
    let report = analyze_images(&[]);

    assert!(report.is_empty());
    assert_eq!(report.best_main_image_index, 0);
    assert_eq!(report.average_score, 0.0);
    assert_eq!(report.price_multiplier, 0.90);
    assert_eq!(report.tips.len(), 2);
}
