//! Integration tests for the overlay drawing and config loading.

mod common;

use common::*;
use image::Rgb;
use piececount::annotate::{BOX_COLOR, LABEL_COLOR, MARKER_COLOR, bundled_font, save_annotated};
use piececount::AnalysisError;
use std::io::Write;

#[test]
fn test_boxes_and_markers_drawn_without_font() -> anyhow::Result<()> {
    let img = mixed_board();
    let pieces = PieceAnalyzer::default().detect(&img)?;

    let annotator = Annotator::new(AnnotationConfig::default(), None);
    assert!(!annotator.has_font());
    let canvas = annotator.annotate(&img, &pieces);

    let white = piece_at(&pieces, 10, 10);
    // Box spans (x, y)..=(x + w, y + h) and is two pixels thick
    assert_eq!(*canvas.get_pixel(10, 10), BOX_COLOR);
    assert_eq!(*canvas.get_pixel(50, 50), BOX_COLOR);
    assert_eq!(*canvas.get_pixel(9, 9), BOX_COLOR);
    assert_eq!(*canvas.get_pixel(51, 30), BOX_COLOR);

    let (cx, cy) = white.centroid;
    assert_eq!(*canvas.get_pixel(cx, cy), MARKER_COLOR);
    assert_eq!(*canvas.get_pixel(cx + 5, cy), MARKER_COLOR);
    // Interior away from the marker keeps the piece color
    assert_eq!(*canvas.get_pixel(15, 15), PIECE_WHITE);

    // No font means no label pixels anywhere
    assert!(canvas.pixels().all(|p| *p != LABEL_COLOR));

    Ok(())
}

/// Label ink blended onto the black background keeps only a blue channel
fn is_label_ink(p: &Rgb<u8>) -> bool {
    p[0] == 0 && p[1] == 0 && p[2] > 0
}

fn ink_rows(canvas: &image::RgbImage, rows: std::ops::Range<u32>) -> usize {
    canvas
        .enumerate_pixels()
        .filter(|(_, y, p)| rows.contains(y) && is_label_ink(p))
        .count()
}

#[test]
fn test_labels_drawn_above_box_with_bundled_font() -> anyhow::Result<()> {
    let mut board = blank_board(240, 160);
    draw_square(&mut board, 40, 80, 40, PIECE_WHITE);
    let img = image::DynamicImage::ImageRgb8(board);
    let pieces = PieceAnalyzer::default().detect(&img)?;
    assert_eq!(pieces.len(), 1);

    let annotator = Annotator::from_config(AnnotationConfig::default())?;
    assert!(annotator.has_font());
    let canvas = annotator.annotate(&img, &pieces);

    // Default 16px labels: shape line starts at y - 46, color line at y - 26
    assert!(ink_rows(&canvas, 30..53) > 0, "shape label missing");
    assert!(ink_rows(&canvas, 53..80) > 0, "color label missing");
    assert_eq!(ink_rows(&canvas, 80..160), 0, "label ink inside or below the box");

    // Labels start at the box's left edge
    assert!(
        canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| is_label_ink(p))
            .all(|(x, _, _)| x >= 40)
    );

    Ok(())
}

#[test]
fn test_bundled_font_matches_default_annotator() -> anyhow::Result<()> {
    let img = mixed_board();
    let pieces = PieceAnalyzer::default().detect(&img)?;

    let explicit = Annotator::new(AnnotationConfig::default(), Some(bundled_font()?)).annotate(&img, &pieces);
    let configured = Annotator::from_config(AnnotationConfig::default())?.annotate(&img, &pieces);
    assert_eq!(explicit, configured);
    assert!(configured.pixels().any(is_label_ink));

    Ok(())
}

#[test]
fn test_annotation_leaves_source_untouched() -> anyhow::Result<()> {
    let img = mixed_board();
    let pieces = PieceAnalyzer::default().detect(&img)?;
    let before = img.to_rgb8();

    let canvas = Annotator::new(AnnotationConfig::default(), None).annotate(&img, &pieces);

    assert_eq!(img.to_rgb8(), before);
    assert_ne!(canvas, before);

    // Labels come from the clean image, not the annotated one
    let again = PieceAnalyzer::default().detect(&img)?;
    assert_eq!(pieces, again);

    Ok(())
}

#[test]
fn test_empty_board_annotates_to_copy() -> anyhow::Result<()> {
    let img = image::DynamicImage::ImageRgb8(blank_board(32, 32));
    let canvas = Annotator::new(AnnotationConfig::default(), None).annotate(&img, &[]);
    assert!(canvas.pixels().all(|p| *p == Rgb([0, 0, 0])));

    let dir = tempfile::TempDir::new()?;
    let out = dir.path().join("empty_annotated.png");
    save_annotated(&canvas, &out)?;
    assert_eq!(image::open(&out)?.to_rgb8(), canvas);

    Ok(())
}

#[test]
fn test_missing_font_path_is_an_error() {
    let config = AnnotationConfig {
        font_path: Some("/definitely/not/a/font.ttf".into()),
        ..AnnotationConfig::default()
    };
    assert!(matches!(Annotator::from_config(config), Err(AnalysisError::Font(_))));
}

#[test]
fn test_config_file_overrides_defaults() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    write!(
        file,
        r#"{{ "threshold": 100, "approx_epsilon": 1.5, "colors": {{ "white": {{ "lower": [180, 180, 180], "upper": [255, 255, 255] }} }} }}"#
    )?;

    let config = AnalysisConfig::from_file(file.path())?;
    assert_eq!(config.threshold, 100);
    assert_eq!(config.approx_epsilon, Some(1.5));
    assert_eq!(config.colors.white.lower, [180, 180, 180]);
    assert_eq!(config.colors.red, piececount::ColorRanges::default().red);
    assert_eq!(config.hole_area_threshold, 1000.0);

    Ok(())
}

#[test]
fn test_bad_config_reports_path() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    write!(file, "{{ not json")?;

    match AnalysisConfig::from_file(file.path()) {
        Err(AnalysisError::ConfigParse { path, .. }) => assert_eq!(path, file.path()),
        other => panic!("expected ConfigParse error, got {other:?}"),
    }

    Ok(())
}
