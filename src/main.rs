use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use piececount::annotate::{self, Annotator};
use piececount::{AnalysisConfig, Piece, PieceAnalyzer, Report};

#[derive(Parser)]
#[command(name = "piececount")]
#[command(about = "Count and classify game pieces in an image")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON analysis config (missing fields keep their defaults)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Gray level above which pixels count as piece
    #[arg(long)]
    threshold: Option<u8>,

    /// Contour area below which a piece counts as having a hole
    #[arg(long, value_name = "PX")]
    hole_area: Option<f64>,

    /// Maximum vertex count for a circular piece
    #[arg(long)]
    max_vertices: Option<usize>,

    /// Approximate contours with this tolerance before counting vertices
    #[arg(long, value_name = "PX")]
    approx_epsilon: Option<f64>,

    /// Where to write the annotated image [default: <IMAGE>_annotated.png]
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Skip drawing the annotated image
    #[arg(long)]
    no_annotate: bool,

    /// TrueType font for the piece labels [default: bundled DejaVu Sans]
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

impl Cli {
    fn analysis_config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(hole_area) = self.hole_area {
            config.hole_area_threshold = hole_area;
        }
        if let Some(max_vertices) = self.max_vertices {
            config.max_circular_vertices = max_vertices;
        }
        if self.approx_epsilon.is_some() {
            config.approx_epsilon = self.approx_epsilon;
        }
        if self.font.is_some() {
            config.annotation.font_path = self.font.clone();
        }

        Ok(config)
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    report: &'a Report,
    pieces: &'a [Piece],
}

fn default_output_path(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    image_path.with_file_name(format!("{stem}_annotated.png"))
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.analysis_config()?;

    let img = piececount::load_image(&args.image_path)?;
    info!(
        path = %args.image_path.display(),
        width = img.width(),
        height = img.height(),
        "image loaded"
    );

    let mut analyzer = PieceAnalyzer::new(config);
    if let Some(debug_dir) = &args.debug_out {
        analyzer = analyzer.with_debug(debug_dir.clone());
    }

    let source = args.image_path.display().to_string();
    let analysis = analyzer.analyze(&img, &source)?;

    if args.json {
        let payload = JsonOutput {
            report: &analysis.report,
            pieces: &analysis.pieces,
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{}", analysis.report);

        if args.verbose {
            for piece in &analysis.pieces {
                println!(
                    "  Piece {} at ({}, {}) {}x{} - area: {}, perimeter: {:.1}, vertices: {}, {} {}{}",
                    piece.id,
                    piece.bbox.x,
                    piece.bbox.y,
                    piece.bbox.width,
                    piece.bbox.height,
                    piece.area,
                    piece.perimeter,
                    piece.vertices,
                    piece.color,
                    piece.shape,
                    if piece.has_hole { ", with hole" } else { "" },
                );
            }
        }
    }

    if !args.no_annotate {
        let annotator = Annotator::from_config(analyzer.config.annotation.clone())?;
        let annotated = annotator.annotate(&img, &analysis.pieces);
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.image_path));
        annotate::save_annotated(&annotated, &output)?;
        info!(path = %output.display(), "annotated image saved");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("piececount").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn flags_override_config_file_fields() -> anyhow::Result<()> {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
        write!(
            file,
            r#"{{ "threshold": 90, "hole_area_threshold": 500.0, "max_circular_vertices": 8 }}"#
        )?;
        let config_path = file.path().to_string_lossy().into_owned();

        let cli = parse(&[
            "board.png",
            "--config",
            &config_path,
            "--threshold",
            "100",
            "--approx-epsilon",
            "2.5",
        ]);
        let config = cli.analysis_config()?;

        assert_eq!(config.threshold, 100);
        assert_eq!(config.hole_area_threshold, 500.0);
        assert_eq!(config.max_circular_vertices, 8);
        assert_eq!(config.approx_epsilon, Some(2.5));
        assert_eq!(config.annotation.font_path, None);

        Ok(())
    }

    #[test]
    fn flags_alone_start_from_defaults() -> anyhow::Result<()> {
        let cli = parse(&[
            "board.png",
            "--hole-area",
            "750",
            "--max-vertices",
            "5",
            "--font",
            "labels.ttf",
        ]);
        let config = cli.analysis_config()?;

        assert_eq!(config.threshold, 127);
        assert_eq!(config.hole_area_threshold, 750.0);
        assert_eq!(config.max_circular_vertices, 5);
        assert_eq!(config.approx_epsilon, None);
        assert_eq!(config.annotation.font_path, Some(PathBuf::from("labels.ttf")));

        Ok(())
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = parse(&["board.png", "--config", "/definitely/not/a/config.json"]);
        assert!(cli.analysis_config().is_err());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        assert!(Cli::try_parse_from(["piececount", "board.png", "--threshold", "300"]).is_err());
        assert!(Cli::try_parse_from(["piececount"]).is_err());
    }

    #[test]
    fn default_output_sits_next_to_input() {
        assert_eq!(
            default_output_path(Path::new("shots/board.jpg")),
            PathBuf::from("shots/board_annotated.png")
        );
        assert_eq!(
            default_output_path(Path::new("board.tar.png")),
            PathBuf::from("board.tar_annotated.png")
        );
    }
}
