//! Overlay drawing for classified pieces

use crate::config::AnnotationConfig;
use crate::error::AnalysisError;
use crate::models::Piece;
use ab_glyph::{FontArc, FontRef, FontVec, PxScale};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const MARKER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const LABEL_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// DejaVu Sans, shipped with the crate so labels never depend on host fonts
static BUNDLED_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
const BUNDLED_FONT_NAME: &str = "assets/fonts/DejaVuSans.ttf";

fn read_font(path: &Path) -> Result<FontArc, AnalysisError> {
    let bytes = std::fs::read(path).map_err(|_| AnalysisError::Font(path.to_path_buf()))?;
    let font = FontVec::try_from_vec(bytes).map_err(|_| AnalysisError::Font(path.to_path_buf()))?;
    Ok(FontArc::new(font))
}

/// The font compiled into the crate
pub fn bundled_font() -> Result<FontArc, AnalysisError> {
    let font = FontRef::try_from_slice(BUNDLED_FONT)
        .map_err(|_| AnalysisError::Font(PathBuf::from(BUNDLED_FONT_NAME)))?;
    Ok(FontArc::new(font))
}

/// Load the label font: the configured path if set, else the bundled font
pub fn load_font(config: &AnnotationConfig) -> Result<FontArc, AnalysisError> {
    match &config.font_path {
        Some(path) => read_font(path),
        None => bundled_font(),
    }
}

/// Draws bounding boxes, centroid markers and labels onto a copy of an image
///
/// Without a font only boxes and centroid markers are drawn.
pub struct Annotator {
    config: AnnotationConfig,
    font: Option<FontArc>,
}

impl Annotator {
    pub fn new(config: AnnotationConfig, font: Option<FontArc>) -> Self {
        Self { config, font }
    }

    /// Annotator with the configured or bundled font
    pub fn from_config(config: AnnotationConfig) -> Result<Self, AnalysisError> {
        let font = load_font(&config)?;
        Ok(Self::new(config, Some(font)))
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Render every piece: box, then centroid, then labels
    pub fn annotate(&self, image: &DynamicImage, pieces: &[Piece]) -> RgbImage {
        let mut canvas = image.to_rgb8();
        for piece in pieces {
            self.draw_piece(&mut canvas, piece);
        }
        debug!(pieces = pieces.len(), "annotated image");
        canvas
    }

    fn draw_piece(&self, canvas: &mut RgbImage, piece: &Piece) {
        let x = piece.bbox.x as i32;
        let y = piece.bbox.y as i32;

        // Box spans (x, y)..=(x + w, y + h), thickened outwards
        for t in 0..self.config.box_thickness.max(1) {
            let rect = Rect::at(x - t as i32, y - t as i32)
                .of_size(piece.bbox.width + 1 + 2 * t, piece.bbox.height + 1 + 2 * t);
            draw_hollow_rect_mut(canvas, rect, BOX_COLOR);
        }

        let (cx, cy) = piece.centroid;
        draw_filled_circle_mut(canvas, (cx as i32, cy as i32), self.config.marker_radius, MARKER_COLOR);

        let Some(font) = &self.font else {
            return;
        };

        let scale = PxScale::from(self.config.label_scale);
        let text_height = self.config.label_scale.round() as i32;

        // Label offsets are measured from the box top to the text baseline
        draw_text_mut(
            canvas,
            LABEL_COLOR,
            x,
            y - 10 - text_height,
            scale,
            font,
            &format!("Color: {}", piece.color),
        );
        draw_text_mut(
            canvas,
            LABEL_COLOR,
            x,
            y - 30 - text_height,
            scale,
            font,
            &format!("Shape: {}", piece.shape),
        );
    }
}

/// Save the annotated image; the format follows the file extension
pub fn save_annotated(image: &RgbImage, path: &Path) -> Result<(), AnalysisError> {
    image.save(path)?;
    Ok(())
}
