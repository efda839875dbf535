use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use piececount::{BoundingBox, Piece};
use tempfile::NamedTempFile;

/// Bright red: in the red range and above the default gray cutoff
pub const PIECE_RED: Rgb<u8> = Rgb([255, 100, 100]);
/// Dark blue: in the blue range, below the gray cutoff
pub const PIECE_BLUE: Rgb<u8> = Rgb([20, 20, 220]);
pub const PIECE_WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Black canvas of the given size
pub fn blank_board(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, BACKGROUND)
}

/// Filled axis-aligned square covering `side` x `side` pixels from (x, y)
pub fn draw_square(img: &mut RgbImage, x: i32, y: i32, side: u32, color: Rgb<u8>) {
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(side, side), color);
}

pub fn draw_disk(img: &mut RgbImage, center: (i32, i32), radius: i32, color: Rgb<u8>) {
    draw_filled_circle_mut(img, center, radius, color);
}

/// Board with four well separated pieces:
/// - white 40px square at (10, 10)
/// - red 20px square at (100, 10)
/// - white disk of radius 25 centered at (140, 140)
/// - white 30px square at (10, 150) with a blue spot punched in the middle
pub fn mixed_board() -> DynamicImage {
    let mut img = blank_board(200, 200);
    draw_square(&mut img, 10, 10, 40, PIECE_WHITE);
    draw_square(&mut img, 100, 10, 20, PIECE_RED);
    draw_disk(&mut img, (140, 140), 25, PIECE_WHITE);
    draw_square(&mut img, 10, 150, 30, PIECE_WHITE);
    draw_square(&mut img, 22, 162, 6, PIECE_BLUE);
    DynamicImage::ImageRgb8(img)
}

/// Writes an image to a temporary PNG that is removed when dropped
pub fn save_temp_png(img: &DynamicImage) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// Piece whose bounding box starts at (x, y)
pub fn piece_at(pieces: &[Piece], x: u32, y: u32) -> &Piece {
    pieces
        .iter()
        .find(|p| p.bbox.x == x && p.bbox.y == y)
        .unwrap_or_else(|| panic!("no piece with bounding box at ({x}, {y}): {pieces:?}"))
}

pub fn square_bbox(x: u32, y: u32, side: u32) -> BoundingBox {
    BoundingBox {
        x,
        y,
        width: side,
        height: side,
    }
}
