//! Aggregate counts over classified pieces

use crate::models::{Piece, PieceColor, PieceShape};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColorCounts {
    pub red: usize,
    pub blue: usize,
    pub white: usize,
    pub undefined: usize,
}

impl ColorCounts {
    pub fn total(&self) -> usize {
        self.red + self.blue + self.white + self.undefined
    }
}

/// Summary statistics for one analyzed image
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub source: String,
    pub total: usize,
    pub colors: ColorCounts,
    pub circular: usize,
    pub non_circular: usize,
    pub with_holes: usize,
    pub without_holes: usize,
    pub areas: Vec<f64>,
    /// None when no pieces were found
    pub largest_area: Option<f64>,
    pub smallest_area: Option<f64>,
}

impl Report {
    pub fn new(source: impl Into<String>, pieces: &[Piece]) -> Self {
        let mut report = Self {
            source: source.into(),
            ..Self::default()
        };

        for piece in pieces {
            report.total += 1;

            match piece.color {
                PieceColor::Red => report.colors.red += 1,
                PieceColor::Blue => report.colors.blue += 1,
                PieceColor::White => report.colors.white += 1,
                PieceColor::Undefined => report.colors.undefined += 1,
            }

            match piece.shape {
                PieceShape::Circular => report.circular += 1,
                PieceShape::NonCircular => report.non_circular += 1,
            }

            if piece.has_hole {
                report.with_holes += 1;
            } else {
                report.without_holes += 1;
            }

            report.areas.push(piece.area);
        }

        report.largest_area = report.areas.iter().copied().reduce(f64::max);
        report.smallest_area = report.areas.iter().copied().reduce(f64::min);
        report
    }

    /// Every classification partitions the pieces exactly once
    pub fn is_consistent(&self) -> bool {
        self.colors.total() == self.total
            && self.circular + self.non_circular == self.total
            && self.with_holes + self.without_holes == self.total
            && self.areas.len() == self.total
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Image {}:", self.source)?;
        writeln!(f, "Total pieces: {}", self.total)?;
        writeln!(f, "Red pieces: {}", self.colors.red)?;
        writeln!(f, "Blue pieces: {}", self.colors.blue)?;
        writeln!(f, "White pieces: {}", self.colors.white)?;
        writeln!(f, "Undefined pieces: {}", self.colors.undefined)?;
        writeln!(f, "Circular pieces: {}", self.circular)?;
        writeln!(f, "Non-circular pieces: {}", self.non_circular)?;
        writeln!(f, "Pieces with holes: {}", self.with_holes)?;
        writeln!(f, "Pieces without holes: {}", self.without_holes)?;

        match (self.largest_area, self.smallest_area) {
            (Some(largest), Some(smallest)) => {
                writeln!(f, "Largest area: {} pixels", largest)?;
                writeln!(f, "Smallest area: {} pixels", smallest)
            }
            _ => writeln!(f, "No pieces found; area statistics unavailable"),
        }
    }
}
