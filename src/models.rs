use crate::error::AnalysisError;
use crate::pipeline::{BoundingBox, PipelineData};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Metadata keys written by the detection steps
pub mod keys {
    pub const AREA: &str = "area";
    pub const PERIMETER: &str = "perimeter";
    pub const VERTICES: &str = "vertices";
    pub const COLOR: &str = "color";
    pub const SHAPE: &str = "shape";
    pub const HAS_HOLE: &str = "has_hole";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PieceColor {
    Red,
    Blue,
    White,
    Undefined,
}

impl PieceColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceColor::Red => "Red",
            PieceColor::Blue => "Blue",
            PieceColor::White => "White",
            PieceColor::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PieceColor {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Red" => Ok(PieceColor::Red),
            "Blue" => Ok(PieceColor::Blue),
            "White" => Ok(PieceColor::White),
            "Undefined" => Ok(PieceColor::Undefined),
            other => Err(AnalysisError::UnknownLabel {
                kind: "color",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PieceShape {
    Circular,
    #[serde(rename = "Non-circular")]
    NonCircular,
}

impl PieceShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceShape::Circular => "Circular",
            PieceShape::NonCircular => "Non-circular",
        }
    }
}

impl fmt::Display for PieceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PieceShape {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Circular" => Ok(PieceShape::Circular),
            "Non-circular" => Ok(PieceShape::NonCircular),
            other => Err(AnalysisError::UnknownLabel {
                kind: "shape",
                value: other.to_string(),
            }),
        }
    }
}

/// One detected and classified game piece
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Piece {
    /// 1-based position in contour order
    pub id: usize,
    pub bbox: BoundingBox,
    /// Bounding-box center, not the geometric centroid
    pub centroid: (u32, u32),
    pub area: f64,
    pub perimeter: f64,
    pub vertices: usize,
    pub color: PieceColor,
    pub shape: PieceShape,
    pub has_hole: bool,
}

impl Piece {
    /// Rebuild a piece from a classified pipeline item
    pub fn from_data(id: usize, data: &PipelineData) -> Result<Self, AnalysisError> {
        let bbox = data.bbox.ok_or(AnalysisError::MissingMetadata("bbox"))?;

        Ok(Self {
            id,
            bbox,
            centroid: bbox.center(),
            area: data.require_float(keys::AREA)?,
            perimeter: data.require_float(keys::PERIMETER)?,
            vertices: data.require_int(keys::VERTICES)? as usize,
            color: data.require_string(keys::COLOR)?.parse()?,
            shape: data.require_string(keys::SHAPE)?.parse()?,
            has_hole: data.require_bool(keys::HAS_HOLE)?,
        })
    }
}
