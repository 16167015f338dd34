//! crates/slidecraft_core/src/annotations.rs
//!
//! The vector overlay a slide can carry. Stored on the slide as an opaque JSON
//! string; this module is the typed view of that string.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum AnnotationError {
    #[error("Malformed annotation payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Shapes and text labels drawn over a slide, each kept in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationDocument {
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub texts: Vec<TextAnnotation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Line,
    Arrow,
    Path,
}

/// Positions and sizes are percentages of the slide's dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub style: ShapeStyle,
    /// SVG path data for freehand strokes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub stroke: String,
    pub stroke_width: f64,
    pub fill: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnnotation {
    pub id: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f64,
    pub color: String,
    pub font_family: String,
    pub font_weight: String,
}

impl AnnotationDocument {
    pub fn parse(payload: &str) -> Result<Self, AnnotationError> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn to_json(&self) -> Result<String, AnnotationError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.texts.is_empty()
    }
}
