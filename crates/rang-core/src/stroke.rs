//! Strokes: the unit of drawing shared through a room's stroke log.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier assigned to a stroke by the backend on insert.
pub type StrokeId = String;

/// Drawing tool. Resolved once when a stroke begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Paints color over existing content.
    #[default]
    Brush,
    /// Removes existing content under the path.
    Eraser,
}

impl Tool {
    /// Wire name of the tool.
    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Brush => "brush",
            Tool::Eraser => "eraser",
        }
    }

    /// Whether painting with this tool removes content.
    pub fn erases(self) -> bool {
        self == Tool::Eraser
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for tool tags other than `brush` and `eraser`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown tool: {0:?}")]
pub struct ParseToolError(pub String);

impl FromStr for Tool {
    type Err = ParseToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brush" => Ok(Tool::Brush),
            "eraser" => Ok(Tool::Eraser),
            other => Err(ParseToolError(other.to_string())),
        }
    }
}

/// Style attributes applied to a whole stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// CSS hex color, e.g. `#9b87f5`.
    pub color: String,
    /// Line width in surface units.
    pub size: f64,
    pub tool: Tool,
}

impl StrokeStyle {
    pub fn new(color: impl Into<String>, size: f64, tool: Tool) -> Self {
        Self {
            color: color.into(),
            size,
            tool,
        }
    }

    /// Brush style with the given color and size.
    pub fn brush(color: impl Into<String>, size: f64) -> Self {
        Self::new(color, size, Tool::Brush)
    }

    /// Eraser style with the given size.
    pub fn eraser(size: f64) -> Self {
        Self::new(crate::color::DEFAULT_COLOR, size, Tool::Eraser)
    }
}

/// A completed stroke as submitted by a client, before the backend assigns
/// its identity and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStroke {
    pub room_id: String,
    pub user_id: String,
    pub user_name: String,
    pub points: Vec<Point>,
    pub color: String,
    pub size: f64,
    pub tool: Tool,
}

impl NewStroke {
    /// Check the payload invariants: at least one point and a positive, finite size.
    pub fn validate(&self) -> Result<(), String> {
        if self.points.is_empty() {
            return Err("stroke has no points".to_string());
        }
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(format!("stroke size must be positive, got {}", self.size));
        }
        Ok(())
    }

    /// Commit this payload as a stroke with the given identity and timestamp.
    pub fn commit(self, id: StrokeId, timestamp: i64) -> Stroke {
        Stroke {
            id,
            room_id: self.room_id,
            user_id: self.user_id,
            user_name: self.user_name,
            points: self.points,
            color: self.color,
            size: self.size,
            tool: self.tool,
            timestamp,
        }
    }
}

/// A stroke committed to a room's log. Immutable once committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub id: StrokeId,
    pub room_id: String,
    pub user_id: String,
    pub user_name: String,
    /// Points in surface-local coordinates.
    pub points: Vec<Point>,
    pub color: String,
    pub size: f64,
    pub tool: Tool,
    /// Milliseconds since the Unix epoch, strictly increasing per log.
    pub timestamp: i64,
}

impl Stroke {
    /// Style attributes of this stroke.
    pub fn style(&self) -> StrokeStyle {
        StrokeStyle::new(self.color.clone(), self.size, self.tool)
    }
}

/// Sort strokes into replay order: ascending timestamp, ties kept in their
/// existing order.
pub fn sort_for_replay(strokes: &mut [Stroke]) {
    strokes.sort_by_key(|s| s.timestamp);
}
