//! Tool selection for the drawing surface.

use crate::color::DEFAULT_COLOR;
use crate::stroke::{StrokeStyle, Tool};

/// Default brush size in surface units.
pub const DEFAULT_BRUSH_SIZE: f64 = 5.0;

/// Smallest and largest brush sizes offered by the tool panel.
pub const MIN_BRUSH_SIZE: f64 = 1.0;
pub const MAX_BRUSH_SIZE: f64 = 50.0;

/// Holds the current tool, color and size, and fixes them for each stroke.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: Tool,
    /// Current brush color (CSS hex).
    current_color: String,
    /// Current brush size.
    current_size: f64,
    /// Style captured when the stroke in progress began.
    active: Option<StrokeStyle>,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current_tool: Tool::default(),
            current_color: DEFAULT_COLOR.to_string(),
            current_size: DEFAULT_BRUSH_SIZE,
            active: None,
        }
    }
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tool manager with the given defaults.
    pub fn with_defaults(color: impl Into<String>, size: f64) -> Self {
        let mut tools = Self::new();
        tools.set_color(color);
        tools.set_size(size);
        tools
    }

    /// Set the current tool. A stroke already in progress keeps its tool.
    pub fn set_tool(&mut self, tool: Tool) {
        self.current_tool = tool;
    }

    /// Set the brush color.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.current_color = color.into();
    }

    /// Set the brush size, clamped to the supported range.
    pub fn set_size(&mut self, size: f64) {
        self.current_size = if size.is_finite() {
            size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE)
        } else {
            DEFAULT_BRUSH_SIZE
        };
    }

    pub fn color(&self) -> &str {
        &self.current_color
    }

    pub fn size(&self) -> f64 {
        self.current_size
    }

    /// Style new strokes would get right now.
    pub fn current_style(&self) -> StrokeStyle {
        StrokeStyle::new(self.current_color.clone(), self.current_size, self.current_tool)
    }

    /// Begin a stroke: snapshot the current style for its whole lifetime.
    pub fn begin_stroke(&mut self) -> StrokeStyle {
        let style = self.current_style();
        self.active = Some(style.clone());
        style
    }

    /// Style of the stroke in progress.
    pub fn active_style(&self) -> Option<&StrokeStyle> {
        self.active.as_ref()
    }

    /// End the stroke in progress, returning the style it was drawn with.
    pub fn end_stroke(&mut self) -> Option<StrokeStyle> {
        self.active.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tools = ToolManager::new();
        assert_eq!(tools.current_tool, Tool::Brush);
        assert_eq!(tools.color(), "#9b87f5");
        assert!((tools.size() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_style_fixed_at_stroke_start() {
        let mut tools = ToolManager::new();
        tools.set_tool(Tool::Eraser);
        let style = tools.begin_stroke();
        assert_eq!(style.tool, Tool::Eraser);

        tools.set_tool(Tool::Brush);
        tools.set_color("#ea384c");
        assert_eq!(tools.active_style().map(|s| s.tool), Some(Tool::Eraser));

        let ended = tools.end_stroke().unwrap();
        assert_eq!(ended.tool, Tool::Eraser);
        assert_eq!(ended.color, "#9b87f5");
        assert!(tools.active_style().is_none());
        assert_eq!(tools.current_style().tool, Tool::Brush);
    }

    #[test]
    fn test_size_clamped() {
        let mut tools = ToolManager::new();
        tools.set_size(0.0);
        assert!((tools.size() - MIN_BRUSH_SIZE).abs() < f64::EPSILON);
        tools.set_size(500.0);
        assert!((tools.size() - MAX_BRUSH_SIZE).abs() < f64::EPSILON);
        tools.set_size(f64::NAN);
        assert!((tools.size() - DEFAULT_BRUSH_SIZE).abs() < f64::EPSILON);
    }
}
