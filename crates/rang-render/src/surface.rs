//! CPU raster surface backed by tiny-skia.

use crate::renderer::{RenderResult, RendererError, StrokeRenderer};
use kurbo::Point;
use peniko::Color;
use rang_core::color::parse_css_color;
use rang_core::stroke::StrokeStyle;
use tiny_skia::{
    BlendMode, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    Transform,
};

/// Default export background.
pub const DEFAULT_BACKGROUND: Color = Color::WHITE;

/// Un-premultiplied RGBA pixels of a flattened surface.
#[derive(Debug)]
pub struct RasterImage {
    /// RGBA pixel data (4 bytes per pixel).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// Fixed-size drawing surface. Starts fully transparent.
#[derive(Clone)]
pub struct Surface {
    pixmap: Pixmap,
}

fn skia_color(color: Color) -> tiny_skia::Color {
    let rgba = color.to_rgba8();
    tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, rgba.a)
}

impl Surface {
    /// Create a transparent surface. Both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RendererError::InvalidSize { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Raw premultiplied RGBA bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Overwrite this surface with the pixels of `other`.
    pub fn copy_from(&mut self, other: &Surface) {
        if (self.width(), self.height()) == (other.width(), other.height()) {
            self.pixmap.data_mut().copy_from_slice(other.pixmap.data());
        } else {
            self.pixmap = other.pixmap.clone();
        }
    }

    /// Un-premultiplied RGBA of one pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Whether nothing has been painted (or everything was erased).
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// Flatten over `background` (or keep transparency with `None`) into
    /// straight RGBA.
    pub fn to_rgba(&self, background: Option<Color>) -> RasterImage {
        let flattened;
        let source = match background {
            Some(color) => {
                let mut base = self.pixmap.clone();
                base.fill(skia_color(color));
                base.draw_pixmap(
                    0,
                    0,
                    self.pixmap.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
                flattened = base;
                &flattened
            }
            None => &self.pixmap,
        };

        let mut rgba_data = Vec::with_capacity(source.data().len());
        for pixel in source.pixels() {
            let c = pixel.demultiply();
            rgba_data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }

        RasterImage {
            rgba_data,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Encode the surface as PNG, flattened over `background` when given.
    pub fn to_png(&self, background: Option<Color>) -> RenderResult<Vec<u8>> {
        let image = self.to_rgba(background);
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, image.width, image.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder
                .write_header()
                .map_err(|e| RendererError::Encode(e.to_string()))?;
            writer
                .write_image_data(&image.rgba_data)
                .map_err(|e| RendererError::Encode(e.to_string()))?;
            writer
                .finish()
                .map_err(|e| RendererError::Encode(e.to_string()))?;
        }
        Ok(png_data)
    }

    fn paint_for(style: &StrokeStyle) -> Option<Paint<'static>> {
        let color = match parse_css_color(&style.color) {
            Ok(color) => color,
            Err(e) => {
                log::warn!("Skipping paint call: {}", e);
                return None;
            }
        };

        let mut paint = Paint::default();
        paint.set_color(skia_color(color));
        paint.anti_alias = true;
        paint.blend_mode = if style.tool.erases() {
            BlendMode::DestinationOut
        } else {
            BlendMode::SourceOver
        };
        Some(paint)
    }
}

impl StrokeRenderer for Surface {
    fn paint_points(&mut self, points: &[Point], style: &StrokeStyle) {
        if points.len() < 2 {
            return;
        }
        if !(style.size.is_finite() && style.size > 0.0) {
            log::warn!("Skipping paint call: invalid size {}", style.size);
            return;
        }
        let Some(paint) = Self::paint_for(style) else {
            return;
        };

        let first = points[0];
        if points.iter().all(|p| p.distance(first) < f64::EPSILON) {
            // A stroke that never moved is a round dot of the brush width.
            if let Some(dot) =
                PathBuilder::from_circle(first.x as f32, first.y as f32, (style.size / 2.0) as f32)
            {
                self.pixmap
                    .fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
            return;
        }

        let mut pb = PathBuilder::new();
        pb.move_to(first.x as f32, first.y as f32);
        for p in &points[1..] {
            pb.line_to(p.x as f32, p.y as f32);
        }

        let stroke = Stroke {
            width: style.size as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };

        if let Some(path) = pb.finish() {
            self.pixmap
                .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }
}
