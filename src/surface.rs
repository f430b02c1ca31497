use crate::geometry::{PointF, RectF};
use image::RgbaImage;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// An RGBA color. Parses from `#RRGGBB` or `#AARRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Fully transparent; drawing with it is a no-op.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// The near-invisible shade of this color used as a gradient tail.
    pub fn shaded(self) -> Self {
        self.with_alpha(0x01)
    }

    /// Alpha scaled by `factor` in `[0, 1]`.
    pub fn fade(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        self.with_alpha((self.a as f32 * factor).round() as u8)
    }
}

/// Errors that can occur when parsing a color from text.
#[derive(thiserror::Error, Debug)]
pub enum ParseColorError {
    #[error("color must start with '#': {0:?}")]
    MissingPrefix(String),

    #[error("color must have 6 or 8 hex digits: {0:?}")]
    InvalidLength(String),

    #[error("invalid hex digits in color: {0:?}")]
    InvalidHex(String),
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let digits = input
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError::MissingPrefix(input.to_string()))?;
        let parse = |range: &str| {
            u8::from_str_radix(range, 16).map_err(|_| ParseColorError::InvalidHex(input.to_string()))
        };
        match digits.len() {
            6 => Ok(Color::new(parse(&digits[0..2])?, parse(&digits[2..4])?, parse(&digits[4..6])?)),
            8 => Ok(Color::rgba(
                parse(&digits[2..4])?,
                parse(&digits[4..6])?,
                parse(&digits[6..8])?,
                parse(&digits[0..2])?,
            )),
            _ => Err(ParseColorError::InvalidLength(input.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// How a shape is filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Color),
    /// Top-to-bottom linear gradient.
    VerticalGradient { top: Color, bottom: Color },
}

/// The drawing surface the host hands to the overlay on each draw pass.
///
/// Implementations map these primitives onto the platform canvas (skia, web
/// canvas, a software rasterizer, ...). Coordinates are view-local pixels.
pub trait Surface {
    /// Fills a rectangle with a solid color.
    fn fill_rect(&mut self, rect: RectF, color: Color);

    /// Fills everything inside `bounds` except the (optionally rounded)
    /// `window` rectangle; the window itself stays fully transparent.
    fn fill_exterior(&mut self, bounds: RectF, window: RectF, corner_radius: f32, color: Color);

    /// Strokes the outline of a rounded rectangle.
    fn stroke_round_rect(&mut self, rect: RectF, corner_radius: f32, stroke_width: f32, color: Color);

    /// Strokes a straight line segment.
    fn stroke_line(&mut self, from: PointF, to: PointF, stroke_width: f32, color: Color);

    /// Strokes an arc of the ellipse inscribed in `oval`. Angles in degrees,
    /// 0° at three o'clock, sweeping clockwise.
    fn stroke_arc(&mut self, oval: RectF, start_angle: f32, sweep_angle: f32, stroke_width: f32, color: Color);

    /// Fills the ellipse inscribed in `oval`.
    fn fill_oval(&mut self, oval: RectF, fill: Fill);

    fn fill_circle(&mut self, center: PointF, radius: f32, color: Color);

    /// Draws a bitmap scaled into `dst`.
    fn draw_bitmap(&mut self, bitmap: &RgbaImage, dst: RectF);

    /// Draws a single line of text horizontally centered on `anchor.x` with
    /// its baseline at `anchor.y`.
    fn draw_text(&mut self, text: &str, anchor: PointF, size: f32, color: Color);
}

/// One recorded drawing primitive; see [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect { rect: RectF, color: Color },
    FillExterior { bounds: RectF, window: RectF, corner_radius: f32, color: Color },
    StrokeRoundRect { rect: RectF, corner_radius: f32, stroke_width: f32, color: Color },
    StrokeLine { from: PointF, to: PointF, stroke_width: f32, color: Color },
    StrokeArc { oval: RectF, start_angle: f32, sweep_angle: f32, stroke_width: f32, color: Color },
    FillOval { oval: RectF, fill: Fill },
    FillCircle { center: PointF, radius: f32, color: Color },
    /// Bitmaps are recorded by destination and pixel dimensions only.
    Bitmap { dst: RectF, width: u32, height: u32 },
    Text { text: String, anchor: PointF, size: f32, color: Color },
}

/// A [`Surface`] that records every primitive instead of rasterizing.
///
/// Useful for driving the overlay without a real canvas: hosts can replay the
/// ops, and tests can assert on what would have been drawn.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: RectF, color: Color) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn fill_exterior(&mut self, bounds: RectF, window: RectF, corner_radius: f32, color: Color) {
        self.ops.push(DrawOp::FillExterior { bounds, window, corner_radius, color });
    }

    fn stroke_round_rect(&mut self, rect: RectF, corner_radius: f32, stroke_width: f32, color: Color) {
        self.ops.push(DrawOp::StrokeRoundRect { rect, corner_radius, stroke_width, color });
    }

    fn stroke_line(&mut self, from: PointF, to: PointF, stroke_width: f32, color: Color) {
        self.ops.push(DrawOp::StrokeLine { from, to, stroke_width, color });
    }

    fn stroke_arc(&mut self, oval: RectF, start_angle: f32, sweep_angle: f32, stroke_width: f32, color: Color) {
        self.ops.push(DrawOp::StrokeArc { oval, start_angle, sweep_angle, stroke_width, color });
    }

    fn fill_oval(&mut self, oval: RectF, fill: Fill) {
        self.ops.push(DrawOp::FillOval { oval, fill });
    }

    fn fill_circle(&mut self, center: PointF, radius: f32, color: Color) {
        self.ops.push(DrawOp::FillCircle { center, radius, color });
    }

    fn draw_bitmap(&mut self, bitmap: &RgbaImage, dst: RectF) {
        self.ops.push(DrawOp::Bitmap { dst, width: bitmap.width(), height: bitmap.height() });
    }

    fn draw_text(&mut self, text: &str, anchor: PointF, size: f32, color: Color) {
        self.ops.push(DrawOp::Text { text: text.to_string(), anchor, size, color });
    }
}
