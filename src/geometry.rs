use crate::config::{FrameGravity, OverlayConfig};

/// A point in view-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for PointF {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for PointF {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x: x as f32, y: y as f32 }
    }
}

/// An axis-aligned rectangle in view-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Rectangle positioned by origin and size.
    pub fn from_origin_size(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, right: left + width, bottom: top + height }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn contains(&self, point: PointF) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    /// Rectangle shrunk by the same amount on every edge.
    pub fn inset(&self, amount: f32) -> Self {
        Self {
            left: self.left + amount,
            top: self.top + amount,
            right: self.right - amount,
            bottom: self.bottom - amount,
        }
    }
}

/// Computes the scan frame for the given view bounds.
///
/// Pure function of the bounds and configuration: nothing is retained between
/// layout passes, so rotations and resizes always produce a fresh frame.
/// Returns `None` when the bounds are degenerate.
pub fn resolve_frame(width: f32, height: f32, config: &OverlayConfig) -> Option<RectF> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    let min_dimension = width.min(height);
    let default_size = min_dimension * config.frame_ratio;

    let mut frame_width = match config.frame_width {
        Some(w) if w > 0.0 => w,
        _ => default_size,
    };
    let mut frame_height = match config.frame_height {
        Some(h) if h > 0.0 => h,
        _ => default_size,
    };

    // Oversized frames shrink uniformly to the largest fit, keeping aspect.
    let scale = (width / frame_width).min(height / frame_height).min(1.0);
    frame_width *= scale;
    frame_height *= scale;

    let mut left = (width - frame_width) / 2.0 + config.frame_padding_left - config.frame_padding_right;
    let mut top = (height - frame_height) / 2.0 + config.frame_padding_top - config.frame_padding_bottom;
    match config.frame_gravity {
        FrameGravity::Center => {}
        FrameGravity::Left => left = config.frame_padding_left,
        FrameGravity::Top => top = config.frame_padding_top,
        FrameGravity::Right => left = width - frame_width - config.frame_padding_right,
        FrameGravity::Bottom => top = height - frame_height - config.frame_padding_bottom,
    }

    // Keep the frame inside the view bounds no matter what the paddings say.
    left = left.clamp(0.0, width - frame_width);
    top = top.clamp(0.0, height - frame_height);

    Some(RectF::from_origin_size(left, top, frame_width, frame_height))
}
