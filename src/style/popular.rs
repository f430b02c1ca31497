use super::{draw_label, FrameContext, StyleRenderer};
use crate::geometry::PointF;
use crate::surface::Surface;

/// Corner rounding used when the host leaves `frame_corner_radius` at zero.
const DEFAULT_CORNER_RADIUS: f32 = 8.0;

/// Alpha factor for the resting grid outside the glowing band.
const BASE_GRID_FADE: f32 = 0.25;

/// Alpha factor for the vertical segments inside the band.
const BAND_FADE: f32 = 0.35;

/// Popular style - rounded frame with a grid sweep and a glowing band
pub(crate) struct Popular;

impl StyleRenderer for Popular {
    fn render(&self, surface: &mut dyn Surface, ctx: &FrameContext) {
        if ctx.frame.is_empty() {
            return;
        }
        let radius = corner_radius(ctx);
        let mask = ctx.config.mask_color;
        if !mask.is_transparent() {
            surface.fill_exterior(ctx.bounds(), ctx.frame, radius, mask);
        }
        draw_grid(surface, ctx);
        draw_band(surface, ctx);
        surface.stroke_round_rect(ctx.frame, radius, ctx.config.frame_line_stroke_width, ctx.config.frame_color);
        draw_label(surface, ctx);
    }
}

fn corner_radius(ctx: &FrameContext) -> f32 {
    if ctx.config.frame_corner_radius > 0.0 {
        ctx.config.frame_corner_radius
    } else {
        DEFAULT_CORNER_RADIUS
    }
}

fn cell_size(ctx: &FrameContext) -> f32 {
    ctx.frame.width() / ctx.config.grid_column as f32
}

/// The resting grid: evenly spaced lines across the whole frame at low alpha.
fn draw_grid(surface: &mut dyn Surface, ctx: &FrameContext) {
    let frame = ctx.frame;
    let config = ctx.config;
    let cell = cell_size(ctx);
    let color = config.laser_color.fade(BASE_GRID_FADE);
    let stroke = config.grid_stroke_width;

    for column in 1..config.grid_column {
        let x = frame.left + column as f32 * cell;
        surface.stroke_line(PointF::new(x, frame.top), PointF::new(x, frame.bottom), stroke, color);
    }
    let mut y = frame.top + cell;
    while y < frame.bottom {
        surface.stroke_line(PointF::new(frame.left, y), PointF::new(frame.right, y), stroke, color);
        y += cell;
    }
}

/// The glowing band trailing the sweep front: brightened grid segments that
/// fade with distance behind the front, and a full-strength crest line.
fn draw_band(surface: &mut dyn Surface, ctx: &FrameContext) {
    let frame = ctx.frame;
    let config = ctx.config;
    let cell = cell_size(ctx);
    let stroke = config.grid_stroke_width;
    let front = ctx.sweep_top(0.0);
    let band_height = if config.grid_height > 0.0 { config.grid_height } else { frame.height() };
    let band_top = (front - band_height).max(frame.top);
    if front <= band_top {
        return;
    }

    for column in 1..config.grid_column {
        let x = frame.left + column as f32 * cell;
        surface.stroke_line(
            PointF::new(x, band_top),
            PointF::new(x, front),
            stroke,
            config.laser_color.fade(BAND_FADE),
        );
    }

    let mut y = front;
    while y >= band_top {
        let brightness = (y - band_top) / (front - band_top);
        surface.stroke_line(
            PointF::new(frame.left, y),
            PointF::new(frame.right, y),
            stroke,
            config.laser_color.fade(brightness.max(0.05)),
        );
        y -= cell;
    }

    // Crest of the glow.
    surface.stroke_line(
        PointF::new(frame.left, front),
        PointF::new(frame.right, front),
        stroke * 2.0,
        config.laser_color,
    );
}
