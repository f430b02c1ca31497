use super::{draw_label, FrameContext, StyleRenderer};
use crate::geometry::{PointF, RectF};
use crate::surface::{Fill, Surface};

/// Classic style - scan frame with corner brackets and a sweeping laser line
pub(crate) struct Classic;

impl StyleRenderer for Classic {
    fn render(&self, surface: &mut dyn Surface, ctx: &FrameContext) {
        if ctx.frame.is_empty() {
            // Transient zero-sized layout pass; nothing to draw.
            return;
        }
        draw_exterior(surface, ctx);
        draw_laser_line(surface, ctx);
        draw_frame(surface, ctx);
        draw_label(surface, ctx);
    }
}

fn draw_exterior(surface: &mut dyn Surface, ctx: &FrameContext) {
    let mask = ctx.config.mask_color;
    if mask.is_transparent() {
        return;
    }
    surface.fill_exterior(ctx.bounds(), ctx.frame, ctx.config.frame_corner_radius, mask);
}

/// The sweep line: an oval inset by the corner size, with a gradient tail
/// fading upward to suggest motion.
fn draw_laser_line(surface: &mut dyn Surface, ctx: &FrameContext) {
    let config = ctx.config;
    let top = ctx.sweep_top(config.laser_line_height);
    let mut left = ctx.frame.left + config.frame_corner_size;
    let mut right = ctx.frame.right - config.frame_corner_size;
    if left >= right {
        left = ctx.frame.left;
        right = ctx.frame.right;
    }
    let oval = RectF::new(left, top, right, top + config.laser_line_height);
    let fill = Fill::VerticalGradient {
        top: config.laser_color.shaded(),
        bottom: config.laser_color,
    };
    surface.fill_oval(oval, fill);
}

fn draw_frame(surface: &mut dyn Surface, ctx: &FrameContext) {
    let config = ctx.config;
    surface.stroke_round_rect(
        ctx.frame,
        config.frame_corner_radius,
        config.frame_line_stroke_width,
        config.frame_color,
    );
    draw_corners(surface, ctx);
}

/// Four corner brackets, with arcs when the frame corners are rounded.
fn draw_corners(surface: &mut dyn Surface, ctx: &FrameContext) {
    let config = ctx.config;
    let stroke = config.frame_corner_stroke_width;
    let radius = config.frame_corner_radius;
    let color = config.frame_corner_color;

    // Center the thicker bracket stroke over the thin border line.
    let padding = (stroke - config.frame_line_stroke_width) / 2.0;
    let corner = ctx.frame.inset(padding);

    if radius > 0.0 {
        let diameter = 2.0 * radius;
        let top_left = RectF::new(corner.left, corner.top, corner.left + diameter, corner.top + diameter);
        surface.stroke_arc(top_left, 180.0, 90.0, stroke, color);
        let top_right = RectF::new(corner.right - diameter, corner.top, corner.right, corner.top + diameter);
        surface.stroke_arc(top_right, 270.0, 90.0, stroke, color);
        let bottom_right =
            RectF::new(corner.right - diameter, corner.bottom - diameter, corner.right, corner.bottom);
        surface.stroke_arc(bottom_right, 0.0, 90.0, stroke, color);
        let bottom_left = RectF::new(corner.left, corner.bottom - diameter, corner.left + diameter, corner.bottom);
        surface.stroke_arc(bottom_left, 90.0, 90.0, stroke, color);
    }

    let size = config.frame_corner_size;
    if size - radius <= 0.0 {
        return;
    }
    let mut line = |x0: f32, y0: f32, x1: f32, y1: f32| {
        surface.stroke_line(PointF::new(x0, y0), PointF::new(x1, y1), stroke, color);
    };

    // Top left
    line(corner.left - padding + radius, corner.top, corner.left + size, corner.top);
    line(corner.left, corner.top - padding + radius, corner.left, corner.top + size);
    // Top right
    line(corner.right - size, corner.top, corner.right + padding - radius, corner.top);
    line(corner.right, corner.top - padding + radius, corner.right, corner.top + size);
    // Bottom right
    line(corner.right + padding - radius, corner.bottom, corner.right - size, corner.bottom);
    line(corner.right, corner.bottom + padding - radius, corner.right, corner.bottom - size);
    // Bottom left
    line(corner.left + size, corner.bottom, corner.left - padding + radius, corner.bottom);
    line(corner.left, corner.bottom + padding - radius, corner.left, corner.bottom - size);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;
    use crate::surface::{Color, DrawOp, RecordingSurface};

    fn render(frame: RectF, phase: f32, config: &OverlayConfig) -> RecordingSurface {
        let ctx = FrameContext { width: 1000.0, height: 1000.0, frame, phase, config };
        let mut surface = RecordingSurface::new();
        Classic.render(&mut surface, &ctx);
        surface
    }

    #[test]
    fn zero_area_frame_draws_nothing() {
        let config = OverlayConfig::default();
        let surface = render(RectF::new(100.0, 100.0, 100.0, 500.0), 0.0, &config);
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn mask_is_drawn_first_with_window_cut_out() {
        let config = OverlayConfig::default();
        let frame = RectF::new(200.0, 200.0, 800.0, 800.0);
        let surface = render(frame, 0.0, &config);
        match surface.ops()[0] {
            DrawOp::FillExterior { window, color, .. } => {
                assert_eq!(window, frame);
                assert_eq!(color, config.mask_color);
            }
            ref other => panic!("expected mask first, got {other:?}"),
        }
    }

    #[test]
    fn transparent_mask_is_skipped() {
        let mut config = OverlayConfig::default();
        config.mask_color = Color::TRANSPARENT;
        let surface = render(RectF::new(200.0, 200.0, 800.0, 800.0), 0.0, &config);
        assert!(!surface.ops().iter().any(|op| matches!(op, DrawOp::FillExterior { .. })));
    }

    #[test]
    fn laser_line_tracks_phase() {
        let config = OverlayConfig::default();
        let frame = RectF::new(200.0, 200.0, 800.0, 800.0);
        let at = |phase: f32| {
            let surface = render(frame, phase, &config);
            surface
                .ops()
                .iter()
                .find_map(|op| match op {
                    DrawOp::FillOval { oval, .. } => Some(oval.top),
                    _ => None,
                })
                .unwrap()
        };
        assert_eq!(at(0.0), 200.0);
        let half = at(0.5);
        assert!(half > 400.0 && half < 600.0);
        assert!(at(0.9) > half);
    }

    #[test]
    fn laser_line_fades_upward() {
        let config = OverlayConfig::default();
        let surface = render(RectF::new(200.0, 200.0, 800.0, 800.0), 0.3, &config);
        let fill = surface
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::FillOval { fill, .. } => Some(*fill),
                _ => None,
            })
            .unwrap();
        match fill {
            Fill::VerticalGradient { top, bottom } => {
                assert_eq!(bottom, config.laser_color);
                assert_eq!(top.a, 0x01);
            }
            other => panic!("expected gradient, got {other:?}"),
        }
    }

    #[test]
    fn square_corners_draw_eight_bracket_lines() {
        let config = OverlayConfig::default();
        let surface = render(RectF::new(200.0, 200.0, 800.0, 800.0), 0.0, &config);
        let lines = surface.ops().iter().filter(|op| matches!(op, DrawOp::StrokeLine { .. })).count();
        assert_eq!(lines, 8);
        assert!(!surface.ops().iter().any(|op| matches!(op, DrawOp::StrokeArc { .. })));
    }

    #[test]
    fn rounded_corners_add_four_arcs() {
        let mut config = OverlayConfig::default();
        config.frame_corner_radius = 8.0;
        let surface = render(RectF::new(200.0, 200.0, 800.0, 800.0), 0.0, &config);
        let arcs = surface.ops().iter().filter(|op| matches!(op, DrawOp::StrokeArc { .. })).count();
        assert_eq!(arcs, 4);
    }
}
