mod classic;
mod popular;

use crate::config::{LabelLocation, OverlayConfig};
use crate::geometry::RectF;
use crate::surface::Surface;
use serde::Deserialize;
use strum::{Display, EnumString};

/// Visual variant of the viewfinder overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ViewfinderStyle {
    /// Scan frame with corner brackets and a sweeping laser line.
    #[default]
    Classic,
    /// Rounded scan frame with a grid sweep, in the style of full-screen
    /// scanners.
    Popular,
}

/// Everything a style renderer needs for one draw pass.
#[derive(Debug)]
pub struct FrameContext<'a> {
    /// View width in pixels.
    pub width: f32,
    /// View height in pixels.
    pub height: f32,
    /// The resolved scan frame.
    pub frame: RectF,
    /// Sweep phase in `[0, 1)`, owned by the animation driver.
    pub phase: f32,
    pub config: &'a OverlayConfig,
}

impl FrameContext<'_> {
    pub(crate) fn bounds(&self) -> RectF {
        RectF::new(0.0, 0.0, self.width, self.height)
    }

    /// Top edge of the sweep decoration for the current phase. The sweep
    /// travels from the frame top down to `frame.bottom - inset` and wraps.
    pub(crate) fn sweep_top(&self, inset: f32) -> f32 {
        let travel = (self.frame.height() - inset).max(0.0);
        self.frame.top + self.phase * travel
    }
}

/// Renders one visual variant onto the surface.
///
/// Stateless beyond the selecting enum; all mutable state (phase, geometry,
/// configuration) arrives through the context.
pub(crate) trait StyleRenderer {
    fn render(&self, surface: &mut dyn Surface, ctx: &FrameContext);
}

/// Get the renderer implementation for a given style
pub(crate) fn renderer_for(style: ViewfinderStyle) -> Box<dyn StyleRenderer> {
    match style {
        ViewfinderStyle::Classic => Box::new(classic::Classic),
        ViewfinderStyle::Popular => Box::new(popular::Popular),
    }
}

/// Draws the label text above or below the frame, when configured.
pub(crate) fn draw_label(surface: &mut dyn Surface, ctx: &FrameContext) {
    let config = ctx.config;
    let Some(text) = config.label_text.as_deref() else {
        return;
    };
    if text.is_empty() {
        return;
    }
    let baseline = match config.label_text_location {
        LabelLocation::Bottom => ctx.frame.bottom + config.label_text_padding + config.label_text_size,
        LabelLocation::Top => ctx.frame.top - config.label_text_padding,
    };
    let anchor = crate::geometry::PointF::new(ctx.frame.center_x(), baseline);
    surface.draw_text(text, anchor, config.label_text_size, config.label_text_color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};
    use std::str::FromStr;

    fn context(config: &OverlayConfig) -> FrameContext<'_> {
        FrameContext {
            width: 1000.0,
            height: 1000.0,
            frame: RectF::new(200.0, 200.0, 800.0, 800.0),
            phase: 0.0,
            config,
        }
    }

    #[test]
    fn style_parses_from_text() {
        assert_eq!(ViewfinderStyle::from_str("classic").unwrap(), ViewfinderStyle::Classic);
        assert_eq!(ViewfinderStyle::from_str("Popular").unwrap(), ViewfinderStyle::Popular);
        assert!(ViewfinderStyle::from_str("fancy").is_err());
    }

    #[test]
    fn sweep_top_spans_frame_and_wraps_by_phase() {
        let config = OverlayConfig::default();
        let mut ctx = context(&config);
        assert_eq!(ctx.sweep_top(0.0), 200.0);
        ctx.phase = 0.5;
        assert_eq!(ctx.sweep_top(0.0), 500.0);
        // The inset keeps the decoration inside the frame at phase end.
        ctx.phase = 1.0;
        assert_eq!(ctx.sweep_top(100.0), 700.0);
    }

    #[test]
    fn label_drawn_below_frame_by_default() {
        let mut config = OverlayConfig::default();
        config.label_text = Some("Aim at the code".into());
        let ctx = context(&config);
        let mut surface = RecordingSurface::new();
        draw_label(&mut surface, &ctx);
        match &surface.ops()[0] {
            DrawOp::Text { text, anchor, .. } => {
                assert_eq!(text, "Aim at the code");
                assert_eq!(anchor.x, 500.0);
                assert!(anchor.y > 800.0);
            }
            other => panic!("unexpected op: {other:?}"),
        }
    }

    #[test]
    fn missing_label_draws_nothing() {
        let config = OverlayConfig::default();
        let ctx = context(&config);
        let mut surface = RecordingSurface::new();
        draw_label(&mut surface, &ctx);
        assert!(surface.ops().is_empty());
    }
}
