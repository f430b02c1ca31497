use crate::config::OverlayConfig;
use crate::geometry::{PointF, RectF};
use crate::surface::Surface;
use image::RgbaImage;
use std::rc::Rc;

/// Tap tolerance ratio around the default marker, about (1 + √2) / 2.
const DEFAULT_RANGE_RATIO: f32 = 1.2;

/// A detection-result marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultMarker {
    /// Assigned by insertion order, re-numbered 0..n-1 on every replace.
    pub id: usize,
    pub position: PointF,
}

/// Delivered to the registered click listener when a marker is tapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerClickEvent {
    pub marker_id: usize,
    pub position: PointF,
}

pub type ClickListener = Box<dyn FnMut(MarkerClickEvent)>;

/// Holds the marker collection, draws the glyphs, and resolves taps.
#[derive(Default)]
pub(crate) struct MarkerLayer {
    markers: Vec<ResultMarker>,
    glyph: Option<Rc<RgbaImage>>,
    listener: Option<ClickListener>,
}

impl MarkerLayer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replaces the collection wholesale. Ids are re-assigned 0..n-1 in input
    /// order; identity is not stable across calls. Off-screen coordinates are
    /// accepted and simply clipped away by the surface.
    pub(crate) fn set_markers(&mut self, points: Vec<PointF>) {
        self.markers = points
            .into_iter()
            .enumerate()
            .map(|(id, position)| ResultMarker { id, position })
            .collect();
    }

    pub(crate) fn markers(&self) -> &[ResultMarker] {
        &self.markers
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Overrides the glyph for all markers; `None` restores the built-in
    /// default (a filled circle with an outer stroke).
    pub(crate) fn set_glyph(&mut self, glyph: Option<Rc<RgbaImage>>) {
        self.glyph = glyph;
    }

    /// Registers the single active listener; the last registration wins.
    pub(crate) fn set_on_click(&mut self, listener: ClickListener) {
        self.listener = Some(listener);
    }

    pub(crate) fn render(&self, surface: &mut dyn Surface, config: &OverlayConfig) {
        for marker in &self.markers {
            match &self.glyph {
                Some(glyph) => {
                    let half_width = glyph.width() as f32 / 2.0;
                    let half_height = glyph.height() as f32 / 2.0;
                    let dst = RectF::new(
                        marker.position.x - half_width,
                        marker.position.y - half_height,
                        marker.position.x + half_width,
                        marker.position.y + half_height,
                    );
                    surface.draw_bitmap(glyph, dst);
                }
                None => {
                    let stroke_radius = config.point_radius * config.point_stroke_ratio;
                    surface.fill_circle(marker.position, stroke_radius, config.point_stroke_color);
                    surface.fill_circle(marker.position, config.point_radius, config.point_color);
                }
            }
        }
    }

    /// Hit-tests a pointer-up at `(x, y)` against the markers, topmost first,
    /// and dispatches the registered listener on the first match. Returns
    /// whether the event was consumed.
    pub(crate) fn handle_pointer_up(&mut self, x: f32, y: f32, config: &OverlayConfig) -> bool {
        let point = PointF::new(x, y);
        let hit = self
            .markers
            .iter()
            .rev()
            .find(|marker| self.hit_box(marker.position, config).contains(point))
            .copied();
        let Some(marker) = hit else {
            return false;
        };
        if let Some(listener) = self.listener.as_mut() {
            listener(MarkerClickEvent { marker_id: marker.id, position: marker.position });
        }
        true
    }

    /// The tappable region: the glyph's bounding box centered on the marker.
    /// The default marker widens its box by a tap tolerance.
    fn hit_box(&self, position: PointF, config: &OverlayConfig) -> RectF {
        let (half_width, half_height) = match &self.glyph {
            Some(glyph) => (glyph.width() as f32 / 2.0, glyph.height() as f32 / 2.0),
            None => {
                let range = config.point_radius * config.point_stroke_ratio * DEFAULT_RANGE_RATIO;
                (range, range)
            }
        };
        RectF::new(
            position.x - half_width,
            position.y - half_height,
            position.x + half_width,
            position.y + half_height,
        )
    }
}
