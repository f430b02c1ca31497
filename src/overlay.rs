use crate::animation::{Scheduler, SweepDriver};
use crate::config::OverlayConfig;
use crate::geometry::{resolve_frame, PointF, RectF};
use crate::markers::{MarkerClickEvent, MarkerLayer, ResultMarker};
use crate::style::{renderer_for, FrameContext, ViewfinderStyle};
use crate::surface::Surface;
use crate::tiler::{BackgroundTiler, VectorImage};
use image::RgbaImage;
use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Coalesces redraw requests: any number of synchronous mutations before the
/// next draw pass produce a single host invalidate.
pub(crate) struct RedrawScheduler {
    handler: RefCell<Option<Box<dyn FnMut()>>>,
    pending: Cell<bool>,
}

impl RedrawScheduler {
    fn new() -> Self {
        Self { handler: RefCell::new(None), pending: Cell::new(false) }
    }

    fn set_handler(&self, handler: Box<dyn FnMut()>) {
        *self.handler.borrow_mut() = Some(handler);
    }

    fn request(&self) {
        if self.pending.get() {
            return;
        }
        let mut handler = self.handler.borrow_mut();
        // Latch only when someone is listening; a request fired before the
        // host installs its handler must not swallow the next invalidate.
        let Some(handler) = handler.as_mut() else {
            return;
        };
        self.pending.set(true);
        handler();
    }

    fn mark_drawn(&self) {
        self.pending.set(false);
    }
}

/// The overlay composer: owns configuration, the sweep driver, the marker
/// layer, and the background tiler, and wires them to the host surface's
/// lifecycle.
///
/// Everything runs on the host's single UI thread; configuration setters,
/// drawing, and pointer handling never race because nothing here leaves that
/// thread.
pub struct ViewfinderOverlay {
    config: OverlayConfig,
    bounds: Option<(f32, f32)>,
    frame: Option<RectF>,
    driver: SweepDriver,
    markers: MarkerLayer,
    tiler: BackgroundTiler,
    redraw: Rc<RedrawScheduler>,
    attached: bool,
}

impl ViewfinderOverlay {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self::with_config(OverlayConfig::default(), scheduler)
    }

    pub fn with_config(mut config: OverlayConfig, scheduler: Rc<dyn Scheduler>) -> Self {
        config.sanitize();
        let redraw = Rc::new(RedrawScheduler::new());
        let on_tick = redraw.clone();
        let driver = SweepDriver::new(scheduler, Rc::new(move || on_tick.request()));
        Self {
            config,
            bounds: None,
            frame: None,
            driver,
            markers: MarkerLayer::new(),
            tiler: BackgroundTiler::new(),
            redraw,
            attached: false,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Current sweep phase in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.driver.phase()
    }

    /// The scan window resolved by the last layout pass.
    pub fn scan_region(&self) -> Option<RectF> {
        self.frame
    }

    /// The current marker collection, in draw order.
    pub fn markers(&self) -> &[ResultMarker] {
        self.markers.markers()
    }

    /// Registers the host's invalidate callback, invoked at most once per
    /// pending draw pass.
    pub fn set_redraw_handler(&mut self, handler: impl FnMut() + 'static) {
        self.redraw.set_handler(Box::new(handler));
    }

    /// Switches the visual variant. The sweep phase is left untouched, so a
    /// mid-animation switch continues from the same position.
    pub fn set_viewfinder_style(&mut self, style: ViewfinderStyle) {
        self.config.style = style;
        self.redraw.request();
    }

    /// Overrides the marker glyph; `None` restores the built-in default.
    pub fn set_marker_glyph(&mut self, glyph: Option<Rc<RgbaImage>>) {
        self.markers.set_glyph(glyph);
        self.redraw.request();
    }

    /// Sets or clears the tiled background source. Rasterization happens here
    /// (once per source and intrinsic size), not on the draw pass.
    pub fn set_tiled_background(&mut self, source: Option<Rc<dyn VectorImage>>) {
        self.tiler.set_source(source);
        self.redraw.request();
    }

    /// Replaces the marker collection wholesale; ids are re-assigned 0..n-1
    /// in input order and are not stable across calls.
    pub fn set_markers<P: Into<PointF>>(&mut self, points: impl IntoIterator<Item = P>) {
        self.markers.set_markers(points.into_iter().map(Into::into).collect());
        self.redraw.request();
    }

    /// Registers the marker click listener, replacing any previous one.
    pub fn set_on_marker_click(&mut self, listener: impl FnMut(MarkerClickEvent) + 'static) {
        self.markers.set_on_click(Box::new(listener));
    }

    /// Mutates the configuration in place. Values are clamped afterwards, the
    /// scan frame is re-resolved, and one redraw is scheduled. The sweep
    /// phase is never reset by configuration changes.
    pub fn update_config(&mut self, mutate: impl FnOnce(&mut OverlayConfig)) {
        mutate(&mut self.config);
        self.config.sanitize();
        self.resolve();
        if self.driver.is_running() {
            // Pick up a new cadence; stop/start preserves the phase.
            self.driver.stop();
            self.start_driver();
        }
        self.redraw.request();
    }

    /// Host surface attached: begin animating.
    pub fn on_attached(&mut self) {
        debug!("overlay attached");
        self.attached = true;
        self.start_driver();
    }

    /// Host surface detached or hidden: stop the tick so no redraw requests
    /// dangle past the surface's lifetime.
    pub fn on_detached(&mut self) {
        debug!("overlay detached");
        self.attached = false;
        self.driver.stop();
    }

    /// Layout pass: the scan frame is recomputed from scratch, never carried
    /// over from previous bounds.
    pub fn on_layout(&mut self, width: f32, height: f32) {
        self.bounds = Some((width, height));
        self.resolve();
        self.redraw.request();
    }

    /// Draw pass: background, then mask and frame decoration, then markers.
    pub fn on_draw(&mut self, surface: &mut dyn Surface) {
        self.redraw.mark_drawn();
        let Some((width, height)) = self.bounds else {
            return;
        };
        self.draw_background(surface, width, height);
        if let Some(frame) = self.frame {
            let ctx = FrameContext { width, height, frame, phase: self.driver.phase(), config: &self.config };
            renderer_for(self.config.style).render(surface, &ctx);
        }
        self.markers.render(surface, &self.config);
    }

    /// Routes a pointer-up into the marker layer. Returns whether the event
    /// was consumed; unconsumed events belong to the host's other handlers.
    pub fn on_pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.markers.handle_pointer_up(x, y, &self.config)
    }

    fn start_driver(&mut self) {
        if !self.attached {
            return;
        }
        let interval = Duration::from_millis(self.config.tick_interval_ms);
        self.driver.start(interval, self.config.sweep_step);
    }

    fn resolve(&mut self) {
        self.frame = self.bounds.and_then(|(width, height)| resolve_frame(width, height, &self.config));
    }

    fn draw_background(&mut self, surface: &mut dyn Surface, width: f32, height: f32) {
        let Some(tile) = self.tiler.tile() else {
            return;
        };
        let tile_width = tile.width() as f32;
        let tile_height = tile.height() as f32;
        let mut y = 0.0;
        while y < height {
            let mut x = 0.0;
            while x < width {
                surface.draw_bitmap(&tile, RectF::from_origin_size(x, y, tile_width, tile_height));
                x += tile_width;
            }
            y += tile_height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ManualScheduler;
    use crate::surface::{DrawOp, RecordingSurface};

    fn overlay() -> (ViewfinderOverlay, Rc<ManualScheduler>) {
        let scheduler = Rc::new(ManualScheduler::new());
        (ViewfinderOverlay::new(scheduler.clone()), scheduler)
    }

    fn laid_out_overlay() -> (ViewfinderOverlay, Rc<ManualScheduler>) {
        let (mut overlay, scheduler) = overlay();
        overlay.on_layout(1000.0, 1000.0);
        (overlay, scheduler)
    }

    #[test]
    fn synchronous_mutations_coalesce_into_one_invalidate() {
        let (mut overlay, _) = laid_out_overlay();
        let invalidates = Rc::new(Cell::new(0u32));
        let counter = invalidates.clone();
        overlay.set_redraw_handler(move || counter.set(counter.get() + 1));

        overlay.set_viewfinder_style(ViewfinderStyle::Popular);
        overlay.set_markers(vec![(10, 10)]);
        overlay.update_config(|config| config.frame_ratio = 0.5);
        assert_eq!(invalidates.get(), 1);

        // The draw pass re-arms the gate.
        overlay.on_draw(&mut RecordingSurface::new());
        overlay.set_viewfinder_style(ViewfinderStyle::Classic);
        assert_eq!(invalidates.get(), 2);
    }

    #[test]
    fn requests_before_handler_install_do_not_swallow_invalidates() {
        let (mut overlay, _) = overlay();
        // Layout runs before the host wires its invalidate callback.
        overlay.on_layout(1000.0, 1000.0);
        let invalidates = Rc::new(Cell::new(0u32));
        let counter = invalidates.clone();
        overlay.set_redraw_handler(move || counter.set(counter.get() + 1));
        overlay.set_viewfinder_style(ViewfinderStyle::Popular);
        assert_eq!(invalidates.get(), 1);
    }

    #[test]
    fn markers_are_readable_back_in_draw_order() {
        let (mut overlay, _) = overlay();
        overlay.set_markers(vec![(10.0, 20.0), (30.0, 40.0)]);
        let markers = overlay.markers();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].id, 0);
        assert_eq!(markers[1].position, crate::geometry::PointF::new(30.0, 40.0));
    }

    #[test]
    fn draw_before_layout_is_a_no_op() {
        let (mut overlay, _) = overlay();
        let mut surface = RecordingSurface::new();
        overlay.on_draw(&mut surface);
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn draw_order_is_background_mask_markers() {
        let (mut overlay, _) = laid_out_overlay();
        struct Tile;
        impl VectorImage for Tile {
            fn intrinsic_size(&self) -> (u32, u32) {
                (500, 500)
            }
            fn rasterize(&self, width: u32, height: u32) -> RgbaImage {
                RgbaImage::new(width, height)
            }
        }
        overlay.set_tiled_background(Some(Rc::new(Tile)));
        overlay.set_markers(vec![(300, 300)]);
        let mut surface = RecordingSurface::new();
        overlay.on_draw(&mut surface);

        let position = |predicate: fn(&DrawOp) -> bool| surface.ops().iter().position(predicate).unwrap();
        let background = position(|op| matches!(op, DrawOp::Bitmap { .. }));
        let mask = position(|op| matches!(op, DrawOp::FillExterior { .. }));
        let marker = position(|op| matches!(op, DrawOp::FillCircle { .. }));
        assert!(background < mask);
        assert!(mask < marker);
    }

    #[test]
    fn background_tiles_cover_bounds() {
        let (mut overlay, _) = laid_out_overlay();
        struct Tile;
        impl VectorImage for Tile {
            fn intrinsic_size(&self) -> (u32, u32) {
                (400, 400)
            }
            fn rasterize(&self, width: u32, height: u32) -> RgbaImage {
                RgbaImage::new(width, height)
            }
        }
        overlay.set_tiled_background(Some(Rc::new(Tile)));
        let mut surface = RecordingSurface::new();
        overlay.on_draw(&mut surface);
        let tiles = surface.ops().iter().filter(|op| matches!(op, DrawOp::Bitmap { .. })).count();
        // 1000x1000 bounds need a 3x3 grid of 400px tiles.
        assert_eq!(tiles, 9);
    }

    #[test]
    fn attach_starts_animation_and_detach_stops_it() {
        let (mut overlay, scheduler) = laid_out_overlay();
        overlay.on_attached();
        scheduler.advance(Duration::from_millis(100));
        let phase = overlay.phase();
        assert!(phase > 0.0);

        overlay.on_detached();
        scheduler.advance(Duration::from_millis(100));
        assert_eq!(overlay.phase(), phase);

        // Re-attach resumes from where it left off.
        overlay.on_attached();
        scheduler.advance(Duration::from_millis(20));
        assert!(overlay.phase() > phase);
    }

    #[test]
    fn style_switch_preserves_phase() {
        let (mut overlay, scheduler) = laid_out_overlay();
        overlay.on_attached();
        scheduler.advance(Duration::from_millis(200));
        let phase = overlay.phase();
        assert!(phase > 0.0);
        overlay.set_viewfinder_style(ViewfinderStyle::Popular);
        assert_eq!(overlay.phase(), phase);
    }

    #[test]
    fn config_update_preserves_phase() {
        let (mut overlay, scheduler) = laid_out_overlay();
        overlay.on_attached();
        scheduler.advance(Duration::from_millis(200));
        let phase = overlay.phase();
        overlay.update_config(|config| config.tick_interval_ms = 33);
        assert_eq!(overlay.phase(), phase);
    }

    #[test]
    fn layout_recomputes_frame() {
        let (mut overlay, _) = laid_out_overlay();
        let before = overlay.scan_region().unwrap();
        overlay.on_layout(400.0, 800.0);
        let after = overlay.scan_region().unwrap();
        assert_ne!(before, after);
        assert!(after.right <= 400.0);
    }

    #[test]
    fn pointer_up_consumes_only_marker_hits() {
        let (mut overlay, _) = laid_out_overlay();
        let clicked = Rc::new(RefCell::new(Vec::new()));
        let sink = clicked.clone();
        overlay.set_on_marker_click(move |event| sink.borrow_mut().push(event.marker_id));
        overlay.set_markers(vec![(100, 100), (100, 100)]);
        assert!(overlay.on_pointer_up(100.0, 100.0));
        assert!(!overlay.on_pointer_up(900.0, 900.0));
        assert_eq!(*clicked.borrow(), vec![1]);
    }
}
