//! Camera-scan viewfinder overlay: a dimmed mask with a transparent scan
//! window, an animated sweep, and tappable result markers, rendered onto a
//! host-provided [`Surface`].
//!
//! The crate is platform-agnostic. Hosts supply three capabilities and drive
//! the lifecycle:
//!
//! * a [`Surface`] implementation that maps draw calls onto their canvas,
//! * a [`Scheduler`] that re-enqueues animation ticks onto the UI loop,
//! * a redraw handler invoked when the overlay wants a new draw pass.
//!
//! ```
//! use std::rc::Rc;
//! use viewfinder::{ManualScheduler, RecordingSurface, ViewfinderOverlay};
//!
//! let scheduler = Rc::new(ManualScheduler::new());
//! let mut overlay = ViewfinderOverlay::new(scheduler.clone());
//! overlay.on_layout(1080.0, 1920.0);
//! overlay.on_attached();
//!
//! let mut surface = RecordingSurface::new();
//! overlay.on_draw(&mut surface);
//! assert!(!surface.ops().is_empty());
//! ```

mod animation;
mod config;
mod geometry;
mod markers;
mod overlay;
mod style;
mod surface;
mod tiler;

pub use animation::{ManualScheduler, ScheduleHandle, Scheduler, TickCallback};
pub use config::{ConfigError, FrameGravity, LabelLocation, OverlayConfig};
pub use geometry::{PointF, RectF};
pub use markers::{MarkerClickEvent, ResultMarker};
pub use overlay::ViewfinderOverlay;
pub use style::{FrameContext, ViewfinderStyle};
pub use surface::{Color, DrawOp, Fill, ParseColorError, RecordingSurface, Surface};
pub use tiler::VectorImage;
