use image::RgbaImage;
use log::debug;
use std::rc::Rc;

/// A vector image the host can rasterize at a requested pixel size.
pub trait VectorImage {
    /// Natural size in pixels; may change with display density.
    fn intrinsic_size(&self) -> (u32, u32);

    /// Rasterizes the image at the given size. CPU-bound and synchronous;
    /// callers needing non-blocking behavior offload the call themselves.
    fn rasterize(&self, width: u32, height: u32) -> RgbaImage;
}

struct CachedTile {
    source: Rc<dyn VectorImage>,
    size: (u32, u32),
    bitmap: Rc<RgbaImage>,
}

/// Turns a vector source into a repeatable raster tile, rasterizing once per
/// source and intrinsic size rather than on every draw pass.
#[derive(Default)]
pub(crate) struct BackgroundTiler {
    cache: Option<CachedTile>,
}

impl BackgroundTiler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sets or clears the vector source. Setting the same source at an
    /// unchanged intrinsic size is a cache hit and does not re-rasterize.
    pub(crate) fn set_source(&mut self, source: Option<Rc<dyn VectorImage>>) {
        let Some(source) = source else {
            self.cache = None;
            return;
        };
        let size = source.intrinsic_size();
        if size.0 == 0 || size.1 == 0 {
            self.cache = None;
            return;
        }
        if let Some(cache) = &self.cache {
            if Rc::ptr_eq(&cache.source, &source) && cache.size == size {
                return;
            }
        }
        debug!("rasterizing background tile at {}x{}", size.0, size.1);
        let bitmap = Rc::new(source.rasterize(size.0, size.1));
        self.cache = Some(CachedTile { source, size, bitmap });
    }

    /// The current tile. Re-rasterizes only when the source's intrinsic size
    /// changed since the cached raster was made (e.g. a density change).
    pub(crate) fn tile(&mut self) -> Option<Rc<RgbaImage>> {
        let cache = self.cache.as_mut()?;
        let size = cache.source.intrinsic_size();
        if size.0 == 0 || size.1 == 0 {
            return None;
        }
        if cache.size != size {
            debug!("background tile size changed to {}x{}, re-rasterizing", size.0, size.1);
            cache.bitmap = Rc::new(cache.source.rasterize(size.0, size.1));
            cache.size = size;
        }
        Some(cache.bitmap.clone())
    }
}
