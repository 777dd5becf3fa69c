use std::path::Path;

use crate::decoder::{self, GdiApi};
use crate::pixels::PixelBuffer;
use crate::platform::Platform;

/// Hands out native icon handles for filesystem paths.
pub trait HandleProvider {
    type Gdi: GdiApi;

    fn gdi(&self) -> &Self::Gdi;

    /// The icon the OS associates with `path`, or `None` when there is none.
    ///
    /// The caller owns the returned handle.
    fn acquire(&self, path: &Path) -> Option<<Self::Gdi as GdiApi>::Icon>;
}

/// Produces decoded icons for filesystem paths.
pub trait IconProvider: Send + Sync {
    fn icon_pixels(&self, path: &Path) -> Option<PixelBuffer>;
}

/// Acquires a handle and decodes it.
#[derive(Debug)]
pub struct DecodingProvider<P> {
    handles: P,
}

impl<P: HandleProvider> DecodingProvider<P> {
    pub fn new(handles: P) -> Self {
        DecodingProvider { handles }
    }

    pub fn handles(&self) -> &P {
        &self.handles
    }
}

impl<P> IconProvider for DecodingProvider<P>
where
    P: HandleProvider + Send + Sync,
{
    fn icon_pixels(&self, path: &Path) -> Option<PixelBuffer> {
        let Some(icon) = self.handles.acquire(path) else {
            log::debug!("no icon handle for '{}'", path.display());
            return None;
        };
        decoder::decode(self.handles.gdi(), icon)
    }
}

/// Stands in for platforms without an icon implementation. Never finds anything.
#[derive(Debug, Copy, Clone)]
pub struct UnimplementedProvider {
    platform: Platform,
}

impl UnimplementedProvider {
    pub fn new(platform: Platform) -> Self {
        UnimplementedProvider { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

impl IconProvider for UnimplementedProvider {
    fn icon_pixels(&self, path: &Path) -> Option<PixelBuffer> {
        log::trace!(
            "icon lookup for '{}' is not implemented on {}",
            path.display(),
            self.platform
        );
        None
    }
}
