//! Turns a native icon handle into a [`PixelBuffer`].
//!
//! The OS calls involved are reached through [`GdiApi`], so the same
//! decoding path runs against Win32 GDI and against test doubles.
//!
//! Every resource the decoder touches (the icon itself, its color and mask
//! bitmaps, the device context used for the pixel transfer) is held by a
//! [`Scoped`] guard and released exactly once when the guard drops, on
//! every exit path. Guards are declared so they drop in the order device
//! context, color bitmap, mask bitmap, icon.

use std::ops::Deref;

use crate::pixels::PixelBuffer;

/// Bits per pixel requested from the OS regardless of the icon's native depth.
pub const TARGET_BIT_COUNT: u16 = 32;

/// The bitmaps making up an icon, as reported by the OS.
///
/// Both are owned by whoever called [`GdiApi::icon_info`].
#[derive(Debug)]
pub struct IconInfo<B> {
    pub color: Option<B>,
    pub mask: Option<B>,
}

/// Dimensions and pixel format of a device-independent bitmap.
///
/// Compression is always none. A positive `height` describes a bottom-up
/// bitmap, the first scanline being the visual bottom row.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BitmapDescriptor {
    pub width: i32,
    pub height: i32,
    pub bit_count: u16,
    pub planes: u16,
}

impl BitmapDescriptor {
    /// 32-bit BGRA, one plane.
    pub fn bgra32(width: i32, height: i32) -> Self {
        BitmapDescriptor {
            width,
            height,
            bit_count: TARGET_BIT_COUNT,
            planes: 1,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Size of the pixel data in bytes, `None` for degenerate or overflowing sizes.
    pub fn byte_len(&self) -> Option<usize> {
        if self.is_degenerate() {
            return None;
        }
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.bit_count as usize / 8)
    }
}

/// The OS drawing primitives the decoder needs.
///
/// Methods returning a resource hand ownership to the caller; the
/// `release_*`, `delete_*` and `destroy_*` methods give it back.
pub trait GdiApi {
    type Icon;
    type Bitmap;
    type Dc;

    /// Split an icon into its bitmaps. `None` when the OS refuses.
    fn icon_info(&self, icon: &Self::Icon) -> Option<IconInfo<Self::Bitmap>>;

    /// Read a bitmap's dimensions without fetching its pixels.
    fn probe(&self, bitmap: &Self::Bitmap) -> Option<BitmapDescriptor>;

    /// A device context for the whole screen.
    fn screen_dc(&self) -> Option<Self::Dc>;

    /// Render `bitmap` into `dest` in the format `desc` describes.
    /// Returns the number of scanlines copied.
    fn fetch_bits(
        &self,
        dc: &Self::Dc,
        bitmap: &Self::Bitmap,
        desc: &BitmapDescriptor,
        dest: &mut [u8],
    ) -> i32;

    fn release_dc(&self, dc: &Self::Dc);

    fn delete_bitmap(&self, bitmap: &Self::Bitmap);

    fn destroy_icon(&self, icon: &Self::Icon);
}

/// Holds a native resource and releases it when dropped.
pub struct Scoped<'a, G: ?Sized, T> {
    gdi: &'a G,
    resource: T,
    release: fn(&G, &T),
}

impl<'a, G: ?Sized, T> Scoped<'a, G, T> {
    pub fn new(gdi: &'a G, resource: T, release: fn(&G, &T)) -> Self {
        Scoped {
            gdi,
            resource,
            release,
        }
    }
}

impl<G: ?Sized, T> Deref for Scoped<'_, G, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.resource
    }
}

impl<G: ?Sized, T> Drop for Scoped<'_, G, T> {
    fn drop(&mut self) {
        (self.release)(self.gdi, &self.resource);
    }
}

/// Decode `icon` into a top-down RGBA buffer, taking ownership of it.
///
/// Returns `None` when the icon has no color bitmap, has a degenerate size,
/// or any OS call fails. The icon and everything obtained from it are
/// released before this returns, whatever the outcome.
pub fn decode<G: GdiApi>(gdi: &G, icon: G::Icon) -> Option<PixelBuffer> {
    let icon = Scoped::new(gdi, icon, G::destroy_icon);

    let Some(info) = gdi.icon_info(&icon) else {
        log::warn!("could not query icon bitmaps");
        return None;
    };
    let _mask = info.mask.map(|mask| Scoped::new(gdi, mask, G::delete_bitmap));
    let Some(color) = info.color else {
        log::debug!("icon has no color bitmap");
        return None;
    };
    let color = Scoped::new(gdi, color, G::delete_bitmap);

    let Some(probe) = gdi.probe(&color) else {
        log::warn!("could not read color bitmap header");
        return None;
    };
    if probe.is_degenerate() {
        log::debug!("degenerate icon bitmap {}x{}", probe.width, probe.height);
        return None;
    }

    // Always ask for 32 bits so the alpha channel survives.
    let desc = BitmapDescriptor::bgra32(probe.width, probe.height);
    let len = desc.byte_len()?;

    let Some(dc) = gdi.screen_dc() else {
        log::warn!("no device context available");
        return None;
    };
    let dc = Scoped::new(gdi, dc, G::release_dc);

    let mut bytes = vec![0u8; len];
    let lines = gdi.fetch_bits(&dc, &color, &desc, &mut bytes);
    if lines < desc.height {
        log::warn!("fetched {lines} of {} scanlines", desc.height);
        return None;
    }

    let pixels =
        PixelBuffer::from_bgra_bottom_up(desc.width as u32, desc.height as u32, &bytes)?;
    log::trace!("decoded {}x{} icon", pixels.width(), pixels.height());
    Some(pixels)
}
