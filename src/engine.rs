use std::path::Path;

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::pixels::PixelBuffer;
use crate::platform::Platform;
use crate::provider::{IconProvider, UnimplementedProvider};

/// Looks up the icon the host OS shows for a file or directory.
///
/// ```no_run
/// let engine = oxide_icon::IconEngine::new(&oxide_icon::EngineConfig::default())?;
///
/// if let Some(png) = engine.icon_png("C:/Windows/notepad.exe")? {
///     std::fs::write("notepad.png", png)?;
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct IconEngine {
    platform: Platform,
    provider: Box<dyn IconProvider>,
}

impl IconEngine {
    /// Resolve the platform (unless the config pins one) and set up its provider.
    ///
    /// Fails when the platform is unknown or its provider cannot be initialized.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let platform = match config.platform {
            Some(platform) => platform,
            None => Platform::current()?,
        };

        let provider: Box<dyn IconProvider> = match platform {
            Platform::Windows => windows_provider(config)?,
            Platform::MacOs | Platform::Linux => Box::new(UnimplementedProvider::new(platform)),
        };

        Ok(Self::with_provider(platform, provider))
    }

    pub fn with_provider(platform: Platform, provider: Box<dyn IconProvider>) -> Self {
        IconEngine { platform, provider }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Decoded icon for `path`, or `None` when the path does not exist or has no usable icon.
    pub fn icon_pixels<P: AsRef<Path>>(&self, path: P) -> Option<PixelBuffer> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("'{}' does not exist", path.display());
            return None;
        }
        self.provider.icon_pixels(path)
    }

    pub fn icon_image<P: AsRef<Path>>(&self, path: P) -> Option<RgbaImage> {
        self.icon_pixels(path)?.into_rgba_image()
    }

    /// The icon resized to the requested box.
    ///
    /// A zero width or height keeps the icon's own dimension. With
    /// `preserve_ratio` the result fits inside the box without distortion;
    /// `smooth` picks Lanczos3 over nearest-neighbour sampling.
    pub fn icon_image_scaled<P: AsRef<Path>>(
        &self,
        path: P,
        width: u32,
        height: u32,
        preserve_ratio: bool,
        smooth: bool,
    ) -> Option<RgbaImage> {
        let icon = self.icon_image(path)?;
        Some(scale(&icon, width, height, preserve_ratio, smooth))
    }

    /// The icon encoded as PNG.
    pub fn icon_png<P: AsRef<Path>>(&self, path: P) -> Result<Option<Vec<u8>>> {
        self.icon_pixels(path)
            .map(|pixels| pixels.encode_png())
            .transpose()
    }

    /// The icon as a `data:image/png;base64,...` URI.
    pub fn icon_data_uri<P: AsRef<Path>>(&self, path: P) -> Result<Option<String>> {
        self.icon_pixels(path)
            .map(|pixels| pixels.to_data_uri())
            .transpose()
    }
}

impl std::fmt::Debug for IconEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconEngine")
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

#[cfg(windows)]
fn windows_provider(config: &EngineConfig) -> Result<Box<dyn IconProvider>> {
    use crate::provider::DecodingProvider;
    use crate::win32::ShellIconProvider;

    let handles = ShellIconProvider::new(config.icon_size, config.attempts())?;
    Ok(Box::new(DecodingProvider::new(handles)))
}

#[cfg(not(windows))]
fn windows_provider(_config: &EngineConfig) -> Result<Box<dyn IconProvider>> {
    Err(crate::error::Error::UnsupportedPlatform(format!(
        "windows icons requested on {}",
        std::env::consts::OS
    )))
}

fn scale(
    icon: &RgbaImage,
    width: u32,
    height: u32,
    preserve_ratio: bool,
    smooth: bool,
) -> RgbaImage {
    let (src_w, src_h) = icon.dimensions();
    let width = if width == 0 { src_w } else { width };
    let height = if height == 0 { src_h } else { height };

    let (width, height) = if preserve_ratio {
        let ratio = f64::min(width as f64 / src_w as f64, height as f64 / src_h as f64);
        (
            ((src_w as f64 * ratio).round() as u32).max(1),
            ((src_h as f64 * ratio).round() as u32).max(1),
        )
    } else {
        (width, height)
    };

    if (width, height) == (src_w, src_h) {
        return icon.clone();
    }

    let filter = if smooth {
        FilterType::Lanczos3
    } else {
        FilterType::Nearest
    };
    imageops::resize(icon, width, height, filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 0])
            }
        })
    }

    #[test]
    fn scale_keeps_size_when_unrequested() {
        let icon = checker(8, 4);
        assert_eq!(scale(&icon, 0, 0, true, true).dimensions(), (8, 4));
        assert_eq!(scale(&icon, 0, 0, false, false), icon);
    }

    #[test]
    fn scale_stretches_without_ratio() {
        let icon = checker(8, 4);
        assert_eq!(scale(&icon, 16, 16, false, true).dimensions(), (16, 16));
    }

    #[test]
    fn scale_fits_inside_box_with_ratio() {
        let icon = checker(256, 128);
        assert_eq!(scale(&icon, 64, 64, true, true).dimensions(), (64, 32));
        assert_eq!(scale(&icon, 1000, 16, true, false).dimensions(), (32, 16));
    }

    #[test]
    fn nearest_scaling_preserves_hard_alpha() {
        let icon = checker(2, 2);
        let big = scale(&icon, 4, 4, false, false);
        assert!(big.pixels().all(|p| p.0[3] == 0 || p.0[3] == 255));
    }

    #[test]
    fn pinned_unimplemented_platform_builds() {
        let config = EngineConfig {
            platform: Some(Platform::MacOs),
            ..EngineConfig::default()
        };
        let engine = IconEngine::new(&config).unwrap();
        assert_eq!(engine.platform(), Platform::MacOs);
        assert!(engine.icon_pixels(std::env::current_dir().unwrap()).is_none());
    }

    #[cfg(not(windows))]
    #[test]
    fn windows_provider_unavailable_elsewhere() {
        let config = EngineConfig {
            platform: Some(Platform::Windows),
            ..EngineConfig::default()
        };
        assert!(matches!(
            IconEngine::new(&config),
            Err(crate::error::Error::UnsupportedPlatform(_))
        ));
    }
}
