//! Ask the operating system which icon it shows for a file or directory and
//! get it back as a plain RGBA pixel buffer.
//!
//! # Quick start
//!
//! ```no_run
//! let engine = oxide_icon::IconEngine::new(&oxide_icon::EngineConfig::default())?;
//!
//! if let Some(icon) = engine.icon_pixels("C:/Windows/explorer.exe") {
//!     println!("{}x{} icon, {} bytes", icon.width(), icon.height(), icon.as_bytes().len());
//! }
//! # Ok::<(), oxide_icon::Error>(())
//! ```
//!
//! # Layout
//!
//! - [`Platform`] is resolved once at startup and picks the provider.
//! - A [`HandleProvider`] hands out native icon handles for paths. On
//!   Windows that is the shell's system image list, at the resolution the
//!   [`EngineConfig`] asks for. Other platforms have no implementation yet
//!   and never find an icon.
//! - [`decoder::decode`] turns a handle into a [`PixelBuffer`] and releases
//!   every OS resource involved, whether or not decoding succeeds.
//! - [`IconEngine`] ties these together and adds PNG, data URI and
//!   [`image`] conversions.

pub mod config;
pub mod decoder;
mod engine;
mod error;
mod pixels;
mod platform;
mod provider;
#[cfg(windows)]
pub mod win32;

pub use config::{EngineConfig, IconSize, load_config};
pub use engine::IconEngine;
pub use error::{Error, Result};
pub use pixels::PixelBuffer;
pub use platform::Platform;
pub use provider::{DecodingProvider, HandleProvider, IconProvider, UnimplementedProvider};
