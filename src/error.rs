use thiserror::Error;

/// Errors surfaced by the engine.
///
/// A path without an icon, or an icon that cannot be decoded, is not an
/// error: those outcomes are reported as `None` by the lookup methods.
#[derive(Debug, Error)]
pub enum Error {
    #[error("this operating system is not supported: {0}")]
    UnsupportedPlatform(String),
    #[error("icon retrieval unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("failed to encode icon image")]
    Encode(#[from] image::ImageError),
    #[error("failed to read configuration")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
