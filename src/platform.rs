use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Host operating system family, used to pick an icon provider.
///
/// Resolve it once at startup with [`Platform::current`] and hand it to
/// [`IconEngine`](crate::IconEngine) explicitly.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// The platform this process is running on.
    pub fn current() -> Result<Self> {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Classify an operating system name such as `"windows"`, `"Mac OS X"` or `"linux"`.
    pub fn from_os_name(name: &str) -> Result<Self> {
        let lower = name.to_ascii_lowercase();

        if lower.contains("windows") {
            Ok(Platform::Windows)
        } else if lower.contains("mac") || lower.contains("darwin") {
            Ok(Platform::MacOs)
        } else if lower.contains("linux") || lower.contains("nix") {
            Ok(Platform::Linux)
        } else {
            Err(Error::UnsupportedPlatform(name.to_owned()))
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_os_names() {
        assert_eq!(Platform::from_os_name("windows").unwrap(), Platform::Windows);
        assert_eq!(Platform::from_os_name("Windows 10").unwrap(), Platform::Windows);
        assert_eq!(Platform::from_os_name("Mac OS X").unwrap(), Platform::MacOs);
        assert_eq!(Platform::from_os_name("macos").unwrap(), Platform::MacOs);
        assert_eq!(Platform::from_os_name("linux").unwrap(), Platform::Linux);
        assert_eq!(Platform::from_os_name("Unix").unwrap(), Platform::Linux);
    }

    #[test]
    fn unknown_os_is_unsupported() {
        let err = Platform::from_os_name("plan9").unwrap_err();
        assert!(matches!(err, Error::UnsupportedPlatform(ref name) if name == "plan9"));
        assert_eq!(
            err.to_string(),
            "this operating system is not supported: plan9"
        );
    }

    #[test]
    fn current_platform_resolves_on_supported_hosts() {
        if cfg!(any(windows, target_os = "macos", target_os = "linux")) {
            assert!(Platform::current().is_ok());
        }
    }
}
