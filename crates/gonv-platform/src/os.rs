//! Operating system detection.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OS {
    Windows,
    Macos,
    Linux,
    FreeBsd,
    Unknown,
}

impl OS {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "windows" => OS::Windows,
            "macos" | "darwin" => OS::Macos,
            "linux" => OS::Linux,
            "freebsd" => OS::FreeBsd,
            _ => OS::Unknown,
        }
    }

    /// `GOOS` as used in release file names.
    pub fn goos(self) -> Option<&'static str> {
        Some(match self {
            OS::Windows => "windows",
            OS::Macos => "darwin",
            OS::Linux => "linux",
            OS::FreeBsd => "freebsd",
            OS::Unknown => return None,
        })
    }
}

/// The operating system this binary runs on.
pub fn detect() -> OS { OS::from_name(std::env::consts::OS) }
