//! Architecture detection.

/// CPU architectures with a published Go distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86,
    X86_64,
    Arm,
    Arm64,
    Riscv64,
    Loong64,
    Ppc64le,
    S390x,
    Unknown,
}

impl Arch {
    pub fn from_name(name: &str) -> Self {
        match name {
            "i386" | "i586" | "i686" | "x86" | "386" => Arch::X86,
            "x86_64" | "amd64" => Arch::X86_64,
            "arm" | "armv6l" | "armv7l" | "armv7" => Arch::Arm,
            "aarch64" | "arm64" => Arch::Arm64,
            "riscv64" => Arch::Riscv64,
            "loongarch64" | "loong64" => Arch::Loong64,
            "powerpc64le" | "ppc64le" => Arch::Ppc64le,
            "s390x" => Arch::S390x,
            _ => Arch::Unknown,
        }
    }

    /// `GOARCH` as used in release file names.
    pub fn goarch(self) -> Option<&'static str> {
        Some(match self {
            Arch::X86 => "386",
            Arch::X86_64 => "amd64",
            Arch::Arm => "armv6l",
            Arch::Arm64 => "arm64",
            Arch::Riscv64 => "riscv64",
            Arch::Loong64 => "loong64",
            Arch::Ppc64le => "ppc64le",
            Arch::S390x => "s390x",
            Arch::Unknown => return None,
        })
    }
}

/// Detect the running CPU architecture, falling back to the compile target.
pub fn detect() -> Arch {
    let reported: Option<String> = sysinfo::System::cpu_arch().into();
    match reported.as_deref().map(Arch::from_name) {
        Some(arch) if arch != Arch::Unknown => arch,
        _ => Arch::from_name(std::env::consts::ARCH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goarch_mapping() {
        assert_eq!(Arch::from_name("x86_64").goarch(), Some("amd64"));
        assert_eq!(Arch::from_name("aarch64").goarch(), Some("arm64"));
        assert_eq!(Arch::from_name("i686").goarch(), Some("386"));
        assert_eq!(Arch::from_name("armv7l").goarch(), Some("armv6l"));
        assert_eq!(Arch::from_name("sparc").goarch(), None);
    }
}
