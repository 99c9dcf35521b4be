//! Executable detection for shim enumeration.

use std::path::Path;

#[cfg(windows)]
const EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "bat", "cmd"];

/// Regular file with any execute bit set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

/// Regular file with an `.exe`, `.bat` or `.cmd` extension.
#[cfg(windows)]
pub fn is_executable(path: &Path) -> bool {
    let has_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| EXECUTABLE_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)));
    has_ext && std::fs::metadata(path).is_ok_and(|m| m.is_file())
}

/// The command name a shim is created for: the file name, minus its
/// executable extension on Windows.
pub fn executable_name(path: &Path) -> Option<String> {
    #[cfg(windows)]
    let name = path.file_stem()?;
    #[cfg(not(windows))]
    let name = path.file_name()?;
    name.to_str().map(str::to_string)
}

/// File name of a command inside a `bin` directory.
pub fn binary_file_name(command: &str) -> String {
    if cfg!(windows) { format!("{command}.exe") } else { command.to_string() }
}
