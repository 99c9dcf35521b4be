use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Map an archive entry path to its location under `base`.
///
/// Returns `Ok(None)` when stripping `strip` leading components leaves
/// nothing. Absolute paths and `..` escapes are rejected as zip-slip.
pub fn sanitize_path(entry: &Path, base: &Path, strip: usize) -> Result<Option<PathBuf>> {
    let zip_slip = |resolved: PathBuf| Error::ZipSlip {
        entry: entry.to_path_buf(),
        resolved,
    };

    if entry.has_root() || matches!(entry.components().next(), Some(Component::Prefix(_))) {
        return Err(zip_slip(entry.to_path_buf()));
    }
    let relative = normalize_relative(entry).ok_or_else(|| zip_slip(base.join(entry)))?;

    let stripped: PathBuf = relative.components().skip(strip).collect();
    if stripped.as_os_str().is_empty() {
        return Ok(None);
    }

    let resolved = base.join(stripped);
    if !resolved.starts_with(base) {
        return Err(zip_slip(resolved));
    }
    Ok(Some(resolved))
}

/// Check that a symlink written at `link` pointing to `target` stays inside
/// `base`. Returns the resolved target.
pub fn sanitize_symlink_target(target: &Path, link: &Path, base: &Path) -> Result<PathBuf> {
    let escape = |resolved: PathBuf| Error::SymlinkEscape {
        target: target.to_path_buf(),
        resolved,
    };

    if target.has_root() || matches!(target.components().next(), Some(Component::Prefix(_))) {
        return Err(escape(target.to_path_buf()));
    }

    let link_dir = link.parent().unwrap_or(base);
    let relative_dir = link_dir.strip_prefix(base).map_err(|_| escape(link_dir.join(target)))?;
    let resolved = normalize_relative(&relative_dir.join(target)).ok_or_else(|| escape(link_dir.join(target)))?;
    Ok(base.join(resolved))
}

/// Fold `.` and `..` away. `None` if `..` climbs above the start.
fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => result.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(result)
}
