//! Path normalization utilities.

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Fold `.` and `..` segments of a `/`-separated path without touching the
/// filesystem. Returns `None` when `..` would climb above the start.
pub fn fold_segments(path: &str) -> Option<Vec<&str>> {
    let mut out = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop()?;
            }
            seg => out.push(seg),
        }
    }
    Some(out)
}

/// Join folded URL segments onto a filesystem root, rejecting segments
/// that would not stay a single normal component.
pub fn join_segments(root: &Path, segments: &[&str]) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for seg in segments {
        let mut components = Path::new(seg).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => path.push(part),
            _ => return None,
        }
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        assert!(normalize_path(path).is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        assert!(normalize_path(path).is_absolute());
    }

    #[test]
    fn test_fold_segments() {
        assert_eq!(fold_segments("/js/./lib/../app.js"), Some(vec!["js", "app.js"]));
        assert_eq!(fold_segments("css/"), Some(vec!["css"]));
        assert_eq!(fold_segments("/../etc/passwd"), None);
        assert_eq!(fold_segments("a/../../b"), None);
    }

    #[test]
    fn test_join_segments() {
        let root = Path::new("/srv/www");
        assert_eq!(
            join_segments(root, &["js", "app.js"]),
            Some(PathBuf::from("/srv/www/js/app.js"))
        );
        assert_eq!(join_segments(root, &["a\\..\\b"]).is_some(), cfg!(unix));
    }
}
