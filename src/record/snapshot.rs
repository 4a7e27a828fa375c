//! Point-in-time enumeration of the files under a directory tree.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

/// Recursively collect every regular file below `root`, as paths relative
/// to `root`.
///
/// Directories themselves are not listed. Symlinks are followed with no
/// cycle protection and recursion depth is unbounded; the working
/// directory is assumed exclusively owned for the duration of a recording.
///
/// The sorted set makes the diff between two snapshots deterministic, so
/// produced files are always processed in the same order.
pub fn snapshot(root: &Path) -> io::Result<BTreeSet<PathBuf>> {
    let mut files = BTreeSet::new();
    collect(root, Path::new(""), &mut files)?;
    Ok(files)
}

fn collect(root: &Path, prefix: &Path, files: &mut BTreeSet<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(root.join(prefix))? {
        let entry = entry?;
        let relative = prefix.join(entry.file_name());
        if std::fs::metadata(entry.path())?.is_dir() {
            collect(root, &relative, files)?;
        } else {
            files.insert(relative);
        }
    }
    Ok(())
}
