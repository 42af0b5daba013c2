//! Deterministic enumeration of source trees.
//!
//! The mapper turns a source directory into an ordered list of
//! `(absolute_source, relative_path)` pairs. Both the sync orchestrator and
//! the verifier derive their destination sets from this enumeration, so the
//! two can never disagree about which files are managed.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

/// A single file discovered under a source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedFile {
    /// Absolute path of the source file.
    pub source: PathBuf,
    /// Path relative to the enumeration root.
    pub relative: PathBuf,
}

/// Every regular file under `root`, recursive, ordered by relative path.
///
/// Symlinks to files count as files; directories are descended into but never
/// emitted. Symlinked directories are not followed, so a link cycle inside
/// the tree cannot hang the enumeration. A missing root yields an empty list
/// so callers can decide whether that deserves a warning.
///
/// # Errors
///
/// Returns an error if a directory under an existing root cannot be read.
pub fn enumerate(root: &Path) -> Result<Vec<MappedFile>> {
    if !root.is_dir() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect(root, root, &mut files)?;
    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(files)
}

/// Immediate regular files of `root` only, ordered by file name.
///
/// Used for flat source directories such as `scripts/`.
///
/// # Errors
///
/// Returns an error if an existing root cannot be read.
pub fn enumerate_flat(root: &Path) -> Result<Vec<MappedFile>> {
    if !root.is_dir() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(root)
        .with_context(|| format!("reading directory {}", root.display()))?
    {
        let entry = entry.with_context(|| format!("reading directory {}", root.display()))?;
        let path = entry.path();
        if path.is_file() {
            files.push(MappedFile {
                relative: PathBuf::from(entry.file_name()),
                source: path,
            });
        }
    }
    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(files)
}

fn collect(root: &Path, dir: &Path, files: &mut Vec<MappedFile>) -> Result<()> {
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("reading directory {}", dir.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("reading directory {}", dir.display()))?;
        if file_type.is_dir() {
            collect(root, &path, files)?;
        } else if path.is_file() {
            let relative = path
                .strip_prefix(root)
                .with_context(|| format!("stripping {} from {}", root.display(), path.display()))?
                .to_path_buf();
            files.push(MappedFile {
                source: path,
                relative,
            });
        }
    }
    Ok(())
}
