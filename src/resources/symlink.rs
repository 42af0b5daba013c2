//! Symlink resource with backup-on-conflict reconciliation.
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context as _, Result};

use super::{Applicable, Resource, ResourceChange, ResourceState};

/// A symlink from a home-directory target back to a source-tree file.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The source file (what the symlink points to).
    pub source: PathBuf,
    /// The target path (where the symlink will be created).
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }
}

impl Applicable for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    /// Make `target` a symlink to `source`.
    ///
    /// A regular file at the target is renamed to a timestamped backup first;
    /// user data is never overwritten. A wrong or dangling symlink is simply
    /// removed. Parent directories are created as needed.
    fn apply(&self) -> Result<ResourceChange> {
        let meta = std::fs::symlink_metadata(&self.target);
        if let Ok(meta) = meta {
            if meta.is_symlink() {
                std::fs::remove_file(&self.target)
                    .with_context(|| format!("removing old link {}", self.target.display()))?;
            } else {
                let backup = backup_path(&self.target);
                std::fs::rename(&self.target, &backup).with_context(|| {
                    format!(
                        "backing up {} to {}",
                        self.target.display(),
                        backup.display()
                    )
                })?;
            }
        }

        if let Some(parent) = self.target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::os::unix::fs::symlink(&self.source, &self.target).with_context(|| {
            format!(
                "creating symlink {} -> {}",
                self.target.display(),
                self.source.display()
            )
        })?;
        Ok(ResourceChange::Applied)
    }

    /// Remove the symlink at the target.
    ///
    /// Refuses to touch anything that is not currently a symlink; replaced or
    /// foreign files stay where they are.
    fn remove(&self) -> Result<ResourceChange> {
        match std::fs::symlink_metadata(&self.target) {
            Err(_) => Ok(ResourceChange::Skipped {
                reason: "already absent".to_string(),
            }),
            Ok(meta) if !meta.is_symlink() => Ok(ResourceChange::Skipped {
                reason: "not a symlink".to_string(),
            }),
            Ok(_) => {
                std::fs::remove_file(&self.target)
                    .with_context(|| format!("removing link {}", self.target.display()))?;
                Ok(ResourceChange::Applied)
            }
        }
    }
}

impl Resource for SymlinkResource {
    fn current_state(&self) -> Result<ResourceState> {
        if !self.source.exists() {
            return Ok(ResourceState::Invalid {
                reason: format!("source does not exist: {}", self.source.display()),
            });
        }

        match std::fs::read_link(&self.target) {
            Ok(_) => {
                // Canonicalize both ends so relative links and links through
                // symlinked parents still compare as equal.
                let resolved = std::fs::canonicalize(&self.target);
                let real_source = std::fs::canonicalize(&self.source);
                match (resolved, real_source) {
                    (Ok(a), Ok(b)) if a == b => Ok(ResourceState::Correct),
                    (Ok(a), _) => Ok(ResourceState::Incorrect {
                        current: format!("points to {}", a.display()),
                    }),
                    (Err(_), _) => Ok(ResourceState::Incorrect {
                        current: "dangling symlink".to_string(),
                    }),
                }
            }
            Err(_) if self.target.exists() => Ok(ResourceState::Incorrect {
                current: "target is a regular file".to_string(),
            }),
            Err(_) => Ok(ResourceState::Missing),
        }
    }
}

/// Timestamped backup name next to `target`; a counter suffix disambiguates
/// when several backups land in the same second.
fn backup_path(target: &Path) -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    let base = format!("{}.bak.{secs}", target.display());
    let mut candidate = PathBuf::from(&base);
    let mut counter = 1u32;
    while candidate.symlink_metadata().is_ok() {
        candidate = PathBuf::from(format!("{base}.{counter}"));
        counter += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(dir: &Path) -> SymlinkResource {
        let source = dir.join("source.conf");
        std::fs::write(&source, "managed content").unwrap();
        SymlinkResource::new(source, dir.join("home").join("target.conf"))
    }

    #[test]
    fn invalid_when_source_missing() {
        let dir = tempfile::tempdir().unwrap();
        let r = SymlinkResource::new(dir.path().join("absent"), dir.path().join("target"));
        assert!(matches!(
            r.current_state().unwrap(),
            ResourceState::Invalid { .. }
        ));
    }

    #[test]
    fn missing_when_target_absent() {
        let dir = tempfile::tempdir().unwrap();
        let r = resource(dir.path());
        assert_eq!(r.current_state().unwrap(), ResourceState::Missing);
    }

    #[test]
    fn apply_creates_parents_and_link() {
        let dir = tempfile::tempdir().unwrap();
        let r = resource(dir.path());
        assert_eq!(r.apply().unwrap(), ResourceChange::Applied);
        assert!(r.target.symlink_metadata().unwrap().is_symlink());
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(std::fs::read_to_string(&r.target).unwrap(), "managed content");
    }

    #[test]
    fn apply_backs_up_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let r = resource(dir.path());
        std::fs::create_dir_all(r.target.parent().unwrap()).unwrap();
        std::fs::write(&r.target, "user data").unwrap();

        r.apply().unwrap();

        let backups: Vec<_> = std::fs::read_dir(r.target.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.file_name().unwrap().to_string_lossy().contains(".bak."))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read_to_string(&backups[0]).unwrap(), "user data");
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn apply_replaces_wrong_symlink_without_backup() {
        let dir = tempfile::tempdir().unwrap();
        let r = resource(dir.path());
        let other = dir.path().join("other.conf");
        std::fs::write(&other, "other").unwrap();
        std::fs::create_dir_all(r.target.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(&other, &r.target).unwrap();
        assert!(matches!(
            r.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));

        r.apply().unwrap();

        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
        let backups = std::fs::read_dir(r.target.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.file_name().unwrap().to_string_lossy().contains(".bak."))
            .count();
        assert_eq!(backups, 0);
    }

    #[test]
    fn apply_replaces_dangling_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let r = resource(dir.path());
        std::fs::create_dir_all(r.target.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), &r.target).unwrap();
        assert!(matches!(
            r.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));

        r.apply().unwrap();
        assert_eq!(r.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn backup_names_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("file");
        std::fs::write(&target, "x").unwrap();
        let first = backup_path(&target);
        std::fs::write(&first, "x").unwrap();
        let second = backup_path(&target);
        assert_ne!(first, second);
    }

    #[test]
    fn remove_deletes_only_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let r = resource(dir.path());
        r.apply().unwrap();
        assert_eq!(r.remove().unwrap(), ResourceChange::Applied);
        assert!(!r.target.exists());

        std::fs::write(&r.target, "foreign").unwrap();
        assert!(matches!(r.remove().unwrap(), ResourceChange::Skipped { .. }));
        assert_eq!(std::fs::read_to_string(&r.target).unwrap(), "foreign");
    }

    #[test]
    fn remove_absent_target_is_skip() {
        let dir = tempfile::tempdir().unwrap();
        let r = resource(dir.path());
        assert!(matches!(r.remove().unwrap(), ResourceChange::Skipped { .. }));
    }
}
