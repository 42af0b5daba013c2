//! Persistent record of everything this tool has created or installed.
//!
//! The ledger is a flat UTF-8 text file, one `category:value` entry per line.
//! Only the first colon delimits; values may contain further colons but never
//! a newline. It drives uninstall: every symlink and package recorded here is
//! exactly what gets reversed later.
//!
//! All operations are best-effort. A failed read behaves as "nothing
//! recorded"; write failures are surfaced to the caller as errors so the
//! orchestration layer can warn and continue — the ledger never aborts a run
//! by itself.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

/// Entry category recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// A destination path owned by this tool (a managed symlink).
    File,
    /// A package installed at this tool's request.
    Package,
}

impl Category {
    const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Package => "package",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only-by-key state store backing install/uninstall reversibility.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    /// Relative location of the store below the home directory.
    const STATE_FILE: &'static str = ".local/state/niri-setup/state";

    /// Ledger stored at the default XDG state location under `home`.
    #[must_use]
    pub fn for_home(home: &Path) -> Self {
        Self {
            path: home.join(Self::STATE_FILE),
        }
    }

    /// Ledger stored at an explicit path.
    #[must_use]
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the backing store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all lines of the store; a missing or unreadable store is empty.
    fn lines(&self) -> Vec<String> {
        std::fs::read_to_string(&self.path)
            .map(|content| content.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Record `category:value` unless that exact entry is already present.
    ///
    /// Creates the store file and its parent directory on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written. Callers treat this as
    /// a warning, never an abort.
    pub fn add(&self, category: Category, value: &str) -> Result<()> {
        debug_assert!(!value.contains('\n'), "ledger values must be single-line");
        let entry = format!("{category}:{value}");
        let mut lines = self.lines();
        if lines.iter().any(|line| line == &entry) {
            return Ok(());
        }
        lines.push(entry);
        self.write_lines(&lines)
    }

    /// All values recorded for `category`, in insertion order.
    #[must_use]
    pub fn list(&self, category: Category) -> Vec<String> {
        let prefix = format!("{category}:");
        self.lines()
            .into_iter()
            .filter_map(|line| line.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    /// Whether `category:value` is recorded.
    #[must_use]
    pub fn contains(&self, category: Category, value: &str) -> bool {
        let entry = format!("{category}:{value}");
        self.lines().iter().any(|line| line == &entry)
    }

    /// Delete the single matching entry; no error if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be rewritten.
    pub fn remove_entry(&self, category: Category, value: &str) -> Result<()> {
        let entry = format!("{category}:{value}");
        let lines = self.lines();
        let remaining: Vec<String> = lines.iter().filter(|l| **l != entry).cloned().collect();
        if remaining.len() == lines.len() {
            return Ok(());
        }
        self.write_lines(&remaining)
    }

    /// Delete the store entirely, and its directory if then empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store file exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(e).with_context(|| format!("removing {}", self.path.display()));
            }
        }
        if let Some(dir) = self.path.parent()
            && std::fs::read_dir(dir).is_ok_and(|mut entries| entries.next().is_none())
        {
            let _ = std::fs::remove_dir(dir);
        }
        Ok(())
    }

    fn write_lines(&self, lines: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        std::fs::write(&self.path, content)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_ledger() -> (tempfile::TempDir, Ledger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::at(dir.path().join("state").join("ledger"));
        (dir, ledger)
    }

    #[test]
    fn list_on_missing_store_is_empty() {
        let (_dir, ledger) = temp_ledger();
        assert!(ledger.list(Category::File).is_empty());
    }

    #[test]
    fn add_creates_store_and_records_entry() {
        let (_dir, ledger) = temp_ledger();
        ledger.add(Category::File, "/home/u/.config/niri/config.kdl").unwrap();
        assert_eq!(
            ledger.list(Category::File),
            vec!["/home/u/.config/niri/config.kdl".to_string()]
        );
    }

    #[test]
    fn add_is_idempotent() {
        let (_dir, ledger) = temp_ledger();
        ledger.add(Category::Package, "niri").unwrap();
        ledger.add(Category::Package, "niri").unwrap();
        assert_eq!(ledger.list(Category::Package), vec!["niri".to_string()]);
        let content = std::fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(content, "package:niri\n");
    }

    #[test]
    fn list_preserves_insertion_order() {
        let (_dir, ledger) = temp_ledger();
        ledger.add(Category::File, "/b").unwrap();
        ledger.add(Category::File, "/a").unwrap();
        ledger.add(Category::Package, "waybar").unwrap();
        assert_eq!(ledger.list(Category::File), vec!["/b", "/a"]);
        assert_eq!(ledger.list(Category::Package), vec!["waybar"]);
    }

    #[test]
    fn values_may_contain_colons() {
        let (_dir, ledger) = temp_ledger();
        ledger.add(Category::File, "/odd:path:with:colons").unwrap();
        assert_eq!(ledger.list(Category::File), vec!["/odd:path:with:colons"]);
        assert!(ledger.contains(Category::File, "/odd:path:with:colons"));
    }

    #[test]
    fn categories_do_not_mix() {
        let (_dir, ledger) = temp_ledger();
        ledger.add(Category::File, "niri").unwrap();
        assert!(ledger.list(Category::Package).is_empty());
        assert!(!ledger.contains(Category::Package, "niri"));
    }

    #[test]
    fn remove_entry_deletes_single_match() {
        let (_dir, ledger) = temp_ledger();
        ledger.add(Category::File, "/a").unwrap();
        ledger.add(Category::File, "/b").unwrap();
        ledger.remove_entry(Category::File, "/a").unwrap();
        assert_eq!(ledger.list(Category::File), vec!["/b"]);
    }

    #[test]
    fn remove_entry_absent_is_noop() {
        let (_dir, ledger) = temp_ledger();
        ledger.remove_entry(Category::File, "/missing").unwrap();
        assert!(ledger.list(Category::File).is_empty());
    }

    #[test]
    fn clear_removes_store_and_empty_directory() {
        let (_dir, ledger) = temp_ledger();
        ledger.add(Category::File, "/a").unwrap();
        let state_dir = ledger.path().parent().unwrap().to_path_buf();
        assert!(state_dir.exists());
        ledger.clear().unwrap();
        assert!(!ledger.path().exists());
        assert!(!state_dir.exists());
    }

    #[test]
    fn clear_keeps_directory_with_other_files() {
        let (_dir, ledger) = temp_ledger();
        ledger.add(Category::File, "/a").unwrap();
        let state_dir = ledger.path().parent().unwrap().to_path_buf();
        std::fs::write(state_dir.join("other"), "keep me").unwrap();
        ledger.clear().unwrap();
        assert!(state_dir.exists());
    }

    #[test]
    fn clear_on_missing_store_is_noop() {
        let (_dir, ledger) = temp_ledger();
        ledger.clear().unwrap();
    }

    #[test]
    fn for_home_uses_xdg_state_path() {
        let ledger = Ledger::for_home(Path::new("/home/u"));
        assert_eq!(
            ledger.path(),
            Path::new("/home/u/.local/state/niri-setup/state")
        );
    }
}
