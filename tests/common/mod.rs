//! Shared fixtures for integration tests.
//!
//! Builds an isolated home directory plus a source repository under one
//! tempdir, and wires a [`Context`] whose executor never touches the system.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use niri_setup::config::Config;
use niri_setup::exec::{ExecResult, Executor};
use niri_setup::ledger::Ledger;
use niri_setup::logging::Logger;
use niri_setup::tasks::{Context, Mode};

/// Executor stub: every command "succeeds" with empty output and nothing is
/// on PATH, so package and unit tasks report not applicable.
#[derive(Debug, Default)]
pub struct QuietExecutor;

impl Executor for QuietExecutor {
    fn run(&self, _: &str, _: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(ok_result())
    }

    fn run_in(&self, _: &Path, _: &str, _: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(ok_result())
    }

    fn run_unchecked(&self, _: &str, _: &[&str]) -> anyhow::Result<ExecResult> {
        Ok(ok_result())
    }

    fn which(&self, _: &str) -> bool {
        false
    }
}

fn ok_result() -> ExecResult {
    ExecResult {
        stdout: String::new(),
        stderr: String::new(),
        success: true,
        code: Some(0),
    }
}

/// A home directory and source repository living inside one tempdir.
pub struct Fixture {
    _dir: tempfile::TempDir,
    /// Simulated `$HOME`.
    pub home: PathBuf,
    /// Source repository root.
    pub root: PathBuf,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        let root = dir.path().join("repo");
        std::fs::create_dir_all(&home).unwrap();
        std::fs::create_dir_all(root.join("conf")).unwrap();
        Self {
            _dir: dir,
            home,
            root,
        }
    }

    /// Write a file under `repo/conf/`.
    pub fn write_conf(&self, name: &str, content: &str) {
        std::fs::write(self.root.join("conf").join(name), content).unwrap();
    }

    /// Write a file under `repo/config/`, creating parents.
    pub fn write_config_file(&self, rel: &str, content: &str) {
        let path = self.root.join("config").join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    /// Write a file under `repo/scripts/`.
    pub fn write_script(&self, name: &str, content: &str) {
        let path = self.root.join("scripts").join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    /// Load the conf files and build a context with a shared logger.
    pub fn context(&self, mode: Mode) -> (Context, Arc<Logger>) {
        let config = Config::load(&self.root).unwrap();
        let log = Arc::new(Logger::new());
        let ctx = Context {
            config: Arc::new(config),
            log: Arc::clone(&log) as Arc<dyn niri_setup::logging::Log>,
            mode,
            home: self.home.clone(),
            executor: Arc::new(QuietExecutor),
            ledger: Ledger::for_home(&self.home),
            assume_yes: true,
        };
        (ctx, log)
    }

    /// Expected destination for a mapped config file.
    pub fn config_target(&self, rel: &str) -> PathBuf {
        self.home.join(".config").join(rel)
    }

    /// Names of `.bak.` files next to `target`.
    pub fn backups_beside(&self, target: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(target.parent().unwrap())
            .map(|entries| {
                entries
                    .map(|e| e.unwrap().path())
                    .filter(|p| p.file_name().unwrap().to_string_lossy().contains(".bak."))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A fixture with one niri mapping and a config file already in place.
#[allow(dead_code)]
pub fn niri_fixture() -> Fixture {
    let fixture = Fixture::new();
    fixture.write_conf(
        "mappings.toml",
        "[[mapping]]\nsource = \"niri\"\ndest = \"niri\"\n",
    );
    fixture.write_config_file("niri/config.kdl", "layout { gaps 8 }\n");
    fixture
}
