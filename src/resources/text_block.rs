//! Marker-delimited managed regions in profile files.
//!
//! A managed block is the only part of a user-owned file this tool will ever
//! touch. Everything between the begin and end markers belongs to the tool
//! and is rewritten wholesale; everything outside them is preserved verbatim.
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::{Applicable, Resource, ResourceChange, ResourceState};

/// A named managed block inside a text file.
#[derive(Debug, Clone)]
pub struct ManagedBlockResource {
    /// The file holding the block.
    pub file: PathBuf,
    /// Block name, embedded in the markers.
    pub name: String,
    /// Desired content between the markers (without the markers themselves).
    pub content: String,
}

impl ManagedBlockResource {
    /// Create a new managed block resource.
    #[must_use]
    pub const fn new(file: PathBuf, name: String, content: String) -> Self {
        Self { file, name, content }
    }

    fn begin_marker(&self) -> String {
        format!("# >>> niri-setup {} >>>", self.name)
    }

    fn end_marker(&self) -> String {
        format!("# <<< niri-setup {} <<<", self.name)
    }

    /// The full block, markers included, as written to the file.
    fn rendered(&self) -> String {
        format!(
            "{}\n{}\n{}\n",
            self.begin_marker(),
            self.content.trim_end_matches('\n'),
            self.end_marker()
        )
    }

    /// Extract the current content between the markers, if the block exists.
    fn current_region(&self, text: &str) -> Option<String> {
        let begin = self.begin_marker();
        let end = self.end_marker();
        let start = text.find(&begin)?;
        let after_begin = start + begin.len();
        let end_pos = text[after_begin..].find(&end)? + after_begin;
        Some(
            text[after_begin..end_pos]
                .trim_matches('\n')
                .to_string(),
        )
    }

    /// Remove the block (markers included) from `text`.
    fn strip_region(&self, text: &str) -> String {
        let begin = self.begin_marker();
        let end = self.end_marker();
        let Some(start) = text.find(&begin) else {
            return text.to_string();
        };
        let Some(end_rel) = text[start..].find(&end) else {
            return text.to_string();
        };
        let mut after = start + end_rel + end.len();
        if text[after..].starts_with('\n') {
            after += 1;
        }
        let mut head = text[..start].to_string();
        while head.ends_with("\n\n") {
            head.pop();
        }
        format!("{head}{}", &text[after..])
    }

    fn read_file(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.file) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.file.display())),
        }
    }

    fn write_file(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.file.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&self.file, text)
            .with_context(|| format!("writing {}", self.file.display()))
    }
}

impl Applicable for ManagedBlockResource {
    fn description(&self) -> String {
        format!("block '{}' in {}", self.name, self.file.display())
    }

    /// Rewrite the block: strip any existing region, then append a fresh one.
    fn apply(&self) -> Result<ResourceChange> {
        let text = self.read_file()?.unwrap_or_default();
        let mut stripped = self.strip_region(&text);
        if !stripped.is_empty() && !stripped.ends_with('\n') {
            stripped.push('\n');
        }
        let updated = format!("{stripped}{}", self.rendered());
        self.write_file(&updated)?;
        Ok(ResourceChange::Applied)
    }

    /// Strip the block from the file. The file itself is never deleted.
    fn remove(&self) -> Result<ResourceChange> {
        let Some(text) = self.read_file()? else {
            return Ok(ResourceChange::Skipped {
                reason: "file absent".to_string(),
            });
        };
        if !text.contains(&self.begin_marker()) {
            return Ok(ResourceChange::Skipped {
                reason: "block absent".to_string(),
            });
        }
        self.write_file(&self.strip_region(&text))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for ManagedBlockResource {
    fn current_state(&self) -> Result<ResourceState> {
        let Some(text) = self.read_file()? else {
            return Ok(ResourceState::Missing);
        };
        match self.current_region(&text) {
            None => Ok(ResourceState::Missing),
            Some(region) if region == self.content.trim_matches('\n') => {
                Ok(ResourceState::Correct)
            }
            Some(_) => Ok(ResourceState::Incorrect {
                current: "block content differs".to_string(),
            }),
        }
    }
}
