use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::context::{Filesystem, Host, TagEntry};

/// How a tag resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagHit {
    /// The tag exists somewhere; the host picks among ties.
    Deferred,
    /// The 1-based position of the match defined in the expected file.
    Indexed(usize),
}

/// Ask the host's tag oracle for `name`. With an expected defining file the
/// answer is the index of the first match that is the same filesystem
/// entity as that file — and a miss even when the bare symbol exists
/// elsewhere. Oracle failures (index not built yet, …) count as not-found.
pub fn resolve_tag(
    name: &str,
    expected_file: Option<&Path>,
    fs: &dyn Filesystem,
    host: &dyn Host,
) -> Option<TagHit> {
    debug!("looking for tag {name}");
    let entries = match host.tag_lookup(name) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("tag lookup failed: {err}");
            return None;
        }
    };
    if entries.is_empty() {
        return None;
    }
    match expected_file {
        Some(want) => {
            let position = entries
                .iter()
                .position(|entry| fs.same_entity(&entry.filename, want));
            if position.is_none() {
                debug!("found tag {name}, but not in {}, ignoring", want.display());
            }
            position.map(|i| TagHit::Indexed(i + 1))
        }
        None => Some(TagHit::Deferred),
    }
}

/// Exact-name lookups over a ctags file. This is the CLI's tag oracle; an
/// editor host would answer from its own index instead.
#[derive(Default)]
pub struct TagIndex {
    entries: HashMap<String, Vec<TagEntry>>,
}

impl TagIndex {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load an exuberant-ctags `tags` file: tab-separated
    /// `name<TAB>file<TAB>excmd`, with `!_TAG_` header lines up front.
    /// Malformed lines are skipped, not fatal.
    pub fn load(path: &Path) -> io::Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    fn parse(text: &str) -> Self {
        let mut entries: HashMap<String, Vec<TagEntry>> = HashMap::new();
        for line in text.lines() {
            if line.starts_with("!_TAG_") {
                continue;
            }
            let mut fields = line.split('\t');
            let (Some(name), Some(file)) = (fields.next(), fields.next()) else {
                continue;
            };
            if name.is_empty() || file.is_empty() {
                continue;
            }
            entries.entry(name.to_string()).or_default().push(TagEntry {
                name: name.to_string(),
                filename: PathBuf::from(file),
            });
        }
        Self { entries }
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Vec<TagEntry> {
        self.entries.get(name).cloned().unwrap_or_default()
    }
}
