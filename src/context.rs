use std::io;
use std::path::{Path, PathBuf};

use crate::tags::TagIndex;

/// Filesystem queries the resolver depends on, abstracted so the engine can
/// run against a fake tree in tests. No caching — every attempt is a fresh
/// query against the current state.
pub trait Filesystem {
    fn exists(&self, path: &Path) -> bool;

    /// Identity-safe samefile check: true when both paths name the same
    /// filesystem entity (symlink/hardlink aware). Missing files compare as
    /// not-same rather than erroring.
    fn same_entity(&self, a: &Path, b: &Path) -> bool;
}

/// Everything the host editor supplies: the buffer the user is sitting in,
/// a tag oracle, and an optional smart-tag integration.
pub trait Host {
    fn current_buffer(&self) -> Option<&Path> {
        None
    }

    /// Exact-name tag lookup. A host-side failure (index not built yet, …)
    /// is an expected transient condition; callers treat it as not-found.
    fn tag_lookup(&self, name: &str) -> io::Result<Vec<TagEntry>>;

    /// Probe the smart-tag integration for a fully qualified name. Hosts
    /// without one keep the default.
    fn smart_tag_lookup(&self, _name: &str) -> bool {
        false
    }
}

/// One tag-index entry: a symbol and the file defining it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub name: String,
    pub filename: PathBuf,
}

/// Real filesystem, rooted at a scope directory. Relative paths — both
/// resolver candidates and tag-index entries — are answered relative to the
/// root; absolute paths pass through untouched.
pub struct RealFs {
    root: PathBuf,
}

impl RealFs {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Filesystem for RealFs {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).try_exists().unwrap_or(false)
    }

    fn same_entity(&self, a: &Path, b: &Path) -> bool {
        same_file::is_same_file(self.resolve(a), self.resolve(b)).unwrap_or(false)
    }
}

/// The CLI's stand-in for an editor: an optional "currently open" file and a
/// ctags-file-backed tag oracle. No smart-tag integration.
pub struct CliHost {
    buffer: Option<PathBuf>,
    tags: TagIndex,
}

impl CliHost {
    #[must_use]
    pub fn new(buffer: Option<PathBuf>, tags: TagIndex) -> Self {
        Self { buffer, tags }
    }
}

impl Host for CliHost {
    fn current_buffer(&self) -> Option<&Path> {
        self.buffer.as_deref()
    }

    fn tag_lookup(&self, name: &str) -> io::Result<Vec<TagEntry>> {
        Ok(self.tags.lookup(name))
    }
}
