use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::context::Filesystem;
use crate::error::LocateError;
use crate::types::SearchConfig;

/// Shortening passes the file resolver will attempt before declaring a
/// logic defect. Real paths never come close.
pub const SHORTEN_CEILING: usize = 1000;

/// Strip virtualenv noise from a path. A `.tox` segment followed by one of
/// the two known interpreter layouts means the part after `site-packages`
/// is the path the user actually cares about. The untouched original is
/// always yielded last.
pub fn detoxify(filename: &str) -> Vec<String> {
    let parts: Vec<&str> = filename.split('/').collect();
    let mut candidates = Vec::new();
    if let Some(idx) = parts.iter().position(|p| *p == ".tox") {
        // .tox/pyXY/lib/pythonX.Y/site-packages/...
        if parts.get(idx + 4) == Some(&"site-packages") {
            let candidate = parts[idx + 5..].join("/");
            debug!(".tox detected, trying {candidate}");
            candidates.push(candidate);
        }
        // .tox/pypyX/site-packages/...
        if parts.get(idx + 2) == Some(&"site-packages") {
            let candidate = parts[idx + 3..].join("/");
            debug!(".tox detected, trying {candidate}");
            candidates.push(candidate);
        }
    }
    candidates.push(filename.to_string());
    candidates
}

pub fn locate_file_detoxified(
    filename: &str,
    config: &SearchConfig,
    fs: &dyn Filesystem,
) -> Result<Option<PathBuf>, LocateError> {
    for candidate in detoxify(filename) {
        if let Some(found) = locate_file(&candidate, config, fs)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Find an existing file for `filename`. Every prefix × suffix combination
/// is tried in prefix-major order; on a full miss the filename is shortened
/// and the whole product retried: drop the leftmost path segment while one
/// exists, then reinterpret a dotted name as a path (some test runners print
/// `Pkg.Mod.test_name` for `pkg/mod/test_name`, case-folding everything but
/// the leaf). Gives up with `Ok(None)` when no shortening applies.
pub fn locate_file(
    filename: &str,
    config: &SearchConfig,
    fs: &dyn Filesystem,
) -> Result<Option<PathBuf>, LocateError> {
    debug!("looking for file {filename}");
    let mut filename = filename.to_string();
    for _ in 0..SHORTEN_CEILING {
        if filename.is_empty() {
            return Ok(None);
        }
        for prefix in config.prefixes() {
            for suffix in config.suffixes() {
                let path = join_prefixed(prefix, &filename, suffix);
                trace!("  checking {}", path.display());
                if fs.exists(&path) {
                    return Ok(Some(path));
                }
            }
        }
        if let Some((_, rest)) = filename.split_once('/') {
            filename = rest.to_string();
        } else if filename.contains('.') {
            filename = dots_to_path(&filename);
        } else {
            return Ok(None);
        }
        debug!("  trying {filename}");
    }
    Err(LocateError::LoopDetected { filename })
}

/// Resolve a dotted module name to its source file, falling back to the
/// package's `__init__.py`.
pub fn locate_module(
    module: &str,
    config: &SearchConfig,
    fs: &dyn Filesystem,
) -> Result<Option<PathBuf>, LocateError> {
    debug!("looking for module {module}");
    let base = module.replace('.', "/");
    if let Some(found) = locate_file(&format!("{base}.py"), config, fs)? {
        return Ok(Some(found));
    }
    locate_file(&format!("{base}/__init__.py"), config, fs)
}

/// Suffix is a plain string append, not an extension swap. An empty prefix
/// joins to the bare filename.
fn join_prefixed(prefix: &str, filename: &str, suffix: &str) -> PathBuf {
    let name = format!("{filename}{suffix}");
    if prefix.is_empty() {
        PathBuf::from(name)
    } else {
        Path::new(prefix).join(name)
    }
}

/// `Pkg.Mod.test_name` → `pkg/mod/test_name`: dots become separators and
/// every directory segment is lowercased; the final component keeps its
/// case.
fn dots_to_path(name: &str) -> String {
    let mut parts: Vec<&str> = name.split('.').collect();
    let last = parts.pop().unwrap_or_default();
    let mut segments: Vec<String> = parts.iter().map(|s| s.to_lowercase()).collect();
    segments.push(last.to_string());
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fake::FakeFs;

    fn config(prefixes: &[&str], suffixes: &[&str]) -> SearchConfig {
        SearchConfig::new(
            prefixes.iter().map(ToString::to_string).collect(),
            suffixes.iter().map(ToString::to_string).collect(),
        )
    }

    #[test]
    fn finds_file_as_given() {
        let fs = FakeFs::with(&["src/app.py"]);
        let found = locate_file("src/app.py", &config(&[], &[]), &fs).unwrap();
        assert_eq!(found, Some(PathBuf::from("src/app.py")));
    }

    #[test]
    fn identity_prefix_is_tried_before_configured_ones() {
        let fs = FakeFs::with(&["x.py", "src/x.py"]);
        let found = locate_file("x.py", &config(&["src"], &[]), &fs).unwrap();
        assert_eq!(found, Some(PathBuf::from("x.py")));
    }

    #[test]
    fn prefix_major_suffix_minor_order() {
        // all suffixes of prefix "a" are exhausted before prefix "b" is
        // touched, so a/x.py beats b/x even though b comes with the
        // identity suffix
        let fs = FakeFs::with(&["a/x.py", "b/x"]);
        let found = locate_file("x", &config(&["a", "b"], &[".py"]), &fs).unwrap();
        assert_eq!(found, Some(PathBuf::from("a/x.py")));
    }

    #[test]
    fn shortens_from_the_left() {
        let fs = FakeFs::with(&["to/file.py"]);
        let found = locate_file("long/path/to/file.py", &config(&[], &[]), &fs).unwrap();
        assert_eq!(found, Some(PathBuf::from("to/file.py")));
    }

    #[test]
    fn shortening_combines_with_prefixes() {
        let fs = FakeFs::with(&["src/file.py"]);
        let found = locate_file("build/sandbox/file.py", &config(&["src"], &[]), &fs).unwrap();
        assert_eq!(found, Some(PathBuf::from("src/file.py")));
    }

    #[test]
    fn dotted_test_id_becomes_a_path() {
        let fs = FakeFs::with(&["pkg/mod/test_foo.py"]);
        let found = locate_file("Pkg.Mod.test_foo", &config(&[], &[".py"]), &fs).unwrap();
        assert_eq!(found, Some(PathBuf::from("pkg/mod/test_foo.py")));
    }

    #[test]
    fn dotted_reinterpretation_keeps_leaf_case() {
        let fs = FakeFs::with(&["pkg/mod/TestFoo.py"]);
        let found = locate_file("Pkg.Mod.TestFoo", &config(&[], &[".py"]), &fs).unwrap();
        assert_eq!(found, Some(PathBuf::from("pkg/mod/TestFoo.py")));
    }

    #[test]
    fn gives_up_cleanly_on_unresolvable_names() {
        let fs = FakeFs::default();
        assert_eq!(locate_file("nonexistent", &config(&[], &[]), &fs).unwrap(), None);
        assert_eq!(
            locate_file("no/such/path.py", &config(&["src"], &[".py"]), &fs).unwrap(),
            None
        );
    }

    #[test]
    fn pathological_depth_is_a_loop_error_not_a_hang() {
        let fs = FakeFs::default();
        let deep = vec!["a"; SHORTEN_CEILING + 2].join("/");
        let err = locate_file(&deep, &config(&[], &[]), &fs).unwrap_err();
        assert!(matches!(err, LocateError::LoopDetected { .. }));
    }

    #[test]
    fn detoxify_strips_cpython_layout() {
        let got = detoxify(".tox/py311/lib/python3.11/site-packages/pkg/mod.py");
        assert_eq!(
            got,
            [
                "pkg/mod.py",
                ".tox/py311/lib/python3.11/site-packages/pkg/mod.py"
            ]
        );
    }

    #[test]
    fn detoxify_strips_pypy_layout() {
        let got = detoxify("/builds/proj/.tox/pypy3/site-packages/pkg/mod.py");
        assert_eq!(
            got,
            ["pkg/mod.py", "/builds/proj/.tox/pypy3/site-packages/pkg/mod.py"]
        );
    }

    #[test]
    fn detoxify_passes_through_unrecognized_layouts() {
        assert_eq!(detoxify(".tox/weird/pkg.py"), [".tox/weird/pkg.py"]);
        assert_eq!(detoxify("plain/pkg.py"), ["plain/pkg.py"]);
    }

    #[test]
    fn detoxified_candidate_wins_over_the_original() {
        // both forms exist; the stripped one is tried first
        let tox = ".tox/py311/lib/python3.11/site-packages/pkg/mod.py";
        let fs = FakeFs::with(&["pkg/mod.py", tox]);
        let found = locate_file_detoxified(tox, &config(&[], &[]), &fs).unwrap();
        assert_eq!(found, Some(PathBuf::from("pkg/mod.py")));
    }

    #[test]
    fn module_resolution_prefers_plain_source_file() {
        let fs = FakeFs::with(&["pkg/mod.py"]);
        let found = locate_module("pkg.mod", &config(&[], &[]), &fs).unwrap();
        assert_eq!(found, Some(PathBuf::from("pkg/mod.py")));
    }

    #[test]
    fn module_resolution_falls_back_to_package_init() {
        let fs = FakeFs::with(&["pkg/sub/__init__.py"]);
        let found = locate_module("pkg.sub", &config(&[], &[]), &fs).unwrap();
        assert_eq!(found, Some(PathBuf::from("pkg/sub/__init__.py")));
    }

    #[test]
    fn module_resolution_honors_prefixes() {
        let fs = FakeFs::with(&["src/pkg/mod.py"]);
        let found = locate_module("pkg.mod", &config(&["src"], &[]), &fs).unwrap();
        assert_eq!(found, Some(PathBuf::from("src/pkg/mod.py")));
    }
}
