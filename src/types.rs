use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// One structured guess extracted from the input line. All fields are
/// optional — each pattern in the cascade fills in whatever subset it
/// captured, and the decision engine works with what it gets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// A path-shaped string, possibly relative or virtualenv-mangled.
    pub filename: Option<String>,
    pub line_number: Option<u32>,
    /// A symbol to look up in the host's tag index.
    pub tag: Option<String>,
    /// Dotted class/module qualifier, e.g. `pkg.mod.MyTestCase`.
    pub qualified_name: Option<String>,
    /// Dotted module name, e.g. `pkg.mod`.
    pub module: Option<String>,
}

/// The navigation command handed back to the host. `Display` renders the
/// editor-command form; `--json` serializes the tagged variant instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    /// The current buffer already holds the file — just move the cursor.
    JumpToLine { line: u32 },
    OpenFileAtLine { path: PathBuf, line: u32 },
    OpenFile { path: PathBuf },
    /// Tag exists; the host breaks ties among multiple definitions.
    JumpToTag { tag: String },
    /// Tag exists in several files and we know which one is wanted.
    JumpToTagIndexed { tag: String, index: usize },
    /// Fully qualified jump through the host's smart-tag integration.
    JumpToTagSmart { name: String },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JumpToLine { line } => write!(f, ":{line}"),
            Self::OpenFileAtLine { path, line } => {
                write!(f, "e +{line} {}", quote(&path.display().to_string()))
            }
            Self::OpenFile { path } => write!(f, "e {}", quote(&path.display().to_string())),
            Self::JumpToTag { tag } => write!(f, "tjump {}", quote(tag)),
            Self::JumpToTagIndexed { tag, index } => {
                write!(f, "{index}tjump {}", quote(tag))
            }
            Self::JumpToTagSmart { name } => write!(f, "Tag {name}"),
        }
    }
}

/// Escape backslashes and spaces for an editor command line.
fn quote(s: &str) -> String {
    s.replace('\\', "\\\\").replace(' ', "\\ ")
}

/// Prefix/suffix lists the file resolver searches over. Both lists always
/// start with the identity element, so the untouched filename is tried
/// before any configured variation.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    prefixes: Vec<String>,
    suffixes: Vec<String>,
}

impl SearchConfig {
    #[must_use]
    pub fn new(prefixes: Vec<String>, suffixes: Vec<String>) -> Self {
        let mut p = vec![String::new()];
        p.extend(prefixes);
        let mut s = vec![String::new()];
        s.extend(suffixes);
        Self {
            prefixes: p,
            suffixes: s,
        }
    }

    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    #[must_use]
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_always_starts_with_identity() {
        let cfg = SearchConfig::new(vec!["src".into()], vec![".py".into()]);
        assert_eq!(cfg.prefixes(), ["", "src"]);
        assert_eq!(cfg.suffixes(), ["", ".py"]);

        let empty = SearchConfig::default();
        assert_eq!(empty.prefixes(), [""]);
        assert_eq!(empty.suffixes(), [""]);
    }

    #[test]
    fn display_renders_editor_commands() {
        let open = Action::OpenFileAtLine {
            path: PathBuf::from("src/foo.py"),
            line: 42,
        };
        assert_eq!(open.to_string(), "e +42 src/foo.py");

        assert_eq!(Action::JumpToLine { line: 7 }.to_string(), ":7");
        assert_eq!(
            Action::JumpToTag { tag: "test_thing".into() }.to_string(),
            "tjump test_thing"
        );
        assert_eq!(
            Action::JumpToTagIndexed { tag: "setUp".into(), index: 2 }.to_string(),
            "2tjump setUp"
        );
        assert_eq!(
            Action::JumpToTagSmart { name: "pkg.mod.MyTestCase.test_thing".into() }.to_string(),
            "Tag pkg.mod.MyTestCase.test_thing"
        );
    }

    #[test]
    fn display_escapes_spaces_in_paths() {
        let open = Action::OpenFile {
            path: PathBuf::from("my dir/f.py"),
        };
        assert_eq!(open.to_string(), "e my\\ dir/f.py");
    }

    #[test]
    fn json_form_uses_kebab_case_action_names() {
        let open = Action::OpenFileAtLine {
            path: PathBuf::from("src/foo.py"),
            line: 42,
        };
        assert_eq!(
            serde_json::to_value(&open).unwrap(),
            serde_json::json!({"action": "open-file-at-line", "path": "src/foo.py", "line": 42})
        );
    }
}
