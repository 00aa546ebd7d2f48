use std::sync::LazyLock;

use log::trace;
use regex::{Captures, Regex};

use crate::types::Candidate;

/// One entry in the cascade. The name only feeds trace logging.
struct Matcher {
    name: &'static str,
    re: Regex,
}

fn matcher(name: &'static str, pattern: &str) -> Matcher {
    Matcher {
        name,
        re: Regex::new(pattern).expect("static pattern compiles"),
    }
}

/// The cascade, most specific format first. Recall over precision: several
/// patterns may match the same substring, and the tail patterns match almost
/// anything — bad guesses are cheap because resolution discards whatever
/// doesn't exist on disk or in the tag index.
static MATCHERS: LazyLock<Vec<Matcher>> = LazyLock::new(|| {
    vec![
        // unittest failure header
        matcher(
            "unittest-failure",
            r"^(?:ERROR|FAIL): (?P<tag>[a-zA-Z_0-9]+) [(](?P<module_class>[a-zA-Z0-9_.]*[.][a-zA-Z_0-9]+)[)]",
        ),
        // svn status output
        matcher("vcs-status", r"^[A-Z?]      (?P<filename>[^ ]+)$"),
        // pytest sometimes encloses the location in square brackets
        matcher("pytest-bracket", r"\[(?P<filename>[^: ]+):(?P<lineno>\d+)]"),
        // pytest node ids
        matcher("pytest-node-id", r"(?P<filename>[^: ]+)::(?P<tag>test[a-zA-Z_0-9]+)"),
        // pdb puts the line number in parentheses
        matcher(
            "pdb-frame",
            r"(?P<filename>[^: ]+)[(](?P<lineno>\d+)[)][a-zA-Z_][a-zA-Z_0-9]+[(][)]",
        ),
        // browser-side js tracebacks, e.g. ()@http://localhost:56166/test/test_Main.js:346
        matcher(
            "js-traceback",
            r"http://[a-z0-9.]*:([0-9]+?)/(?P<filename>[^: ]+):(?P<lineno>\d+)]",
        ),
        // standard compiler error format
        matcher("compiler-error", r"(?P<filename>[^: ]+):(?P<lineno>\d+)"),
        // grep output
        matcher("grep-match", r"(?P<filename>[^: ]+):"),
        // tracebacks; the 'lineno N' spelling comes from tracemalloc
        matcher(
            "quoted-traceback",
            r#""(?P<filename>[^: ]+)", line(?:no)? (?P<lineno>\d+)"#,
        ),
        matcher(
            "bare-traceback",
            r"File (?P<filename>[^: ]+), line(?:no)? (?P<lineno>\d+)",
        ),
        // filename (lines 123-456)
        matcher("lines-range", r"(?P<filename>[^ ]+) [(]lines (?P<lineno>\d+)-\d+[)]"),
        // anything that looks like a unittest-style test name
        matcher(
            "doctest-name",
            r"(?P<tag>(?:doc)?test[a-zA-Z0-9_]*) [(](?P<module_class>[a-zA-Z0-9_.]*[.][a-zA-Z_0-9]+)[)]",
        ),
        // json record with {..."path": "filename", "line": NNN...}
        matcher("json-record", r#""(?P<filename>[^ "]+)", "line": (?P<lineno>\d+)"#),
        // anything that looks like a filename
        matcher("bare-filename", r"(?P<filename>[-_a-zA-Z0-9/.]{3,})"),
        // anything that looks like a package/module
        matcher("dotted-module", r"(^|[^/])(?P<module>[a-zA-Z0-9_.]{3,})($|[^/])"),
        // test names as some runners print them
        matcher("in-test", r"in test (?P<tag>[a-zA-Z_0-9]+)"),
        matcher(
            "test-class-path",
            r"(?P<tag>[a-zA-Z0-9_.]*[.]Test[a-zA-Z_0-9]+[.][a-zA-Z_0-9]+)",
        ),
        matcher("dotted-tag", r"(?P<tag>[a-zA-Z0-9_.]*[.][a-zA-Z_0-9]+)"),
        matcher("test-tag", r"(?P<tag>[a-zA-Z0-9_]*test[a-zA-Z_0-9]+)"),
        // anything that looks like a tag
        matcher("any-identifier", r"(?P<tag>[a-zA-Z0-9_.]+)"),
    ]
});

/// Lazily extract candidates from one line, pattern-priority first, match
/// position second. Callers usually stop at the first candidate that
/// resolves; nothing here touches the filesystem.
pub fn candidates(line: &str) -> impl Iterator<Item = Candidate> + '_ {
    MATCHERS.iter().flat_map(move |m| {
        trace!("trying pattern {}", m.name);
        m.re.captures_iter(line).map(|caps| from_captures(&caps))
    })
}

fn from_captures(caps: &Captures<'_>) -> Candidate {
    let text = |group: &str| caps.name(group).map(|m| m.as_str().to_string());
    Candidate {
        filename: text("filename"),
        // a number too large for u32 is no line number at all
        line_number: caps.name("lineno").and_then(|m| m.as_str().parse().ok()),
        tag: text("tag"),
        qualified_name: text("module_class"),
        module: text("module"),
    }
}
