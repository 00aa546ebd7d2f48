/// Every error locus can produce. Resolution misses along the way are not
/// errors — candidates that don't pan out are simply skipped.
#[derive(Debug)]
pub enum LocateError {
    /// No candidate yielded an action. User-visible diagnostic.
    NoMatch { line: String },
    /// The file resolver's shortening loop ran past its ceiling. This is a
    /// logic defect, never bad input, so it aborts loudly instead of
    /// masquerading as not-found.
    LoopDetected { filename: String },
}

impl std::fmt::Display for LocateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMatch { line } => write!(f, "don't know how to locate: {line}"),
            Self::LoopDetected { filename } => {
                write!(f, "internal error: path shortening did not terminate for {filename}")
            }
        }
    }
}

impl std::error::Error for LocateError {}

impl LocateError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoMatch { .. } => 2,
            Self::LoopDetected { .. } => 3,
        }
    }
}
