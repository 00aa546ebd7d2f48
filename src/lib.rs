#![warn(clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,   // Rust naming conventions
    clippy::missing_errors_doc,        // the error enum is self-describing
    clippy::must_use_candidate,        // resolver helpers are internal plumbing
)]

pub mod context;
pub mod error;
pub(crate) mod extract;
pub(crate) mod locate;
pub mod tags;
pub mod types;

use std::path::PathBuf;

use context::{Filesystem, Host};
use error::LocateError;
use tags::TagHit;
use types::{Action, Candidate, SearchConfig};

/// The single public API. One line of text in, one navigation action out:
/// extract candidates → resolve each against the filesystem and tag index →
/// first candidate that pans out wins.
pub fn resolve(
    line: &str,
    config: &SearchConfig,
    fs: &dyn Filesystem,
    host: &dyn Host,
) -> Result<Action, LocateError> {
    let line = line.trim().replace('\\', "/");

    for candidate in extract::candidates(&line) {
        if let Some(action) = try_candidate(&candidate, config, fs, host)? {
            return Ok(action);
        }
    }
    Err(LocateError::NoMatch { line })
}

/// Rules for one candidate, in priority order; the first that applies
/// produces the action. `Ok(None)` means "nothing usable, next candidate".
fn try_candidate(
    candidate: &Candidate,
    config: &SearchConfig,
    fs: &dyn Filesystem,
    host: &dyn Host,
) -> Result<Option<Action>, LocateError> {
    // A test name with its class qualifier is the most precise thing we can
    // have — give the smart-tag integration first shot at it.
    if let (Some(tag), Some(qualified)) = (&candidate.tag, &candidate.qualified_name) {
        let full = format!("{qualified}.{tag}");
        log::debug!("looking for smart tag {full}");
        if host.smart_tag_lookup(&full) {
            return Ok(Some(Action::JumpToTagSmart { name: full }));
        }
    }

    let mut filename: Option<PathBuf> = None;
    if let Some(name) = &candidate.filename {
        filename = locate::locate_file_detoxified(name, config, fs)?;
    }
    if filename.is_none()
        && let Some(module) = &candidate.module
    {
        filename = locate::locate_module(module, config, fs)?;
    }

    if let (Some(path), Some(line)) = (&filename, candidate.line_number) {
        // same-file optimization: skip the reload, just move the cursor
        if host
            .current_buffer()
            .is_some_and(|buffer| fs.same_entity(path, buffer))
        {
            return Ok(Some(Action::JumpToLine { line }));
        }
        return Ok(Some(Action::OpenFileAtLine {
            path: path.clone(),
            line,
        }));
    }

    if let Some(tag) = &candidate.tag {
        let mut tag = tag.as_str();
        let mut hit = tags::resolve_tag(tag, filename.as_deref(), fs, host);
        // a qualified name may be indexed under its bare last component
        if hit.is_none()
            && let Some((_, bare)) = tag.rsplit_once('.')
        {
            tag = bare;
            hit = tags::resolve_tag(tag, filename.as_deref(), fs, host);
        }
        match hit {
            Some(TagHit::Indexed(index)) => {
                return Ok(Some(Action::JumpToTagIndexed {
                    tag: tag.to_string(),
                    index,
                }));
            }
            Some(TagHit::Deferred) => {
                return Ok(Some(Action::JumpToTag {
                    tag: tag.to_string(),
                }));
            }
            None => {}
        }
    }

    if let Some(path) = filename {
        return Ok(Some(Action::OpenFile { path }));
    }

    Ok(None)
}
