use glob::glob;
use log::debug;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybookError {
    #[error("no playbook found")]
    NotFound,
}

/// Expand the configured playbook patterns into a concrete file list.
///
/// Each pattern is glob-expanded and its matches are appended in
/// filesystem order. A pattern is kept literally only when the glob
/// syntax itself fails to parse; a valid pattern that matches nothing
/// is dropped. Entries that cannot be read during expansion are
/// skipped. An empty result is an error: there is nothing to run.
pub fn resolve(patterns: &[String]) -> Result<Vec<String>, PlaybookError> {
    let mut playbooks = Vec::new();

    for pattern in patterns {
        match glob(pattern) {
            Ok(paths) => {
                for path in paths.flatten() {
                    playbooks.push(path.to_string_lossy().into_owned());
                }
            }
            Err(_) => playbooks.push(pattern.clone()),
        }
    }

    if playbooks.is_empty() {
        debug!("no playbooks found for patterns: {:?}", patterns);
        return Err(PlaybookError::NotFound);
    }

    Ok(playbooks)
}
