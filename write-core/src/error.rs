use std::path::PathBuf;

use thiserror::Error;

/// Failures of the compiler's own machinery, as opposed to problems
/// with the source program, which are reported as `Diagnostic`s.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read {path}: {source}")]
    ReadSource {
        path: PathBuf,
        source: std::io::Error,
    },
}
