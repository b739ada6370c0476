//! Error taxonomy shared by the readers, the serializer and the writer.
//!
//! Every variant maps to one of the stable command exit codes so binaries can
//! wrap errors in `anyhow` context and still report the right status.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::exit;

pub type Result<T, E = AutomapError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AutomapError {
    #[error("{kind} file not found: {}", .path.display())]
    NotFound { kind: &'static str, path: PathBuf },

    #[error("invalid {kind} file extension: {} (expected {expected})", .path.display())]
    WrongExtension {
        kind: &'static str,
        path: PathBuf,
        expected: &'static str,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("failed to decode {} as {encoding}", .path.display())]
    Encoding { path: PathBuf, encoding: &'static str },

    #[error("invalid job configuration {}:\n{}", .path.display(), bullet_list(.problems))]
    InvalidConfig { path: PathBuf, problems: Vec<String> },

    #[error("job configuration is invalid:\n{}", bullet_list(.0))]
    Validation(Vec<String>),

    #[error("no formats found in stationery file {}", .0.display())]
    NoFormats(PathBuf),

    #[error("no targets found in job file {}", .0.display())]
    NoTargets(PathBuf),

    #[error("path traversal attempt detected: {path} resolves outside {}", .base.display())]
    PathTraversal { path: String, base: PathBuf },

    #[error("refusing to overwrite existing file {} (pass --force to replace it)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Usage(String),

    #[error("cancelled")]
    Cancelled,
}

impl AutomapError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        AutomapError::Io {
            context: context.into(),
            source,
        }
    }

    /// Exit status a command reports when this error ends the run.
    pub fn exit_code(&self) -> i32 {
        match self {
            AutomapError::NotFound { .. }
            | AutomapError::WrongExtension { .. }
            | AutomapError::InvalidConfig { .. }
            | AutomapError::AlreadyExists(_)
            | AutomapError::Io { .. } => exit::FILE_ERROR,
            AutomapError::Usage(_) => exit::ARG_ERROR,
            AutomapError::Parse { .. }
            | AutomapError::Encoding { .. }
            | AutomapError::Validation(_)
            | AutomapError::NoFormats(_)
            | AutomapError::NoTargets(_)
            | AutomapError::PathTraversal { .. } => exit::VALIDATION_ERROR,
            AutomapError::Cancelled => exit::CANCELLED,
        }
    }
}

/// Exit code for an error chain produced by a command.
///
/// Falls back to `FILE_ERROR` when nothing in the chain is an `AutomapError`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<AutomapError>())
        .map(AutomapError::exit_code)
        .unwrap_or(exit::FILE_ERROR)
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn validation_lists_every_violation() {
        let err = AutomapError::Validation(vec![
            "Job name cannot be empty".to_string(),
            "At least one target is required".to_string(),
        ]);
        let text = err.to_string();
        assert!(text.contains("  - Job name cannot be empty"));
        assert!(text.contains("  - At least one target is required"));
        assert_eq!(err.exit_code(), exit::VALIDATION_ERROR);
    }

    #[test]
    fn exit_code_survives_context() {
        let wrapped: anyhow::Result<()> = Err(AutomapError::Cancelled).context("collecting job");
        let err = wrapped.unwrap_err();
        assert_eq!(exit_code_for(&err), exit::CANCELLED);

        let plain = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&plain), exit::FILE_ERROR);
    }
}
