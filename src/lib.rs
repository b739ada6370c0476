//! Readers, compiler and validator for AutoMap job descriptors (`.waj`) and
//! the Stationery capability descriptors (`.wxsp`) they build against.
//!
//! The binaries under `src/bin/` are thin wrappers: they parse flags, call
//! into these modules, and render results through [`console`] and [`render`].

pub mod capability;
pub mod console;
pub mod error;
pub mod interactive;
pub mod job;
pub mod model;
pub mod render;
pub mod safe_write;
pub mod validate;
pub mod xml;

pub use capability::read_capabilities;
pub use error::{AutomapError, Result, exit_code_for};
pub use job::{JobDocument, StationeryStatus, compile_job, load_config, read_job, template_from};
pub use model::{
    CapabilityDescriptor, Condition, DocumentGroup, FileMapping, FormatDescriptor, FormatSetting,
    JobDescriptor, Setting, Target, Variable,
};
pub use safe_write::SafeWriter;
pub use validate::{
    CapabilitySource, ValidationOptions, ValidationReport, ValidationResult, validate_file,
    validate_job,
};

use std::path::Path;

/// Stable exit codes shared by every command.
pub mod exit {
    pub const SUCCESS: i32 = 0;
    pub const FILE_ERROR: i32 = 1;
    pub const ARG_ERROR: i32 = 2;
    pub const VALIDATION_ERROR: i32 = 3;
    pub const CANCELLED: i32 = 4;
}

pub const STATIONERY_EXTENSION: &str = ".wxsp";
pub const JOB_EXTENSION: &str = ".waj";

/// Check that a command's primary input exists and carries the expected
/// extension (compared case-insensitively).
pub fn require_input(path: &Path, kind: &'static str, expected: &'static str) -> Result<()> {
    if !path.exists() {
        return Err(AutomapError::NotFound {
            kind,
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default();
    if extension != expected {
        return Err(AutomapError::WrongExtension {
            kind,
            path: path.to_path_buf(),
            expected,
        });
    }
    Ok(())
}

pub fn require_stationery(path: &Path) -> Result<()> {
    require_input(path, "stationery", STATIONERY_EXTENSION)
}

pub fn require_job(path: &Path) -> Result<()> {
    require_input(path, "job", JOB_EXTENSION)
}

/// Reduce a job name to something safe to use as a file stem.
///
/// Anything but letters, digits, `_`, `-` and `.` becomes `_`, leading dots and dashes are
/// dropped, and an empty result falls back to `job`.
pub fn sanitize_file_stem(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = replaced.trim_start_matches(['.', '-']);
    if trimmed.is_empty() {
        "job".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn require_input_checks_existence_before_extension() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.waj");
        assert!(matches!(
            require_job(&missing),
            Err(AutomapError::NotFound { kind: "job", .. })
        ));

        let wrong = temp.path().join("job.xml");
        fs::write(&wrong, "<Job/>").unwrap();
        assert!(matches!(
            require_job(&wrong),
            Err(AutomapError::WrongExtension { expected: ".waj", .. })
        ));
    }

    #[test]
    fn require_input_ignores_extension_case() {
        let temp = TempDir::new().unwrap();
        let upper = temp.path().join("Project.WXSP");
        fs::write(&upper, "<Project/>").unwrap();
        assert!(require_stationery(&upper).is_ok());
    }

    #[test]
    fn sanitize_strips_separators_and_leading_dots() {
        assert_eq!(sanitize_file_stem("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_stem("en us"), "en_us");
        assert_eq!(sanitize_file_stem("-.-"), "job");
        assert_eq!(sanitize_file_stem(""), "job");
        assert_eq!(sanitize_file_stem("release-2025.1"), "release-2025.1");
    }
}
