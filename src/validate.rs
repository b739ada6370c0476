//! Cross-validation of a job file against itself, the filesystem and its
//! Stationery.
//!
//! Each check yields one [`ValidationResult`]. Checks never short-circuit one
//! another; warnings are informational unless the caller asks for strict
//! mode.

use serde::Serialize;
use std::path::Path;

use crate::capability::read_capabilities;
use crate::error::AutomapError;
use crate::exit;
use crate::job::{JobDocument, read_job};
use crate::model::CapabilityDescriptor;
use crate::require_job;

/// Missing documents named individually before the rest are summarized.
pub const MISSING_DOCUMENTS_SHOWN: usize = 5;

pub const FILE_EXISTS: &str = "Job file exists";
pub const WELL_FORMED: &str = "XML well-formed";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: String::new(),
            warnings: Vec::new(),
        }
    }

    pub fn pass(mut self, message: impl Into<String>) -> Self {
        self.passed = true;
        self.message = message.into();
        self
    }

    pub fn fail(mut self, message: impl Into<String>) -> Self {
        self.passed = false;
        self.message = message.into();
        self
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    pub file: String,
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: ValidationResult) {
        self.results.push(result);
    }

    pub fn passed(&self) -> bool {
        self.results.iter().all(|result| result.passed)
    }

    pub fn passed_strict(&self) -> bool {
        self.passed() && self.warning_count() == 0
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|result| result.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    pub fn warning_count(&self) -> usize {
        self.results.iter().map(|result| result.warnings.len()).sum()
    }

    pub fn result(&self, name: &str) -> Option<&ValidationResult> {
        self.results.iter().find(|result| result.name == name)
    }

    /// A missing or misnamed job file is a file error; any other failure
    /// (or, when `strict`, any warning) is a validation error.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if self.result(FILE_EXISTS).is_some_and(|result| !result.passed) {
            return exit::FILE_ERROR;
        }
        let passed = if strict {
            self.passed_strict()
        } else {
            self.passed()
        };
        if passed {
            exit::SUCCESS
        } else {
            exit::VALIDATION_ERROR
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ValidationOptions {
    pub check_documents: bool,
    pub check_formats: bool,
}

/// The Stationery a job points at, or why it could not be used.
#[derive(Clone, Debug)]
pub enum CapabilitySource {
    Loaded(CapabilityDescriptor),
    Unavailable(String),
}

impl CapabilitySource {
    /// Load the Stationery referenced by `job`, turning every failure into a
    /// reason rather than an error.
    pub fn for_job(job: &JobDocument) -> Self {
        match &job.stationery {
            None => CapabilitySource::Unavailable("Stationery reference missing".to_string()),
            Some(status) if !status.exists => {
                CapabilitySource::Unavailable("Stationery not found".to_string())
            }
            Some(status) => match read_capabilities(&status.resolved) {
                Ok(capabilities) => CapabilitySource::Loaded(capabilities),
                Err(err) => CapabilitySource::Unavailable(format!("Failed to parse Stationery: {err}")),
            },
        }
    }
}

/// Validate the job file at `path`.
///
/// A missing file or unreadable XML stops the run after the failing result;
/// otherwise every check in [`validate_job`] is executed.
pub fn validate_file(path: &Path, options: ValidationOptions) -> ValidationReport {
    let mut report = ValidationReport::new(path.display().to_string());

    let exists = ValidationResult::new(FILE_EXISTS);
    match require_job(path) {
        Ok(()) => {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            report.push(exists.pass(name));
        }
        Err(AutomapError::NotFound { .. }) => {
            report.push(exists.fail(format!("File not found: {}", path.display())));
            return report;
        }
        Err(err) => {
            report.push(exists.fail(err.to_string()));
            return report;
        }
    }

    let well_formed = ValidationResult::new(WELL_FORMED);
    let job = match read_job(path) {
        Ok(job) => job,
        Err(AutomapError::Parse { source, .. }) => {
            report.push(well_formed.fail(source.to_string()));
            return report;
        }
        Err(err) => {
            report.push(well_formed.fail(format!("Failed to read: {err}")));
            return report;
        }
    };
    report.push(well_formed.pass(""));

    let capabilities = if options.check_formats {
        CapabilitySource::for_job(&job)
    } else {
        CapabilitySource::Unavailable("format check not requested".to_string())
    };
    report
        .results
        .extend(validate_job(&job, job.base_dir(), &capabilities, options));
    report
}

/// Run every applicable check against `job` in a fixed order.
pub fn validate_job(
    job: &JobDocument,
    job_dir: &Path,
    capabilities: &CapabilitySource,
    options: ValidationOptions,
) -> Vec<ValidationResult> {
    let mut results = vec![
        check_root(job),
        check_stationery(job),
        check_groups(job),
    ];
    if options.check_documents {
        results.push(check_documents(job, job_dir));
    }
    results.push(check_targets(job));
    if options.check_formats {
        results.push(check_formats(job, capabilities));
    }
    results
}

pub fn check_root(job: &JobDocument) -> ValidationResult {
    let mut result = ValidationResult::new("Job element valid");
    if job.root_tag != "Job" {
        return result.fail(format!("Expected <Job>, found <{}>", job.root_tag));
    }
    let descriptor = &job.descriptor;
    if descriptor.name.is_empty() {
        return result.fail("Missing 'name' attribute on Job element");
    }
    if !job.version_declared {
        result.warn("Missing 'version' attribute (defaulting to 1.0)");
    }
    result.pass(format!(
        "name=\"{}\" version=\"{}\"",
        descriptor.name, descriptor.version
    ))
}

pub fn check_stationery(job: &JobDocument) -> ValidationResult {
    let result = ValidationResult::new("Stationery reference");
    if !job.has_project {
        return result.fail("Missing <Project> element");
    }
    let reference = &job.descriptor.stationery_path;
    match &job.stationery {
        None => result.fail("Missing 'path' attribute on Project element"),
        Some(status) if status.exists => result.pass(format!("Found: {reference}")),
        Some(_) => result.fail(format!("Not found: {reference}")),
    }
}

pub fn check_groups(job: &JobDocument) -> ValidationResult {
    let mut result = ValidationResult::new("Source documents");
    if !job.has_files {
        result.warn("Missing <Files> element - no source documents defined");
        return result.pass("(empty)");
    }
    let groups = &job.descriptor.groups;
    if groups.is_empty() {
        result.warn("No <Group> elements found");
        return result.pass("(empty)");
    }

    for group in groups {
        let label = if group.name.is_empty() {
            result.warn("Group missing 'name' attribute");
            "(unnamed)"
        } else {
            group.name.as_str()
        };
        for document in &group.documents {
            if document.is_empty() {
                result.warn(format!("Document in '{label}' missing 'path' attribute"));
            }
        }
    }
    result.pass(format!(
        "{} groups, {} documents",
        groups.len(),
        job.descriptor.document_count()
    ))
}

pub fn check_documents(job: &JobDocument, job_dir: &Path) -> ValidationResult {
    let mut result = ValidationResult::new("Document paths");

    let mut found = 0usize;
    let mut missing: Vec<&str> = Vec::new();
    for document in job.descriptor.groups.iter().flat_map(|group| &group.documents) {
        if document.is_empty() {
            continue;
        }
        if job_dir.join(document).exists() {
            found += 1;
        } else {
            missing.push(document);
        }
    }

    for path in missing.iter().take(MISSING_DOCUMENTS_SHOWN) {
        result.warn(format!("Not found: {path}"));
    }
    if missing.len() > MISSING_DOCUMENTS_SHOWN {
        result.warn(format!(
            "... and {} more missing",
            missing.len() - MISSING_DOCUMENTS_SHOWN
        ));
    }

    match (found, missing.len()) {
        (0, 0) => result.pass("(no documents)"),
        (0, missing) => result.fail(format!("All {missing} documents missing")),
        (found, 0) => result.pass(format!("All {found} documents found")),
        (found, missing) => result.pass(format!("{found} found, {missing} missing")),
    }
}

pub fn check_targets(job: &JobDocument) -> ValidationResult {
    let mut result = ValidationResult::new("Build targets");
    if !job.has_targets {
        return result.fail("Missing <Targets> element");
    }
    let targets = &job.descriptor.targets;
    if targets.is_empty() {
        return result.fail("No <Target> elements found");
    }

    for target in targets {
        if target.name.is_empty() {
            result.warn("Target missing 'name' attribute");
        }
        if target.format.is_empty() {
            let label = if target.name.is_empty() { "?" } else { target.name.as_str() };
            result.warn(format!("Target '{label}' missing 'format' attribute"));
        }
    }
    result.pass(format!(
        "{} targets ({} enabled)",
        targets.len(),
        job.descriptor.enabled_target_count()
    ))
}

pub fn check_formats(job: &JobDocument, capabilities: &CapabilitySource) -> ValidationResult {
    let mut result = ValidationResult::new("Format names");
    let capabilities = match capabilities {
        CapabilitySource::Loaded(capabilities) => capabilities,
        CapabilitySource::Unavailable(reason) => {
            result.warn(format!("Skipped - {reason}"));
            return result.pass("(skipped)");
        }
    };

    if !job.has_targets {
        return result.pass("(no targets)");
    }

    let mut valid = 0usize;
    let mut invalid: Vec<&str> = Vec::new();
    for target in &job.descriptor.targets {
        if capabilities.has_format(&target.format) {
            valid += 1;
        } else {
            invalid.push(&target.format);
        }
    }

    if !invalid.is_empty() {
        for name in &invalid {
            result.warn(format!("Format not in Stationery: {name}"));
        }
        result.warn(format!(
            "Available: {}",
            capabilities.format_names().join(", ")
        ));
    }

    match (valid, invalid.len()) {
        (0, _) => result.fail("No valid formats"),
        (valid, 0) => result.pass(format!("All {valid} formats valid")),
        (valid, invalid) => result.pass(format!("{valid} valid, {invalid} invalid")),
    }
}
