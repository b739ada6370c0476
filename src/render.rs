//! Human-readable and JSON views of descriptors and validation reports.
//!
//! Every renderer returns a `String`; the commands decide where it goes.

use serde::Serialize;

use crate::console::Palette;
use crate::job::JobDocument;
use crate::model::{CapabilityDescriptor, Condition, JobDescriptor, Setting, Target, Variable};
use crate::validate::{ValidationReport, ValidationResult};

const RULE_WIDTH: usize = 70;
const BANNER_WIDTH: usize = 60;

fn push_line(out: &mut String, line: impl AsRef<str>) {
    out.push_str(line.as_ref());
    out.push('\n');
}

fn joined<T>(items: &[T], pair: impl Fn(&T) -> String) -> String {
    items.iter().map(pair).collect::<Vec<_>>().join(", ")
}

fn condition_pair(condition: &Condition) -> String {
    format!("{}={}", condition.name, condition.value)
}

fn variable_pair(variable: &Variable) -> String {
    format!("{}={}", variable.name, variable.value)
}

fn setting_pair(setting: &Setting) -> String {
    format!("{}=\"{}\"", setting.name, setting.value)
}

/// Job name as listings show it; a missing name reads as `Unknown`.
fn display_name(job: &JobDescriptor) -> &str {
    if job.name.is_empty() {
        "Unknown"
    } else {
        &job.name
    }
}

fn build_status(target: &Target, palette: Palette) -> String {
    if target.build {
        palette.green("[BUILD]")
    } else {
        palette.yellow("[SKIP]")
    }
}

pub fn stationery_table(caps: &CapabilityDescriptor, palette: Palette) -> String {
    let mut out = String::new();
    let file_name = caps
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    push_line(&mut out, "");
    push_line(&mut out, format!("{} {file_name}", palette.green("Stationery:")));
    push_line(
        &mut out,
        format!("{} {}", palette.blue("Runtime Version:"), caps.runtime_version),
    );
    push_line(&mut out, "");

    push_line(&mut out, palette.cyan("Available Formats:"));
    push_line(&mut out, "-".repeat(RULE_WIDTH));
    push_line(
        &mut out,
        format!("{:<30} {:<15} {:<25}", "Format Name", "Type", "Target Name"),
    );
    push_line(&mut out, "-".repeat(RULE_WIDTH));
    for format in &caps.formats {
        push_line(
            &mut out,
            format!(
                "{:<30} {:<15} {:<25}",
                format.name, format.format_type, format.target_name
            )
            .trim_end(),
        );
    }
    push_line(&mut out, "");

    for format in caps.formats.iter().filter(|format| !format.settings.is_empty()) {
        push_line(
            &mut out,
            palette.yellow(&format!("Settings for {}:", format.name)),
        );
        for setting in &format.settings {
            push_line(
                &mut out,
                format!("  - {} (default: \"{}\")", setting.name, setting.default_value),
            );
        }
        push_line(&mut out, "");
    }

    if !caps.file_mappings.is_empty() {
        push_line(&mut out, palette.cyan("Supported File Types:"));
        let extensions: Vec<&str> = caps
            .file_mappings
            .iter()
            .map(|mapping| mapping.extension.as_str())
            .collect();
        push_line(&mut out, format!("  {}", extensions.join(", ")));
        push_line(&mut out, "");
    }
    out
}

/// `parse-job --json` shape: the descriptor plus stationery resolution.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReport<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub stationery: &'a str,
    pub stationery_resolved: String,
    pub stationery_exists: bool,
    pub groups: &'a [crate::model::DocumentGroup],
    pub targets: Vec<TargetReport<'a>>,
}

impl<'a> JobReport<'a> {
    pub fn new(job: &'a JobDocument) -> Self {
        let descriptor = &job.descriptor;
        let (stationery_resolved, stationery_exists) = match &job.stationery {
            Some(status) => (status.resolved.display().to_string(), status.exists),
            None => (String::new(), false),
        };
        Self {
            name: &descriptor.name,
            version: &descriptor.version,
            stationery: &descriptor.stationery_path,
            stationery_resolved,
            stationery_exists,
            groups: &descriptor.groups,
            targets: descriptor.targets.iter().map(TargetReport::new).collect(),
        }
    }
}

/// One target as printed by the JSON reports. `deployTarget` is always
/// present and override counts sit beside the lists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetReport<'a> {
    pub name: &'a str,
    pub format: &'a str,
    pub format_type: &'a str,
    pub build: bool,
    pub clean_output: bool,
    pub deploy_target: &'a str,
    pub conditions_count: usize,
    pub variables_count: usize,
    pub settings_count: usize,
    pub conditions: &'a [Condition],
    pub variables: &'a [Variable],
    pub settings: &'a [Setting],
}

impl<'a> TargetReport<'a> {
    pub fn new(target: &'a Target) -> Self {
        Self {
            name: &target.name,
            format: &target.format,
            format_type: &target.format_type,
            build: target.build,
            clean_output: target.clean_output,
            deploy_target: target.deploy_target.as_deref().unwrap_or_default(),
            conditions_count: target.conditions.len(),
            variables_count: target.variables.len(),
            settings_count: target.settings.len(),
            conditions: &target.conditions,
            variables: &target.variables,
            settings: &target.settings,
        }
    }
}

pub fn job_summary(job: &JobDocument, palette: Palette) -> String {
    let descriptor = &job.descriptor;
    let mut out = String::new();

    push_line(&mut out, "");
    push_line(
        &mut out,
        format!(
            "{} {} (version {})",
            palette.green("Job:"),
            display_name(descriptor),
            descriptor.version
        ),
    );
    let status = match &job.stationery {
        Some(status) if status.exists => palette.green("exists"),
        _ => palette.yellow("not found"),
    };
    push_line(
        &mut out,
        format!(
            "{} {} [{status}]",
            palette.blue("Stationery:"),
            descriptor.stationery_path
        ),
    );

    push_groups(&mut out, descriptor, palette);

    push_line(&mut out, "");
    push_line(
        &mut out,
        palette.cyan(&format!("Targets ({}):", descriptor.targets.len())),
    );
    for target in &descriptor.targets {
        push_line(&mut out, "");
        push_line(
            &mut out,
            format!("  {} {}", build_status(target, palette), target.name),
        );
        push_line(&mut out, format!("         Format: {}", target.format));
        push_line(&mut out, format!("         Type: {}", target.format_type));
        push_overrides(&mut out, target, "         ");
    }
    push_line(&mut out, "");
    out
}

/// Preview shown by `create-job` before anything is written.
pub fn config_preview(job: &JobDescriptor, palette: Palette) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let mut out = String::new();

    push_line(&mut out, "");
    push_line(&mut out, &banner);
    push_line(
        &mut out,
        format!("{} {} (version {})", palette.green("Job:"), job.name, job.version),
    );
    push_line(
        &mut out,
        format!("{} {}", palette.blue("Stationery:"), job.stationery_path),
    );
    push_line(&mut out, &banner);

    push_groups(&mut out, job, palette);

    push_line(&mut out, "");
    push_line(&mut out, palette.cyan(&format!("Targets ({}):", job.targets.len())));
    for target in &job.targets {
        push_line(&mut out, "");
        push_line(
            &mut out,
            format!("  {} {}", build_status(target, palette), target.name),
        );
        push_overrides(&mut out, target, "         ");
    }

    push_line(&mut out, "");
    push_line(&mut out, &banner);
    out
}

fn push_groups(out: &mut String, job: &JobDescriptor, palette: Palette) {
    push_line(out, "");
    push_line(
        out,
        palette.cyan(&format!(
            "Source Documents ({} groups, {} documents):",
            job.groups.len(),
            job.document_count()
        )),
    );
    for group in &job.groups {
        push_line(out, "");
        push_line(out, format!("  {}/", group.name));
        for document in &group.documents {
            push_line(out, format!("    - {document}"));
        }
    }
}

fn push_overrides(out: &mut String, target: &Target, indent: &str) {
    if let Some(deploy) = &target.deploy_target {
        push_line(out, format!("{indent}Deploy: {deploy}"));
    }
    if target.clean_output {
        push_line(out, format!("{indent}Clean: Yes"));
    }
    if !target.conditions.is_empty() {
        push_line(
            out,
            format!("{indent}Conditions: {}", joined(&target.conditions, condition_pair)),
        );
    }
    if !target.variables.is_empty() {
        push_line(
            out,
            format!("{indent}Variables: {}", joined(&target.variables, variable_pair)),
        );
    }
    if !target.settings.is_empty() {
        push_line(
            out,
            format!("{indent}Settings: {}", joined(&target.settings, setting_pair)),
        );
    }
}

fn targets_header(out: &mut String, job: &JobDescriptor, targets: &[&Target], palette: Palette) {
    let enabled = targets.iter().filter(|target| target.build).count();
    push_line(out, "");
    push_line(out, format!("{} {}", palette.cyan("Job:"), display_name(job)));
    push_line(
        out,
        format!("{} {}", palette.blue("Stationery:"), job.stationery_path),
    );
    push_line(out, "");
    push_line(
        out,
        palette.cyan(&format!(
            "Targets ({} total, {enabled} enabled):",
            targets.len()
        )),
    );
    push_line(out, "");
}

pub fn targets_table(job: &JobDescriptor, targets: &[&Target], palette: Palette) -> String {
    let indent = "          ";
    let mut out = String::new();
    targets_header(&mut out, job, targets, palette);

    for target in targets {
        push_line(
            &mut out,
            format!("  {} {}", build_status(target, palette), target.name),
        );
        push_line(&mut out, format!("{indent}Format: {}", target.format));
        if let Some(deploy) = &target.deploy_target {
            push_line(&mut out, format!("{indent}Deploy: {deploy}"));
        }
        if target.clean_output {
            push_line(&mut out, format!("{indent}Clean: Yes"));
        }

        let mut counts = Vec::new();
        if !target.conditions.is_empty() {
            counts.push(format!("Conditions: {}", target.conditions.len()));
        }
        if !target.variables.is_empty() {
            counts.push(format!("Variables: {}", target.variables.len()));
        }
        if !target.settings.is_empty() {
            counts.push(format!("Settings: {}", target.settings.len()));
        }
        if !counts.is_empty() {
            push_line(&mut out, format!("{indent}{}", counts.join(", ")));
        }
        push_line(&mut out, "");
    }
    out
}

pub fn targets_detailed(job: &JobDescriptor, targets: &[&Target], palette: Palette) -> String {
    let indent = "          ";
    let mut out = String::new();
    targets_header(&mut out, job, targets, palette);

    for target in targets {
        push_line(
            &mut out,
            format!("  {} {}", build_status(target, palette), target.name),
        );
        push_line(&mut out, format!("{indent}Format: {}", target.format));
        push_line(&mut out, format!("{indent}Type: {}", target.format_type));
        if let Some(deploy) = &target.deploy_target {
            push_line(&mut out, format!("{indent}Deploy: {deploy}"));
        }
        let clean = if target.clean_output { "Yes" } else { "No" };
        push_line(&mut out, format!("{indent}Clean: {clean}"));

        if !target.conditions.is_empty() {
            push_line(&mut out, format!("{indent}Conditions:"));
            for condition in &target.conditions {
                push_line(
                    &mut out,
                    format!("{indent}  - {} = {}", condition.name, condition.value),
                );
            }
        }
        if !target.variables.is_empty() {
            push_line(&mut out, format!("{indent}Variables:"));
            for variable in &target.variables {
                push_line(
                    &mut out,
                    format!("{indent}  - {} = {}", variable.name, variable.value),
                );
            }
        }
        if !target.settings.is_empty() {
            push_line(&mut out, format!("{indent}Settings:"));
            for setting in &target.settings {
                push_line(
                    &mut out,
                    format!("{indent}  - {} = \"{}\"", setting.name, setting.value),
                );
            }
        }
        push_line(&mut out, "");
    }
    out
}

pub fn targets_simple(targets: &[&Target]) -> String {
    let mut out = String::new();
    for target in targets {
        let status = if target.build { "[BUILD]" } else { "[SKIP]" };
        push_line(&mut out, format!("{status} {}", target.name));
    }
    out
}

pub fn validation_result(result: &ValidationResult, palette: Palette) -> String {
    let status = if result.passed {
        palette.green("[PASS]")
    } else {
        palette.red("[FAIL]")
    };
    let mut out = if result.message.is_empty() {
        format!("{status} {}\n", result.name)
    } else {
        format!("{status} {} - {}\n", result.name, result.message)
    };
    for warning in &result.warnings {
        push_line(&mut out, format!("  {} {warning}", palette.yellow("[WARN]")));
    }
    out
}

/// Full validation output. Without `verbose`, clean passes are omitted.
pub fn validation_report(
    report: &ValidationReport,
    verbose: bool,
    strict: bool,
    palette: Palette,
) -> String {
    let mut out = String::new();
    push_line(&mut out, "");
    push_line(
        &mut out,
        format!("{} {}", palette.blue("Validation Results:"), report.file),
    );
    push_line(&mut out, "");
    for result in &report.results {
        if verbose || !result.passed || !result.warnings.is_empty() {
            out.push_str(&validation_result(result, palette));
        }
    }
    push_line(&mut out, "");
    push_line(&mut out, summary_line(report, strict, palette));
    out
}

pub fn summary_line(report: &ValidationReport, strict: bool, palette: Palette) -> String {
    let total = report.results.len();
    let warnings = report.warning_count();
    let passed = if strict {
        report.passed_strict()
    } else {
        report.passed()
    };

    if !passed {
        let failed = report.failed_count();
        return if failed == 0 {
            format!(
                "{} ({warnings} warnings in strict mode)",
                palette.red("Validation: FAILED")
            )
        } else {
            format!(
                "{} ({failed}/{total} checks failed)",
                palette.red("Validation: FAILED")
            )
        };
    }

    let head = palette.green("Validation: PASSED");
    let passed = report.passed_count();
    if warnings > 0 {
        format!("{head} ({passed}/{total} checks, {warnings} warnings)")
    } else {
        format!("{head} ({passed}/{total} checks)")
    }
}
