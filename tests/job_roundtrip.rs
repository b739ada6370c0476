mod support;

use anyhow::{Context, Result};
use automap::{
    AutomapError, Condition, DocumentGroup, JobDescriptor, Setting, Target, Variable, compile_job,
    read_job,
};
use std::fs;
use tempfile::TempDir;

fn full_job() -> JobDescriptor {
    JobDescriptor {
        name: "en".to_string(),
        stationery_path: "Stationery/project.wxsp".to_string(),
        groups: vec![
            DocumentGroup {
                name: "Getting Started".to_string(),
                documents: vec![
                    "Source/install.md".to_string(),
                    "Source/configure.md".to_string(),
                    "Source/first-run.md".to_string(),
                ],
            },
            DocumentGroup {
                name: "Reference".to_string(),
                documents: vec!["Source/api.md".to_string()],
            },
        ],
        targets: vec![
            Target {
                name: "Reverb".to_string(),
                format: "WebWorks Reverb 2.0".to_string(),
                clean_output: true,
                deploy_target: Some("Staging".to_string()),
                conditions: vec![Condition {
                    name: "OnlineOnly".to_string(),
                    value: "True".to_string(),
                }],
                variables: vec![Variable {
                    name: "ProductVersion".to_string(),
                    value: "2025.1".to_string(),
                }],
                settings: vec![
                    Setting {
                        name: "locale".to_string(),
                        value: "en".to_string(),
                    },
                    Setting {
                        name: "theme".to_string(),
                        value: "dark & light".to_string(),
                    },
                ],
                ..Target::default()
            },
            Target {
                name: "PDF".to_string(),
                format: "PDF - XSL-FO".to_string(),
                build: false,
                ..Target::default()
            },
        ],
        ..JobDescriptor::default()
    }
}

#[test]
fn compiled_job_reads_back_unchanged() -> Result<()> {
    let temp = TempDir::new().context("failed to allocate temp dir")?;
    let job = full_job();
    let xml = compile_job(&job)?;
    let path = support::write_file(temp.path(), "en.waj", &xml)?;

    let parsed = read_job(&path)?;
    assert_eq!(parsed.descriptor, job, "job should survive a write/read cycle");
    assert!(parsed.version_declared);
    assert!(parsed.has_project && parsed.has_files && parsed.has_targets);
    Ok(())
}

#[test]
fn tabs_and_newlines_in_values_survive_a_round_trip() -> Result<()> {
    let temp = TempDir::new().context("failed to allocate temp dir")?;
    let mut job = full_job();
    job.groups[0].name = "Main\tGroup".to_string();
    job.groups[0].documents[0] = "a\nb.md".to_string();
    job.targets[0].name = "Line\r\nBreak".to_string();
    job.targets[0].settings[0].value = "tab\there".to_string();
    let path = support::write_file(temp.path(), "en.waj", &compile_job(&job)?)?;

    let parsed = read_job(&path)?;
    assert_eq!(parsed.descriptor, job);
    Ok(())
}

#[test]
fn compiling_twice_is_byte_identical() -> Result<()> {
    let job = full_job();
    let first = compile_job(&job)?;
    let second = compile_job(&job)?;
    assert_eq!(first, second);
    assert!(first.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Job"));
    assert!(!first.ends_with('\n'), "output should have no trailing newline");
    Ok(())
}

#[test]
fn reading_then_recompiling_is_stable() -> Result<()> {
    let temp = TempDir::new().context("failed to allocate temp dir")?;
    let xml = compile_job(&full_job())?;
    let path = support::write_file(temp.path(), "en.waj", &xml)?;
    let again = compile_job(&read_job(&path)?.descriptor)?;
    assert_eq!(xml, again);
    Ok(())
}

#[test]
fn empty_target_list_is_rejected_before_writing() {
    let mut job = full_job();
    job.targets.clear();
    match compile_job(&job) {
        Err(AutomapError::Validation(problems)) => {
            assert!(problems.contains(&"At least one target is required".to_string()));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn lowercase_booleans_in_files_read_as_false() -> Result<()> {
    let temp = TempDir::new().context("failed to allocate temp dir")?;
    let path = temp.path().join("en.waj");
    fs::write(
        &path,
        r#"<Job name="en" version="1.0"><Project path="p.wxsp"/><Targets><Target name="a" format="A" build="true"/></Targets></Job>"#,
    )?;
    let job = read_job(&path)?;
    assert!(!job.descriptor.targets[0].build);
    Ok(())
}
