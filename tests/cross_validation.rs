mod support;

use anyhow::{Context, Result};
use automap::validate::MISSING_DOCUMENTS_SHOWN;
use automap::{ValidationOptions, validate_file};
use support::{FormatFixture, job_xml, stationery_xml, write_file};
use tempfile::TempDir;

const ALL_CHECKS: ValidationOptions = ValidationOptions {
    check_documents: true,
    check_formats: true,
};

#[test]
fn unknown_format_names_invalid_value_and_valid_names() -> Result<()> {
    let temp = TempDir::new().context("failed to allocate temp dir")?;
    let stationery = stationery_xml(
        &[
            FormatFixture::new("Alpha", "A", "a"),
            FormatFixture::new("Beta", "B", "b"),
        ],
        true,
    );
    write_file(temp.path(), "Stationery/p.wxsp", &stationery)?;
    let job = write_file(
        temp.path(),
        "en.waj",
        &job_xml("Stationery/p.wxsp", &[], &[("G", "Gamma")]),
    )?;

    let report = validate_file(&job, ALL_CHECKS);
    let formats = report
        .result("Format names")
        .context("format check should run")?;
    assert!(!formats.passed);
    assert_eq!(formats.message, "No valid formats");
    assert!(formats.warnings.iter().any(|w| w.contains("Gamma")));
    let available = formats
        .warnings
        .iter()
        .find(|w| w.starts_with("Available:"))
        .context("valid names should be listed")?;
    assert!(available.contains("Alpha") && available.contains("Beta"));
    assert!(!report.passed());
    Ok(())
}

#[test]
fn partially_missing_documents_pass_with_named_warnings() -> Result<()> {
    let temp = TempDir::new().context("failed to allocate temp dir")?;
    let documents = ["d1.md", "d2.md", "d3.md", "d4.md", "d5.md", "d6.md"];
    write_file(temp.path(), "d1.md", "# one")?;
    write_file(temp.path(), "d2.md", "# two")?;
    write_file(temp.path(), "p.wxsp", "<Project/>")?;
    let job = write_file(
        temp.path(),
        "en.waj",
        &job_xml("p.wxsp", &documents, &[("A", "Alpha")]),
    )?;

    let report = validate_file(
        &job,
        ValidationOptions {
            check_documents: true,
            check_formats: false,
        },
    );
    let paths = report
        .result("Document paths")
        .context("document check should run")?;
    assert!(paths.passed);
    assert_eq!(paths.message, "2 found, 4 missing");
    assert_eq!(paths.warnings.len(), 4, "four missing documents, all named");
    assert!(paths.warnings.iter().all(|w| w.starts_with("Not found: ")));
    Ok(())
}

#[test]
fn more_than_five_missing_are_summarized() -> Result<()> {
    let temp = TempDir::new().context("failed to allocate temp dir")?;
    let documents: Vec<String> = (1..=9).map(|idx| format!("d{idx}.md")).collect();
    let refs: Vec<&str> = documents.iter().map(String::as_str).collect();
    write_file(temp.path(), "d1.md", "# one")?;
    write_file(temp.path(), "d2.md", "# two")?;
    let job = write_file(temp.path(), "en.waj", &job_xml("p.wxsp", &refs, &[("A", "A")]))?;

    let report = validate_file(&job, ALL_CHECKS);
    let paths = report.result("Document paths").context("document check")?;
    assert_eq!(paths.warnings.len(), MISSING_DOCUMENTS_SHOWN + 1);
    assert_eq!(paths.warnings.last().map(String::as_str), Some("... and 2 more missing"));

    let formats = report.result("Format names").context("format check")?;
    assert_eq!(formats.message, "(skipped)");
    assert_eq!(formats.warnings, vec!["Skipped - Stationery not found"]);
    Ok(())
}

#[test]
fn clean_job_passes_every_check() -> Result<()> {
    let temp = TempDir::new().context("failed to allocate temp dir")?;
    write_file(
        temp.path(),
        "p.wxsp",
        &stationery_xml(&[FormatFixture::new("Alpha", "A", "a")], false),
    )?;
    write_file(temp.path(), "Source/intro.md", "# intro")?;
    let job = write_file(
        temp.path(),
        "en.waj",
        &job_xml("p.wxsp", &["Source/intro.md"], &[("A", "Alpha")]),
    )?;

    let report = validate_file(&job, ALL_CHECKS);
    assert!(report.passed_strict(), "{:?}", report.results);
    assert_eq!(report.results.len(), 8);
    Ok(())
}
