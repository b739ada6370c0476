mod support;

use anyhow::{Context, Result};
use automap::read_capabilities;
use support::{FormatFixture, stationery_xml, write_file};
use tempfile::TempDir;

fn formats() -> Vec<FormatFixture<'static>> {
    vec![
        FormatFixture {
            settings: &[("locale", "en"), ("toc-depth", "3")],
            ..FormatFixture::new("WebWorks Reverb 2.0", "Reverb", "reverb-1")
        },
        FormatFixture::new("PDF - XSL-FO", "PDF", "pdf-1"),
    ]
}

#[test]
fn namespaced_and_unqualified_files_parse_identically() -> Result<()> {
    let temp = TempDir::new().context("failed to allocate temp dir")?;
    let namespaced = write_file(temp.path(), "ns.wxsp", &stationery_xml(&formats(), true))?;
    let plain = write_file(temp.path(), "plain.wxsp", &stationery_xml(&formats(), false))?;

    let a = read_capabilities(&namespaced)?;
    let b = read_capabilities(&plain)?;
    assert_eq!(a.runtime_version, "2024.1");
    assert_eq!(a.formats, b.formats);
    assert_eq!(a.file_mappings, b.file_mappings);
    assert_eq!(a.formats.len(), 2);
    assert_eq!(a.formats[0].settings.len(), 2);
    assert_eq!(a.formats[0].output_directory, "Output/Reverb");
    Ok(())
}

#[test]
fn format_without_settings_group_gets_empty_settings() -> Result<()> {
    let temp = TempDir::new().context("failed to allocate temp dir")?;
    let path = write_file(temp.path(), "p.wxsp", &stationery_xml(&formats(), false))?;
    let capabilities = read_capabilities(&path)?;
    let pdf = capabilities
        .find_format("pdf - xsl-fo")
        .context("PDF format should be listed")?;
    assert!(pdf.settings.is_empty());
    Ok(())
}

#[test]
fn mixed_document_uses_namespaced_elements_only() -> Result<()> {
    let temp = TempDir::new().context("failed to allocate temp dir")?;
    let xml = format!(
        r#"<Project xmlns:ep="{ns}" RuntimeVersion="1">
  <ep:Formats>
    <ep:Format Name="Qualified" TargetName="Q" Type="Application" TargetID="q"/>
  </ep:Formats>
  <Formats>
    <Format Name="Plain" TargetName="P" Type="Application" TargetID="p"/>
  </Formats>
</Project>"#,
        ns = support::NAMESPACE
    );
    let path = write_file(temp.path(), "mixed.wxsp", &xml)?;
    let capabilities = read_capabilities(&path)?;
    assert_eq!(capabilities.format_names(), vec!["Qualified"]);
    Ok(())
}

#[test]
fn latin1_stationery_is_decoded_by_its_declaration() -> Result<()> {
    let temp = TempDir::new().context("failed to allocate temp dir")?;
    let mut bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?>
<Project RuntimeVersion="1">
  <Formats>
    <Format Name="R"#
        .to_vec();
    bytes.push(0xE9);
    bytes.extend_from_slice(
        br#"sum" TargetName="Resume" Type="Application" TargetID="r"/>
  </Formats>
</Project>"#,
    );
    let path = temp.path().join("latin.wxsp");
    std::fs::write(&path, bytes).context("failed to write stationery")?;

    let capabilities = read_capabilities(&path)?;
    assert_eq!(capabilities.format_names(), vec!["R\u{e9}sum"]);
    Ok(())
}
