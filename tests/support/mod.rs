#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub const NAMESPACE: &str = "urn:WebWorks-Publish-Project";

/// One `Format` entry for a generated Stationery file.
pub struct FormatFixture<'a> {
    pub name: &'a str,
    pub target_name: &'a str,
    pub target_id: &'a str,
    pub settings: &'a [(&'a str, &'a str)],
}

impl<'a> FormatFixture<'a> {
    pub fn new(name: &'a str, target_name: &'a str, target_id: &'a str) -> Self {
        Self {
            name,
            target_name,
            target_id,
            settings: &[],
        }
    }
}

/// Stationery XML with the given formats. `namespaced` puts every element in
/// the project namespace through a default `xmlns`.
pub fn stationery_xml(formats: &[FormatFixture<'_>], namespaced: bool) -> String {
    let xmlns = if namespaced {
        format!(r#" xmlns="{NAMESPACE}""#)
    } else {
        String::new()
    };
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Project{xmlns} RuntimeVersion=\"2024.1\" FormatVersion=\"{{Current}}\">\n  <Formats>\n"
    );
    for format in formats {
        xml.push_str(&format!(
            "    <Format Name=\"{}\" TargetName=\"{}\" Type=\"Application\" TargetID=\"{}\"/>\n",
            format.name, format.target_name, format.target_id
        ));
    }
    xml.push_str("  </Formats>\n  <FormatConfigurations>\n");
    for format in formats.iter().filter(|format| !format.settings.is_empty()) {
        xml.push_str(&format!(
            "    <FormatConfiguration TargetID=\"{}\">\n      <FormatSettings>\n",
            format.target_id
        ));
        for (name, value) in format.settings {
            xml.push_str(&format!(
                "        <FormatSetting Name=\"{name}\" Value=\"{value}\"/>\n"
            ));
        }
        xml.push_str("      </FormatSettings>\n    </FormatConfiguration>\n");
    }
    xml.push_str("  </FormatConfigurations>\n  <FileMappings>\n    <FileMapping extension=\".md\" adapter=\"Markdown\"/>\n  </FileMappings>\n</Project>\n");
    xml
}

pub fn write_file(dir: &Path, relative: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

/// Job file with one group of `documents` and one target per `(name, format)`.
pub fn job_xml(stationery: &str, documents: &[&str], targets: &[(&str, &str)]) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Job name=\"en\" version=\"1.0\">\n  <Project path=\"{stationery}\"/>\n  <Files>\n    <Group name=\"Main\">\n"
    );
    for document in documents {
        xml.push_str(&format!("      <Document path=\"{document}\"/>\n"));
    }
    xml.push_str("    </Group>\n  </Files>\n  <Targets>\n");
    for (name, format) in targets {
        xml.push_str(&format!(
            "    <Target name=\"{name}\" format=\"{format}\" formatType=\"Application\" build=\"True\" deployTarget=\"\" cleanOutput=\"False\"/>\n"
        ));
    }
    xml.push_str("  </Targets>\n</Job>");
    xml
}

pub fn binary(name: &str) -> PathBuf {
    let path = match name {
        "parse-stationery" => env!("CARGO_BIN_EXE_parse-stationery"),
        "create-job" => env!("CARGO_BIN_EXE_create-job"),
        "parse-job" => env!("CARGO_BIN_EXE_parse-job"),
        "list-job-targets" => env!("CARGO_BIN_EXE_list-job-targets"),
        "validate-job" => env!("CARGO_BIN_EXE_validate-job"),
        other => panic!("unknown binary {other}"),
    };
    PathBuf::from(path)
}

/// Run one of the crate's commands in `cwd` with colours disabled and no
/// stdin.
pub fn run_in(cwd: &Path, name: &str, args: &[&str]) -> Result<Output> {
    Command::new(binary(name))
        .args(args)
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(std::process::Stdio::null())
        .output()
        .with_context(|| format!("failed to run {name}"))
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Like [`run_in`], feeding `input` on stdin.
pub fn run_with_input(cwd: &Path, name: &str, args: &[&str], input: &str) -> Result<Output> {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new(binary(name))
        .args(args)
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn {name}"))?;
    child
        .stdin
        .take()
        .context("child stdin should be piped")?
        .write_all(input.as_bytes())
        .context("failed to feed stdin")?;
    child
        .wait_with_output()
        .with_context(|| format!("failed to wait for {name}"))
}
