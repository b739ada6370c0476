//! Job descriptor serializer.
//!
//! `compile_job` validates the whole configuration first and only then emits
//! XML, so a caller either gets the full list of problems or a complete
//! document. Output is deterministic: fixed element and attribute order,
//! two-space indentation, one declaration line, no trailing newline.

use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use std::borrow::Cow;
use std::io;

use crate::error::{AutomapError, Result};
use crate::job::encode_bool;
use crate::model::{JobDescriptor, Target};

/// Every problem that would make `job` an invalid job file.
pub fn check_config(job: &JobDescriptor) -> Vec<String> {
    let mut problems = Vec::new();

    if job.name.trim().is_empty() {
        problems.push("Job name cannot be empty".to_string());
    }
    if job.stationery_path.trim().is_empty() {
        problems.push("Stationery path cannot be empty".to_string());
    }
    if job.targets.is_empty() {
        problems.push("At least one target is required".to_string());
    }
    for (idx, target) in job.targets.iter().enumerate() {
        if target.name.trim().is_empty() {
            problems.push(format!("Target {} name cannot be empty", idx + 1));
        }
        if target.format.trim().is_empty() {
            problems.push(format!("Target {} format cannot be empty", idx + 1));
        }
    }
    for (idx, group) in job.groups.iter().enumerate() {
        if group.name.trim().is_empty() {
            problems.push(format!("Group {} name cannot be empty", idx + 1));
        }
    }

    problems
}

/// Validate `job` and serialize it to job-file XML.
pub fn compile_job(job: &JobDescriptor) -> Result<String> {
    let problems = check_config(job);
    if !problems.is_empty() {
        return Err(AutomapError::Validation(problems));
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_job(&mut writer, job)?;
    String::from_utf8(writer.into_inner()).map_err(|err| {
        AutomapError::io("encoding job XML", io::Error::new(io::ErrorKind::InvalidData, err))
    })
}

type XmlWriter = Writer<Vec<u8>>;

fn write_job(w: &mut XmlWriter, job: &JobDescriptor) -> Result<()> {
    emit(
        w,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;
    open(
        w,
        "Job",
        &[("name", job.name.as_str()), ("version", job.version.as_str())],
    )?;
    empty(w, "Project", &[("path", job.stationery_path.as_str())])?;

    if job.groups.is_empty() {
        empty(w, "Files", &[])?;
    } else {
        open(w, "Files", &[])?;
        for group in &job.groups {
            if group.documents.is_empty() {
                empty(w, "Group", &[("name", group.name.as_str())])?;
                continue;
            }
            open(w, "Group", &[("name", group.name.as_str())])?;
            for document in &group.documents {
                empty(w, "Document", &[("path", document.as_str())])?;
            }
            close(w, "Group")?;
        }
        close(w, "Files")?;
    }

    open(w, "Targets", &[])?;
    for target in &job.targets {
        write_target(w, target)?;
    }
    close(w, "Targets")?;

    close(w, "Job")
}

fn write_target(w: &mut XmlWriter, target: &Target) -> Result<()> {
    let attrs = [
        ("name", target.name.as_str()),
        ("format", target.format.as_str()),
        ("formatType", target.format_type.as_str()),
        ("build", encode_bool(target.build)),
        ("deployTarget", target.deploy_target.as_deref().unwrap_or_default()),
        ("cleanOutput", encode_bool(target.clean_output)),
    ];
    if !target.has_overrides() {
        return empty(w, "Target", &attrs);
    }

    open(w, "Target", &attrs)?;
    if !target.conditions.is_empty() {
        open(
            w,
            "Conditions",
            &[
                ("Expression", ""),
                ("UseClassicConditions", "False"),
                ("UseDocumentExpression", "True"),
            ],
        )?;
        for condition in &target.conditions {
            empty(
                w,
                "Condition",
                &[
                    ("name", condition.name.as_str()),
                    ("value", condition.value.as_str()),
                    ("Passthrough", "False"),
                    ("UseDocumentValue", "False"),
                ],
            )?;
        }
        close(w, "Conditions")?;
    }
    if !target.variables.is_empty() {
        open(w, "Variables", &[])?;
        for variable in &target.variables {
            empty(
                w,
                "Variable",
                &[
                    ("name", variable.name.as_str()),
                    ("value", variable.value.as_str()),
                    ("UseDocumentValue", "False"),
                ],
            )?;
        }
        close(w, "Variables")?;
    }
    if !target.settings.is_empty() {
        open(w, "Settings", &[])?;
        for setting in &target.settings {
            empty(
                w,
                "Setting",
                &[
                    ("name", setting.name.as_str()),
                    ("value", setting.value.as_str()),
                ],
            )?;
        }
        close(w, "Settings")?;
    }
    close(w, "Target")
}

/// Escaped attribute value. Tab, newline and carriage return become
/// character references so readers do not normalize them to spaces.
fn attribute_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in escape(value).chars() {
        match ch {
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            other => out.push(other),
        }
    }
    out
}

fn element<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for &(key, value) in attrs {
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Owned(attribute_value(value).into_bytes()),
        });
    }
    start
}

fn open(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    emit(w, Event::Start(element(name, attrs)))
}

fn empty(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    emit(w, Event::Empty(element(name, attrs)))
}

fn close(w: &mut XmlWriter, name: &str) -> Result<()> {
    emit(w, Event::End(BytesEnd::new(name)))
}

fn emit(w: &mut XmlWriter, event: Event<'_>) -> Result<()> {
    w.write_event(event)
        .map_err(|err| AutomapError::io("writing job XML", err))
}
