//! JSON job configurations: loading (schema-checked) and template generation.

use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs::File;
use std::path::Path;

use crate::error::{AutomapError, Result};
use crate::model::{CapabilityDescriptor, DocumentGroup, JobDescriptor, Target};

const CONFIG_SCHEMA: &str = include_str!("../../schema/job_config.schema.json");

/// Load a job configuration, reporting every schema violation at once.
pub fn load_config(path: &Path) -> Result<JobDescriptor> {
    if !path.exists() {
        return Err(AutomapError::NotFound {
            kind: "config",
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path)
        .map_err(|err| AutomapError::io(format!("opening config {}", path.display()), err))?;
    let value: Value = serde_json::from_reader(file).map_err(|err| AutomapError::InvalidConfig {
        path: path.to_path_buf(),
        problems: vec![format!("invalid JSON: {err}")],
    })?;
    config_from_value(value, path)
}

pub(crate) fn config_from_value(value: Value, path: &Path) -> Result<JobDescriptor> {
    let problems = schema_problems(&value);
    if !problems.is_empty() {
        return Err(AutomapError::InvalidConfig {
            path: path.to_path_buf(),
            problems,
        });
    }
    serde_json::from_value(value).map_err(|err| AutomapError::InvalidConfig {
        path: path.to_path_buf(),
        problems: vec![err.to_string()],
    })
}

fn schema_problems(value: &Value) -> Vec<String> {
    let schema: Value = match serde_json::from_str(CONFIG_SCHEMA) {
        Ok(schema) => schema,
        Err(err) => return vec![format!("bundled config schema is not valid JSON: {err}")],
    };
    let compiled = match JSONSchema::compile(&schema) {
        Ok(compiled) => compiled,
        Err(err) => return vec![format!("bundled config schema failed to compile: {err}")],
    };
    match compiled.validate(value) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|err| {
                let location = err.instance_path.to_string();
                if location.is_empty() {
                    err.to_string()
                } else {
                    format!("{location}: {err}")
                }
            })
            .collect(),
    }
}

/// Starter configuration with one target per format in `capabilities`.
pub fn template_from(capabilities: &CapabilityDescriptor, stationery_ref: &str) -> JobDescriptor {
    JobDescriptor {
        name: "my-job".to_string(),
        stationery_path: stationery_ref.to_string(),
        groups: vec![DocumentGroup {
            name: "Main".to_string(),
            documents: vec![
                "Source/document1.md".to_string(),
                "Source/document2.md".to_string(),
            ],
        }],
        targets: capabilities.formats.iter().map(Target::for_format).collect(),
        ..JobDescriptor::default()
    }
}
