//! Descriptor model shared by the readers, the serializer and the validator.
//!
//! Types mirror the JSON shapes the commands print (`camelCase` keys), so the
//! same structs serve as the `create-job --config` input and the `--json`
//! reports. Booleans stay `bool` here; the `"True"`/`"False"` wire encoding
//! is confined to `job::writer` and `job::reader`.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

pub const DEFAULT_JOB_VERSION: &str = "1.0";
pub const DEFAULT_FORMAT_TYPE: &str = "Application";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDescriptor {
    pub path: PathBuf,
    pub runtime_version: String,
    pub formats: Vec<FormatDescriptor>,
    pub file_mappings: Vec<FileMapping>,
}

impl CapabilityDescriptor {
    /// Format names in declaration order, without duplicates.
    pub fn format_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.formats.len());
        for format in &self.formats {
            if !names.contains(&format.name.as_str()) {
                names.push(format.name.as_str());
            }
        }
        names
    }

    pub fn has_format(&self, name: &str) -> bool {
        self.formats.iter().any(|format| format.name == name)
    }

    /// Case-insensitive lookup used when an operator types a format name.
    pub fn find_format(&self, name: &str) -> Option<&FormatDescriptor> {
        self.formats
            .iter()
            .find(|format| format.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatDescriptor {
    pub name: String,
    pub target_name: String,
    #[serde(rename = "type")]
    pub format_type: String,
    pub target_id: String,
    pub output_directory: String,
    pub settings: Vec<FormatSetting>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatSetting {
    pub name: String,
    pub default_value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMapping {
    pub extension: String,
    pub adapter: String,
}

/// A build job: the configuration `create-job` compiles and `parse-job`
/// reads back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, rename = "stationery", alias = "stationeryPath")]
    pub stationery_path: String,
    #[serde(default)]
    pub groups: Vec<DocumentGroup>,
    #[serde(default)]
    pub targets: Vec<Target>,
}

impl Default for JobDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: default_version(),
            stationery_path: String::new(),
            groups: Vec::new(),
            targets: Vec::new(),
        }
    }
}

impl JobDescriptor {
    pub fn document_count(&self) -> usize {
        self.groups.iter().map(|group| group.documents.len()).sum()
    }

    pub fn enabled_target_count(&self) -> usize {
        self.targets.iter().filter(|target| target.build).count()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub documents: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub format: String,
    #[serde(default = "default_format_type")]
    pub format_type: String,
    #[serde(default = "default_true")]
    pub build: bool,
    #[serde(default)]
    pub clean_output: bool,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub deploy_target: Option<String>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub settings: Vec<Setting>,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            name: String::new(),
            format: String::new(),
            format_type: default_format_type(),
            build: true,
            clean_output: false,
            deploy_target: None,
            conditions: Vec::new(),
            variables: Vec::new(),
            settings: Vec::new(),
        }
    }
}

impl Target {
    /// A target bound to `format` with the defaults an operator would accept.
    pub fn for_format(format: &FormatDescriptor) -> Self {
        Self {
            name: format.target_name.clone(),
            format: format.name.clone(),
            format_type: format.format_type.clone(),
            ..Self::default()
        }
    }

    pub fn has_overrides(&self) -> bool {
        !(self.conditions.is_empty() && self.variables.is_empty() && self.settings.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_condition_value")]
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

fn default_version() -> String {
    DEFAULT_JOB_VERSION.to_string()
}

fn default_format_type() -> String {
    DEFAULT_FORMAT_TYPE.to_string()
}

fn default_true() -> bool {
    true
}

fn default_condition_value() -> String {
    "True".to_string()
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}
