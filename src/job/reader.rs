//! Job descriptor reader.

use log::debug;
use roxmltree::Node;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::job::decode_bool;
use crate::model::{
    Condition, DEFAULT_FORMAT_TYPE, DEFAULT_JOB_VERSION, DocumentGroup, JobDescriptor, Setting,
    Target, Variable,
};
use crate::xml::{attr, child_any_ns, children_any_ns, parse_document, read_source};

/// A job file as read from disk, with the facts the validator needs beyond
/// the descriptor itself.
#[derive(Clone, Debug)]
pub struct JobDocument {
    pub path: PathBuf,
    pub root_tag: String,
    pub descriptor: JobDescriptor,
    pub version_declared: bool,
    pub has_project: bool,
    pub has_files: bool,
    pub has_targets: bool,
    pub stationery: Option<StationeryStatus>,
}

/// Where a non-empty stationery reference resolves and whether it exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StationeryStatus {
    pub resolved: PathBuf,
    pub exists: bool,
}

impl JobDocument {
    /// Directory that relative references in the job resolve against.
    pub fn base_dir(&self) -> &Path {
        job_dir(&self.path)
    }
}

pub(crate) fn job_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

pub fn read_job(path: &Path) -> Result<JobDocument> {
    let text = read_source(path, "job")?;
    let doc = parse_document(&text, path)?;
    let root = doc.root_element();

    let project = child_any_ns(root, "Project");
    let files = child_any_ns(root, "Files");
    let targets = child_any_ns(root, "Targets");

    let version = root.attribute("version").filter(|v| !v.is_empty());
    let descriptor = JobDescriptor {
        name: attr(root, "name").to_string(),
        version: version.unwrap_or(DEFAULT_JOB_VERSION).to_string(),
        stationery_path: project
            .map(|node| attr(node, "path").to_string())
            .unwrap_or_default(),
        groups: files.map(read_groups).unwrap_or_default(),
        targets: targets.map(read_targets).unwrap_or_default(),
    };
    debug!(
        "job '{}': {} group(s), {} target(s)",
        descriptor.name,
        descriptor.groups.len(),
        descriptor.targets.len()
    );

    let stationery = if descriptor.stationery_path.is_empty() {
        None
    } else {
        let resolved = job_dir(path).join(&descriptor.stationery_path);
        let exists = resolved.exists();
        Some(StationeryStatus { resolved, exists })
    };

    Ok(JobDocument {
        path: path.to_path_buf(),
        root_tag: root.tag_name().name().to_string(),
        version_declared: version.is_some(),
        has_project: project.is_some(),
        has_files: files.is_some(),
        has_targets: targets.is_some(),
        stationery,
        descriptor,
    })
}

fn read_groups(files: Node<'_, '_>) -> Vec<DocumentGroup> {
    children_any_ns(files, "Group")
        .into_iter()
        .map(|group| DocumentGroup {
            name: attr(group, "name").to_string(),
            documents: children_any_ns(group, "Document")
                .into_iter()
                .map(|doc| attr(doc, "path").to_string())
                .collect(),
        })
        .collect()
}

fn read_targets(targets: Node<'_, '_>) -> Vec<Target> {
    children_any_ns(targets, "Target")
        .into_iter()
        .map(read_target)
        .collect()
}

fn read_target(node: Node<'_, '_>) -> Target {
    Target {
        name: attr(node, "name").to_string(),
        format: attr(node, "format").to_string(),
        format_type: node
            .attribute("formatType")
            .unwrap_or(DEFAULT_FORMAT_TYPE)
            .to_string(),
        build: decode_bool(node.attribute("build"), true),
        clean_output: decode_bool(node.attribute("cleanOutput"), false),
        deploy_target: node
            .attribute("deployTarget")
            .filter(|value| !value.is_empty())
            .map(str::to_string),
        conditions: name_values(node, "Conditions", "Condition")
            .map(|(name, value)| Condition { name, value })
            .collect(),
        variables: name_values(node, "Variables", "Variable")
            .map(|(name, value)| Variable { name, value })
            .collect(),
        settings: name_values(node, "Settings", "Setting")
            .map(|(name, value)| Setting { name, value })
            .collect(),
    }
}

fn name_values<'a>(
    target: Node<'a, '_>,
    container: &str,
    item: &str,
) -> impl Iterator<Item = (String, String)> + 'a {
    child_any_ns(target, container)
        .map(|node| children_any_ns(node, item))
        .unwrap_or_default()
        .into_iter()
        .map(|node| (attr(node, "name").to_string(), attr(node, "value").to_string()))
}
