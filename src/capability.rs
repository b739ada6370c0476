//! Stationery (capability descriptor) reader.
//!
//! Collects every `FormatConfiguration` settings group keyed by `TargetID`
//! first, then attaches those settings to the `Format` elements. Formats whose
//! target id has no settings group get an empty list.

use log::{debug, warn};
use roxmltree::Node;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::{CapabilityDescriptor, FileMapping, FormatDescriptor, FormatSetting};
use crate::xml::{attr, child_any_ns, children_any_ns, descendants_any_ns, parse_document, read_source};

/// `FormatVersion` value meaning "same as `RuntimeVersion`".
pub const CURRENT_FORMAT_VERSION: &str = "{Current}";

/// Read and parse a Stationery file.
///
/// Returns a descriptor with zero formats when none are declared; callers
/// decide whether that is fatal.
pub fn read_capabilities(path: &Path) -> Result<CapabilityDescriptor> {
    let text = read_source(path, "stationery")?;
    let doc = parse_document(&text, path)?;
    let root = doc.root_element();

    let runtime_version = runtime_version(root);
    debug!("runtime version: {runtime_version}");

    let settings = settings_by_target_id(root);
    let formats: Vec<FormatDescriptor> = descendants_any_ns(root, "Format")
        .into_iter()
        .map(|node| format_descriptor(node, &settings))
        .collect();
    debug!("found {} format(s) in {}", formats.len(), path.display());

    let file_mappings: Vec<FileMapping> = descendants_any_ns(root, "FileMapping")
        .into_iter()
        .map(|node| FileMapping {
            extension: attr(node, "extension").to_string(),
            adapter: attr(node, "adapter").to_string(),
        })
        .collect();
    debug!("found {} file mapping(s)", file_mappings.len());

    Ok(CapabilityDescriptor {
        path: fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()),
        runtime_version,
        formats,
        file_mappings,
    })
}

fn runtime_version(root: Node<'_, '_>) -> String {
    let runtime = attr(root, "RuntimeVersion");
    match attr(root, "FormatVersion") {
        "" | CURRENT_FORMAT_VERSION => runtime.to_string(),
        declared => declared.to_string(),
    }
}

fn settings_by_target_id(root: Node<'_, '_>) -> HashMap<String, Vec<FormatSetting>> {
    let mut map: HashMap<String, Vec<FormatSetting>> = HashMap::new();
    for config in descendants_any_ns(root, "FormatConfiguration") {
        let target_id = attr(config, "TargetID");
        if target_id.is_empty() {
            continue;
        }
        let settings: Vec<FormatSetting> = child_any_ns(config, "FormatSettings")
            .map(|group| {
                children_any_ns(group, "FormatSetting")
                    .into_iter()
                    .map(|setting| FormatSetting {
                        name: attr(setting, "Name").to_string(),
                        default_value: attr(setting, "Value").to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        if map.insert(target_id.to_string(), settings).is_some() {
            warn!("duplicate FormatConfiguration for TargetID {target_id}; keeping the last one");
        }
    }
    map
}

fn format_descriptor(
    node: Node<'_, '_>,
    settings: &HashMap<String, Vec<FormatSetting>>,
) -> FormatDescriptor {
    let target_id = attr(node, "TargetID").to_string();
    let target_name = attr(node, "TargetName").to_string();
    let output_directory = child_any_ns(node, "OutputDirectory")
        .and_then(|dir| dir.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Output/{target_name}"));

    FormatDescriptor {
        name: attr(node, "Name").to_string(),
        format_type: attr(node, "Type").to_string(),
        settings: settings.get(&target_id).cloned().unwrap_or_default(),
        target_id,
        target_name,
        output_directory,
    }
}
