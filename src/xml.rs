//! Document loading and namespace-tolerant element lookup over `roxmltree`.
//!
//! Stationery files are written with or without the ePublisher project
//! namespace. Every lookup runs in two phases: namespaced first, then
//! unqualified, and returns whichever phase found something. Results from the
//! two phases are never mixed.

use encoding_rs::{Encoding, UTF_8};
use log::debug;
use roxmltree::{Document, Node};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::error::{AutomapError, Result};

pub const PROJECT_NAMESPACE: &str = "urn:WebWorks-Publish-Project";

/// Read a file for parsing and decode it to text.
///
/// A byte order mark wins, then the `encoding` named in the XML declaration,
/// then UTF-8. Bytes that do not decode cleanly are an [`AutomapError::Encoding`].
pub fn read_source(path: &Path, kind: &'static str) -> Result<String> {
    if !path.exists() {
        return Err(AutomapError::NotFound {
            kind,
            path: path.to_path_buf(),
        });
    }
    let bytes =
        fs::read(path).map_err(|err| AutomapError::io(format!("reading {}", path.display()), err))?;
    decode_source(&bytes, path)
}

fn decode_source(bytes: &[u8], path: &Path) -> Result<String> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes).unwrap_or(UTF_8), bytes),
    };
    debug!("decoding {} as {}", path.display(), encoding.name());
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(Cow::into_owned)
        .ok_or_else(|| AutomapError::Encoding {
            path: path.to_path_buf(),
            encoding: encoding.name(),
        })
}

/// Encoding label from a leading `<?xml ... encoding="..."?>`, if any.
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let rest = bytes.strip_prefix(b"<?xml")?;
    let decl = &rest[..rest.windows(2).position(|pair| pair == b"?>")?];
    let at = decl.windows(8).position(|window| window == b"encoding")?;
    let after = decl[at + 8..].trim_ascii_start().strip_prefix(b"=")?.trim_ascii_start();
    let (&quote, value) = after.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let label = &value[..value.iter().position(|&byte| byte == quote)?];
    Encoding::for_label(label)
}

/// Parse `text` (read from `path`) with DTDs disallowed.
pub fn parse_document<'a>(text: &'a str, path: &Path) -> Result<Document<'a>> {
    Document::parse(text).map_err(|source| AutomapError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn is_element_named(node: &Node<'_, '_>, local: &str, namespace: Option<&str>) -> bool {
    node.is_element() && node.tag_name().name() == local && node.tag_name().namespace() == namespace
}

/// All elements named `local` at or below `root`, in document order.
pub fn descendants_any_ns<'a, 'input>(root: Node<'a, 'input>, local: &str) -> Vec<Node<'a, 'input>> {
    let namespaced: Vec<_> = root
        .descendants()
        .filter(|node| is_element_named(node, local, Some(PROJECT_NAMESPACE)))
        .collect();
    if !namespaced.is_empty() {
        return namespaced;
    }
    root.descendants()
        .filter(|node| is_element_named(node, local, None))
        .collect()
}

/// Direct children of `parent` named `local`, in document order.
pub fn children_any_ns<'a, 'input>(parent: Node<'a, 'input>, local: &str) -> Vec<Node<'a, 'input>> {
    let namespaced: Vec<_> = parent
        .children()
        .filter(|node| is_element_named(node, local, Some(PROJECT_NAMESPACE)))
        .collect();
    if !namespaced.is_empty() {
        return namespaced;
    }
    parent
        .children()
        .filter(|node| is_element_named(node, local, None))
        .collect()
}

/// First direct child of `parent` named `local`.
pub fn child_any_ns<'a, 'input>(parent: Node<'a, 'input>, local: &str) -> Option<Node<'a, 'input>> {
    parent
        .children()
        .find(|node| is_element_named(node, local, Some(PROJECT_NAMESPACE)))
        .or_else(|| {
            parent
                .children()
                .find(|node| is_element_named(node, local, None))
        })
}

/// Attribute value or an empty string.
pub fn attr<'a>(node: Node<'a, '_>, name: &str) -> &'a str {
    node.attribute(name).unwrap_or_default()
}
