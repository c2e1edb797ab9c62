//! Deterministic, document-order extraction of annotatable units.
//!
//! The indexer accepts either an EPUB package (a zip archive) or a bare XML
//! document and produces the ordered unit list the session steps through:
//! content documents in package reading order, units in document order within
//! each, classified by a marker class on the element.
//!
//! Archive reading is delegated to `zip`, XML parsing to `roxmltree`; this
//! module only decides what qualifies as a unit and in what order.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Error, Result};
use crate::unit::Unit;

/// Marker class selecting units inside an EPUB's content documents.
pub const EPUB_MARKER_CLASS: &str = "identifiable";

/// Marker class selecting units inside a bare (TEI) XML document.
pub const XML_MARKER_CLASS: &str = "transcribable";

/// Fixed location of the container descriptor inside an EPUB archive.
const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Produce the ordered list of annotatable units for `path`.
///
/// If `path` opens as a zip archive it is treated as an EPUB package and
/// walked in reading order; otherwise it is parsed as a single XML document.
/// Results are deterministic given identical input bytes.
pub fn index(path: &Path) -> Result<Vec<Unit>> {
    let file = File::open(path).map_err(|err| Error::UnreadableInput {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;

    match ZipArchive::new(file) {
        Ok(archive) => index_epub(archive),
        Err(ZipError::InvalidArchive(_)) => {
            debug!(path = %path.display(), "input is not a zip archive, treating as bare XML");
            index_xml(path)
        }
        Err(err) => Err(err.into()),
    }
}

/// Walk an EPUB archive: container descriptor → package document → spine →
/// content documents, emitting units in reading-then-document order.
fn index_epub<R: Read + std::io::Seek>(mut archive: ZipArchive<R>) -> Result<Vec<Unit>> {
    let container = read_entry(&mut archive, CONTAINER_PATH)?;
    let container_doc = roxmltree::Document::parse(&container)?;

    // The container descriptor is the only entry with a fixed location; it
    // points at the package (OPF) document.
    let rootfile = find_element(&container_doc, "rootfile")
        .ok_or_else(|| Error::MalformedPackage("container.xml has no <rootfile> element".into()))?;
    let opf_path = required_attr(rootfile, "full-path")?.to_string();

    let opf = read_entry(&mut archive, &opf_path)?;
    let opf_doc = roxmltree::Document::parse(&opf)?;

    // Manifest: id → href for every item in the package.
    let mut items: HashMap<&str, &str> = HashMap::new();
    for item in elements_named(&opf_doc, "item") {
        items.insert(required_attr(item, "id")?, required_attr(item, "href")?);
    }

    // Spine: ordered idrefs, resolved through the manifest into content
    // document hrefs. This order is the package reading order.
    let mut hrefs: Vec<&str> = Vec::new();
    for itemref in elements_named(&opf_doc, "itemref") {
        let idref = required_attr(itemref, "idref")?;
        let href = items.get(idref).copied().ok_or_else(|| {
            Error::MalformedPackage(format!("spine idref '{idref}' not found in manifest"))
        })?;
        hrefs.push(href);
    }

    // Hrefs are relative to the package document, not the archive root.
    let opf_dir = opf_path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");

    let mut units = Vec::new();
    for (sequence_index, href) in hrefs.iter().copied().enumerate() {
        let entry_path = if opf_dir.is_empty() {
            href.to_string()
        } else {
            format!("{opf_dir}/{href}")
        };

        let content = read_entry(&mut archive, &entry_path)?;
        let doc = roxmltree::Document::parse(&content)?;
        collect_units(
            &doc,
            EPUB_MARKER_CLASS,
            href,
            sequence_index,
            true,
            &mut units,
        )?;
    }

    debug!(units = units.len(), files = hrefs.len(), "indexed EPUB package");
    Ok(units)
}

/// Parse a single XML document and emit its transcribable units.
fn index_xml(path: &Path) -> Result<Vec<Unit>> {
    let content = std::fs::read_to_string(path).map_err(|err| Error::UnreadableInput {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    let doc = roxmltree::Document::parse(&content).map_err(|err| Error::UnreadableInput {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;

    let source_file = path.display().to_string();
    let mut units = Vec::new();
    collect_units(&doc, XML_MARKER_CLASS, &source_file, 0, false, &mut units)?;

    debug!(units = units.len(), "indexed bare XML document");
    Ok(units)
}

/// Scan a parsed document for elements carrying `marker` in their `class`
/// attribute and append one unit per match, in document order.
///
/// Marked elements inside an EPUB package must carry an id (the output
/// formats reference units by it); bare XML falls back to an empty id.
fn collect_units(
    doc: &roxmltree::Document<'_>,
    marker: &str,
    source_file: &str,
    sequence_index: usize,
    id_required: bool,
    units: &mut Vec<Unit>,
) -> Result<()> {
    for node in doc.descendants().filter(|n| n.is_element()) {
        if !has_marker_class(node, marker) {
            continue;
        }

        let id = match node.attribute("id") {
            Some(id) => id.to_string(),
            None if id_required => {
                return Err(Error::MalformedPackage(format!(
                    "element marked '{marker}' in {source_file} has no id attribute"
                )));
            }
            None => String::new(),
        };

        units.push(Unit {
            id,
            text: flatten_text(node),
            source_file: source_file.to_string(),
            sequence_index,
        });
    }
    Ok(())
}

/// Whether the node's `class` attribute contains `marker` as a
/// whitespace-separated token.
fn has_marker_class(node: roxmltree::Node<'_, '_>, marker: &str) -> bool {
    node.attribute("class")
        .is_some_and(|classes| classes.split_whitespace().any(|c| c == marker))
}

/// Concatenate all descendant text of `node` in document order.
///
/// Character-exact: no whitespace normalization. The traversal is iterative
/// (`descendants` walks sibling/child links), so nesting depth is unbounded.
fn flatten_text(node: roxmltree::Node<'_, '_>) -> String {
    let mut text = String::new();
    for child in node.descendants() {
        if child.is_text() {
            text.push_str(child.text().unwrap_or(""));
        }
    }
    text
}

/// Read one archive entry into a string, mapping a missing entry to
/// [`Error::MalformedPackage`].
fn read_entry<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(Error::MalformedPackage(format!(
                "archive has no '{name}' entry"
            )));
        }
        Err(err) => return Err(err.into()),
    };

    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(content)
}

fn find_element<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    doc.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn elements_named<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
    name: &'a str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> {
    doc.descendants()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn required_attr<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name).ok_or_else(|| {
        Error::MalformedPackage(format!(
            "<{}> element has no '{name}' attribute",
            node.tag_name().name()
        ))
    })
}
