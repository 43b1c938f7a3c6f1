//! JSON5 fixtures describing a document tree
//!
//! ```json5
//! {
//!   root: {
//!     tag: "form",
//!     children: [
//!       { tag: "input", attrs: { name: "role", value: "admin" } },
//!       { tag: "p", attrs: { "data-show": "role==admin" }, text: "hello" },
//!     ],
//!   },
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Document, DomError, Element, NodeId};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid fixture: {0}")]
    Syntax(#[from] json5::Error),
    #[error("fixture node at {0} has an empty tag")]
    EmptyTag(String),
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// a fixture file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub root: NodeSpec,
}

/// one element of a fixture tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    fn to_element(&self, path: &str) -> Result<Element, FixtureError> {
        if self.tag.trim().is_empty() {
            return Err(FixtureError::EmptyTag(path.to_string()));
        }
        let mut element = Element::new(self.tag.trim());
        for (name, value) in &self.attrs {
            element = element.attr(name.as_str(), value.as_str());
        }
        if let Some(text) = &self.text {
            element = element.text(text.as_str());
        }
        Ok(element)
    }
}

impl Fixture {
    /// build the document described by this fixture
    pub fn to_document(&self) -> Result<Document, FixtureError> {
        let mut doc = Document::new(self.root.to_element("root")?);
        let root = doc.root();
        append_children(&mut doc, root, &self.root.children, "root")?;
        Ok(doc)
    }
}

fn append_children(
    doc: &mut Document,
    parent: NodeId,
    children: &[NodeSpec],
    path: &str,
) -> Result<(), FixtureError> {
    for (i, child) in children.iter().enumerate() {
        let child_path = format!("{}.children[{}]", path, i);
        let id = doc.append(parent, child.to_element(&child_path)?)?;
        append_children(doc, id, &child.children, &child_path)?;
    }
    Ok(())
}

/// parse fixture text into a document
pub fn parse_fixture(content: &str) -> Result<Document, FixtureError> {
    let fixture: Fixture = json5::from_str(content)?;
    fixture.to_document()
}

/// read and parse a fixture file
pub fn load_fixture(path: &Path) -> Result<Document, FixtureError> {
    let content = fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_fixture(&content)
}
