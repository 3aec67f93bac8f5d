//! Serialized page snapshots
//!
//! A snapshot captures the parts of a rendered page the detector reads: the
//! element tree, attributes, own text, bounding boxes and computed styles.

use super::memory::{ElementSpec, MemoryPage, NodeId};
use crate::error::{Error, Result};
use crate::models::{ComputedStyle, Rect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    #[serde(default)]
    pub title: Option<String>,
    pub body: NodeSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub rect: Option<Rect>,
    #[serde(default)]
    pub style: Option<StyleSnapshot>,
    #[serde(default)]
    pub children: Vec<NodeSnapshot>,
}

/// Computed style values exactly as `getComputedStyle` reports them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSnapshot {
    pub display: String,
    pub visibility: String,
    pub opacity: String,
    pub position: String,
    pub z_index: String,
}

impl Default for StyleSnapshot {
    fn default() -> Self {
        Self {
            display: "inline".to_string(),
            visibility: "visible".to_string(),
            opacity: "1".to_string(),
            position: "static".to_string(),
            z_index: "auto".to_string(),
        }
    }
}

impl StyleSnapshot {
    pub fn to_computed(&self) -> ComputedStyle {
        ComputedStyle::from_css(
            &self.display,
            &self.visibility,
            &self.opacity,
            &self.position,
            &self.z_index,
        )
    }
}

impl PageSnapshot {
    /// Rebuild the snapshot as a live in-memory page
    pub fn to_page(&self) -> Result<MemoryPage> {
        if !self.body.tag.eq_ignore_ascii_case("body") {
            return Err(Error::Snapshot(format!(
                "root element must be <body>, found <{}>",
                self.body.tag
            )));
        }

        let mut page = MemoryPage::new();
        if let Some(title) = &self.title {
            page.set_title(title.clone());
        }

        let body = page.body_id();
        if let Some(rect) = self.body.rect {
            page.set_rect(body, rect);
        }
        if let Some(style) = &self.body.style {
            page.set_style(body, style.to_computed());
        }
        for (name, value) in &self.body.attrs {
            page.set_attribute(body, name, value.clone());
        }

        for child in &self.body.children {
            append_subtree(&mut page, body, child)?;
        }

        Ok(page)
    }
}

fn append_subtree(page: &mut MemoryPage, parent: NodeId, node: &NodeSnapshot) -> Result<()> {
    if node.tag.trim().is_empty() {
        return Err(Error::Snapshot("element with empty tag".to_string()));
    }

    let mut spec = ElementSpec::new(node.tag.as_str()).text(node.text.clone());
    for (name, value) in &node.attrs {
        spec = spec.attr(name.as_str(), value.as_str());
    }
    if let Some(rect) = node.rect {
        spec = spec.rect(rect);
    }
    if let Some(style) = &node.style {
        spec = spec.style(style.to_computed());
    }

    let id = page.append(parent, spec);
    for child in &node.children {
        append_subtree(page, id, child)?;
    }

    Ok(())
}

/// Parse a snapshot from JSON text
pub fn parse_snapshot(content: &str) -> Result<MemoryPage> {
    let snapshot: PageSnapshot = serde_json::from_str(content)?;
    snapshot.to_page()
}

/// Load a snapshot file
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<MemoryPage> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_snapshot(&content)
}
