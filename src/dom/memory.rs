//! In-memory page used by the CLI and the test suite

use super::PageDom;
use crate::models::{ComputedStyle, Display, OverlayButton, Position, Rect, Visibility, ZIndex};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Listener handle returned by [`MemoryPage::bind_hover`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverListener(u64);

/// Builder for a new element
#[derive(Debug, Clone)]
pub struct ElementSpec {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    rect: Rect,
    style: ComputedStyle,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            attrs: BTreeMap::new(),
            text: String::new(),
            rect: Rect::default(),
            style: ComputedStyle::default(),
        }
    }

    /// Shorthand for an `img` with a `src`
    pub fn img(src: impl Into<String>) -> Self {
        Self::new("img").attr("src", src)
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        let classes = self.attrs.entry("class".to_string()).or_default();
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(class);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Rendered box at the origin
    pub fn size(self, width: f64, height: f64) -> Self {
        self.rect(Rect::new(0.0, 0.0, width, height))
    }

    pub fn style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.style.position = position;
        self
    }

    pub fn z_index(mut self, z: i32) -> Self {
        self.style.z_index = ZIndex::Value(z);
        self
    }

    pub fn display_none(mut self) -> Self {
        self.style.display = Display::None;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.style.visibility = Visibility::Hidden;
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.style.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone)]
struct MemoryNode {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    rect: Rect,
    style: ComputedStyle,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Button currently mounted on a container
#[derive(Debug, Clone, PartialEq)]
pub struct MountedButton {
    pub button: OverlayButton,
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub struct MemoryPage {
    nodes: Vec<MemoryNode>,
    body: NodeId,
    title: Option<String>,
    buttons: BTreeMap<NodeId, MountedButton>,
    listeners: BTreeMap<NodeId, Vec<HoverListener>>,
    next_listener: u64,
    buttons_inserted: usize,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    /// Empty document with a `body` sized like a desktop viewport
    pub fn new() -> Self {
        let body = MemoryNode {
            tag: "body".to_string(),
            attrs: BTreeMap::new(),
            text: String::new(),
            rect: Rect::new(0.0, 0.0, 1280.0, 800.0),
            style: ComputedStyle::default(),
            parent: None,
            children: Vec::new(),
        };

        Self {
            nodes: vec![body],
            body: NodeId(0),
            title: None,
            buttons: BTreeMap::new(),
            listeners: BTreeMap::new(),
            next_listener: 0,
            buttons_inserted: 0,
        }
    }

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Append a new element as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(MemoryNode {
            tag: spec.tag,
            attrs: spec.attrs,
            text: spec.text,
            rect: spec.rect,
            style: spec.style,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Detach `node` (and its subtree) from the document
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != node);
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        self.nodes[node.0].attrs.insert(name.to_string(), value.into());
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.nodes[node.0].rect = rect;
    }

    pub fn set_style(&mut self, node: NodeId, style: ComputedStyle) {
        self.nodes[node.0].style = style;
    }

    pub fn button(&self, container: NodeId) -> Option<&MountedButton> {
        self.buttons.get(&container)
    }

    /// Number of buttons currently mounted
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Total insertions since the page was created
    pub fn buttons_inserted(&self) -> usize {
        self.buttons_inserted
    }

    pub fn hover_listener_count(&self, container: NodeId) -> usize {
        self.listeners.get(&container).map(Vec::len).unwrap_or(0)
    }

    /// CSS-like label such as `div#hero.product.card`
    pub fn describe(&self, node: NodeId) -> String {
        let element = &self.nodes[node.0];
        let mut label = element.tag.clone();
        if let Some(id) = element.attrs.get("id") {
            label.push('#');
            label.push_str(id);
        }
        if let Some(classes) = element.attrs.get("class") {
            for class in classes.split_whitespace() {
                label.push('.');
                label.push_str(class);
            }
        }
        label
    }

    fn descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[node.0].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn descendant_images(&self, node: NodeId) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.descendants(node, &mut all);
        all.retain(|&id| self.nodes[id.0].tag == "img");
        all
    }
}

impl PageDom for MemoryPage {
    type Node = NodeId;
    type Key = NodeId;
    type HoverBinding = HoverListener;

    fn key(&self, node: &NodeId) -> NodeId {
        *node
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        let mut current = Some(*node);
        while let Some(id) = current {
            if id == self.body {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }

    fn images(&self) -> Vec<NodeId> {
        self.descendant_images(self.body)
    }

    fn images_within(&self, node: &NodeId) -> Vec<NodeId> {
        self.descendant_images(*node)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn tag_name(&self, node: &NodeId) -> String {
        self.nodes[node.0].tag.clone()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes[node.0].attrs.get(name).cloned()
    }

    fn text_content(&self, node: &NodeId) -> String {
        let mut text = self.nodes[node.0].text.clone();
        for child in &self.nodes[node.0].children {
            text.push_str(&self.text_content(child));
        }
        text
    }

    fn first_descendant_by_tag(&self, node: &NodeId, tag: &str) -> Option<NodeId> {
        let mut all = Vec::new();
        self.descendants(*node, &mut all);
        all.into_iter().find(|id| self.nodes[id.0].tag.eq_ignore_ascii_case(tag))
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        self.nodes[node.0].rect
    }

    fn computed_style(&self, node: &NodeId) -> ComputedStyle {
        self.nodes[node.0].style
    }

    fn set_position_relative(&mut self, node: &NodeId) {
        self.nodes[node.0].style.position = Position::Relative;
    }

    fn has_overlay_button(&self, container: &NodeId) -> bool {
        self.buttons.contains_key(container)
    }

    fn insert_overlay_button(&mut self, container: &NodeId, button: &OverlayButton) {
        // appendChild of a second button would leave two in the DOM
        let previous = self.buttons.insert(*container, MountedButton {
            button: button.clone(),
            visible: false,
        });
        debug_assert!(previous.is_none(), "button inserted without removing the old one");
        self.buttons_inserted += 1;
    }

    fn remove_overlay_button(&mut self, container: &NodeId) -> bool {
        self.buttons.remove(container).is_some()
    }

    fn set_overlay_visible(&mut self, container: &NodeId, visible: bool) -> bool {
        match self.buttons.get_mut(container) {
            Some(mounted) => {
                mounted.visible = visible;
                true
            }
            None => false,
        }
    }

    fn bind_hover(&mut self, container: &NodeId) -> HoverListener {
        let listener = HoverListener(self.next_listener);
        self.next_listener += 1;
        self.listeners.entry(*container).or_default().push(listener);
        listener
    }

    fn unbind_hover(&mut self, container: &NodeId, binding: HoverListener) {
        if let Some(bound) = self.listeners.get_mut(container) {
            bound.retain(|&l| l != binding);
            if bound.is_empty() {
                self.listeners.remove(container);
            }
        }
    }
}
