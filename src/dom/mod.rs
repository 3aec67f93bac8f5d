//! Host page abstraction
//!
//! The detector, overlay and scan loop never touch a concrete DOM. They read
//! and write the page through [`PageDom`], which the content script implements
//! over web-sys and tests implement over [`memory::MemoryPage`].

pub mod memory;
pub mod snapshot;

pub use memory::{ElementSpec, MemoryPage, NodeId};
pub use snapshot::{load_snapshot, parse_snapshot, NodeSnapshot, PageSnapshot, StyleSnapshot};

use crate::models::{ComputedStyle, OverlayButton, Rect};
use std::fmt::Debug;
use std::hash::Hash;

pub trait PageDom {
    /// Element handle. Equality is element identity.
    type Node: Clone + PartialEq + Debug;

    /// Hashable identity of a node. Equal keys mean the same element.
    type Key: Copy + Eq + Hash + Debug;

    /// Whatever the host needs to later detach a container's enter/leave pair
    type HoverBinding;

    fn key(&self, node: &Self::Node) -> Self::Key;

    fn body(&self) -> Option<Self::Node>;

    /// Whether `node` is still attached to the document
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Text of the document `<title>`
    fn title(&self) -> Option<String>;

    /// Every `img` in the document, in document order
    fn images(&self) -> Vec<Self::Node>;

    /// Every `img` below `node` (not `node` itself), in document order
    fn images_within(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Lower-case tag name
    fn tag_name(&self, node: &Self::Node) -> String;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn text_content(&self, node: &Self::Node) -> String;

    /// First descendant with the given tag, in document order
    fn first_descendant_by_tag(&self, node: &Self::Node, tag: &str) -> Option<Self::Node>;

    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    fn computed_style(&self, node: &Self::Node) -> ComputedStyle;

    fn is_tag(&self, node: &Self::Node, tag: &str) -> bool {
        self.tag_name(node).eq_ignore_ascii_case(tag)
    }

    fn has_class(&self, node: &Self::Node, class: &str) -> bool {
        self.attribute(node, "class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Nearest ancestor-or-self with the given tag
    fn closest(&self, node: &Self::Node, tag: &str) -> Option<Self::Node> {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if self.is_tag(&candidate, tag) {
                return Some(candidate);
            }
            current = self.parent(&candidate);
        }
        None
    }

    // Writes

    /// Set inline `position: relative`
    fn set_position_relative(&mut self, node: &Self::Node);

    fn has_overlay_button(&self, container: &Self::Node) -> bool;

    /// Append a hidden overlay button to `container`
    fn insert_overlay_button(&mut self, container: &Self::Node, button: &OverlayButton);

    /// Returns whether a button was present
    fn remove_overlay_button(&mut self, container: &Self::Node) -> bool;

    /// Returns whether a button was present
    fn set_overlay_visible(&mut self, container: &Self::Node, visible: bool) -> bool;

    /// Start delivering enter/leave events for `container` to the scan loop
    fn bind_hover(&mut self, container: &Self::Node) -> Self::HoverBinding;

    fn unbind_hover(&mut self, container: &Self::Node, binding: Self::HoverBinding);
}
