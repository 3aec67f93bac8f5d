//! Overlay button description handed to the host page

/// Class name carried by every injected button
pub const BUTTON_CLASS: &str = "fragrance-hover-btn";

/// Inline style of the injected button. Hidden until the container is hovered.
pub const BUTTON_STYLE: &str = "position: absolute; display: none; z-index: 10000; \
background: rgba(0, 0, 0, 0.85); color: white; border: none; padding: 8px 12px; \
border-radius: 6px; font-size: 12px; font-weight: 500; cursor: pointer; \
transition: all 0.2s ease; backdrop-filter: blur(4px); pointer-events: auto; \
box-shadow: 0 2px 8px rgba(0, 0, 0, 0.3); line-height: 1;";

/// Button to place inside a container. Offsets are CSS `right`/`bottom`
/// values relative to the container's padding box.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayButton {
    pub label: String,
    pub search_url: String,
    pub right: f64,
    pub bottom: f64,
}

impl OverlayButton {
    /// Full inline style including the anchor offsets
    pub fn css_text(&self) -> String {
        format!("{} right: {}px; bottom: {}px;", BUTTON_STYLE, self.right, self.bottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Leave,
}
