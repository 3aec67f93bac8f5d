//! Rendered layout state read from the host page

use crate::utils::helpers::{parse_opacity, parse_z_index};
use serde::{Deserialize, Serialize};

/// Bounding box of a rendered element, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Both sides at least `min` pixels
    pub fn fits(&self, min: f64) -> bool {
        self.width >= min && self.height >= min
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Inline,
    Block,
    None,
    Other,
}

impl Display {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "none" => Display::None,
            "block" => Display::Block,
            "inline" => Display::Inline,
            _ => Display::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

impl Visibility {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "hidden" => Visibility::Hidden,
            "collapse" => Visibility::Collapse,
            _ => Visibility::Visible,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl Position {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "relative" => Position::Relative,
            "absolute" => Position::Absolute,
            "fixed" => Position::Fixed,
            "sticky" => Position::Sticky,
            _ => Position::Static,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZIndex {
    #[default]
    Auto,
    Value(i32),
}

impl ZIndex {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "auto" | "" => ZIndex::Auto,
            other => ZIndex::Value(parse_z_index(other)),
        }
    }

    /// Stacking value used for ordering; `auto` counts as 0
    pub fn value(&self) -> i32 {
        match self {
            ZIndex::Auto => 0,
            ZIndex::Value(z) => *z,
        }
    }
}

/// The subset of `getComputedStyle` the detector reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedStyle {
    pub display: Display,
    pub visibility: Visibility,
    pub opacity: f64,
    pub position: Position,
    pub z_index: ZIndex,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::default(),
            visibility: Visibility::default(),
            opacity: 1.0,
            position: Position::default(),
            z_index: ZIndex::default(),
        }
    }
}

impl ComputedStyle {
    /// Build from raw CSS property values as the browser reports them
    pub fn from_css(display: &str, visibility: &str, opacity: &str, position: &str, z_index: &str) -> Self {
        Self {
            display: Display::parse(display),
            visibility: Visibility::parse(visibility),
            opacity: parse_opacity(opacity),
            position: Position::parse(position),
            z_index: ZIndex::parse(z_index),
        }
    }

    /// Not hidden by display, visibility or opacity
    pub fn is_shown(&self) -> bool {
        self.display != Display::None
            && self.visibility != Visibility::Hidden
            && self.opacity != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert!(!rect.is_empty());
        assert!(Rect::new(0.0, 0.0, 0.0, 40.0).is_empty());
    }

    #[test]
    fn test_z_index_parsing() {
        assert_eq!(ZIndex::parse("auto").value(), 0);
        assert_eq!(ZIndex::parse("7").value(), 7);
        assert_eq!(ZIndex::parse("-2").value(), -2);
        assert_eq!(ZIndex::parse("bogus").value(), 0);
    }

    #[test]
    fn test_style_from_css() {
        let style = ComputedStyle::from_css("none", "visible", "1", "relative", "auto");
        assert_eq!(style.display, Display::None);
        assert_eq!(style.position, Position::Relative);
        assert!(!style.is_shown());

        let faded = ComputedStyle::from_css("block", "visible", "0", "static", "3");
        assert!(!faded.is_shown());
        assert_eq!(faded.z_index, ZIndex::Value(3));
    }
}
