//! Container resolution

use crate::config::ScanConfig;
use crate::dom::PageDom;
use crate::models::Position;

/// Finds the ancestor that hosts one overlay button for an image group
#[derive(Debug, Clone)]
pub struct ContainerResolver {
    classes: Vec<String>,
}

impl Default for ContainerResolver {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

impl ContainerResolver {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            classes: config.container_classes.clone(),
        }
    }

    /// Walk up from the image's parent, never testing `body` itself. Falls
    /// back to the parent, which is `body` for an image placed directly in it.
    pub fn resolve<P: PageDom>(&self, page: &P, image: &P::Node) -> Option<P::Node> {
        let parent = page.parent(image)?;
        let body = page.body();

        let mut current = Some(parent.clone());
        while let Some(node) = current {
            if body.as_ref() == Some(&node) {
                break;
            }
            if self.is_grouping(page, &node) {
                return Some(node);
            }
            current = page.parent(&node);
        }

        Some(parent)
    }

    fn is_grouping<P: PageDom>(&self, page: &P, node: &P::Node) -> bool {
        if page.images_within(node).is_empty() {
            return false;
        }

        self.classes.iter().any(|class| page.has_class(node, class))
            || page.is_tag(node, "figure")
            || page
                .attribute(node, "data-zoom")
                .map(|zoom| !zoom.is_empty())
                .unwrap_or(false)
            || page.computed_style(node).position == Position::Relative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, MemoryPage};

    #[test]
    fn test_product_class_ancestor() {
        let mut page = MemoryPage::new();
        let card = page.append(page.body_id(), ElementSpec::new("div").class("product"));
        let link = page.append(card, ElementSpec::new("a"));
        let img = page.append(link, ElementSpec::img("a.jpg"));

        assert_eq!(ContainerResolver::default().resolve(&page, &img), Some(card));
    }

    #[test]
    fn test_nearest_match_wins() {
        let mut page = MemoryPage::new();
        let outer = page.append(page.body_id(), ElementSpec::new("div").class("product"));
        let figure = page.append(outer, ElementSpec::new("figure"));
        let img = page.append(figure, ElementSpec::img("a.jpg"));

        assert_eq!(ContainerResolver::default().resolve(&page, &img), Some(figure));
    }

    #[test]
    fn test_zoom_marker_and_relative_position() {
        let mut page = MemoryPage::new();
        let zoom = page.append(page.body_id(), ElementSpec::new("div").attr("data-zoom", "2x"));
        let wrap = page.append(zoom, ElementSpec::new("span"));
        let img = page.append(wrap, ElementSpec::img("a.jpg"));
        assert_eq!(ContainerResolver::default().resolve(&page, &img), Some(zoom));

        let relative = page.append(page.body_id(), ElementSpec::new("div").position(Position::Relative));
        let inner = page.append(relative, ElementSpec::new("span"));
        let img = page.append(inner, ElementSpec::img("b.jpg"));
        assert_eq!(ContainerResolver::default().resolve(&page, &img), Some(relative));
    }

    #[test]
    fn test_empty_zoom_marker_does_not_count() {
        let mut page = MemoryPage::new();
        let zoom = page.append(page.body_id(), ElementSpec::new("div").attr("data-zoom", ""));
        let wrap = page.append(zoom, ElementSpec::new("span"));
        let img = page.append(wrap, ElementSpec::img("a.jpg"));

        assert_eq!(ContainerResolver::default().resolve(&page, &img), Some(wrap));
    }

    #[test]
    fn test_class_must_be_a_whole_token() {
        let mut page = MemoryPage::new();
        let grid = page.append(page.body_id(), ElementSpec::new("div").class("product-grid"));
        let cell = page.append(grid, ElementSpec::new("div"));
        let img = page.append(cell, ElementSpec::img("a.jpg"));

        assert_eq!(ContainerResolver::default().resolve(&page, &img), Some(cell));
    }

    #[test]
    fn test_falls_back_to_parent() {
        let mut page = MemoryPage::new();
        let section = page.append(page.body_id(), ElementSpec::new("section"));
        let wrap = page.append(section, ElementSpec::new("div"));
        let img = page.append(wrap, ElementSpec::img("a.jpg"));

        assert_eq!(ContainerResolver::default().resolve(&page, &img), Some(wrap));
    }

    #[test]
    fn test_image_directly_under_body_resolves_to_body() {
        let mut page = MemoryPage::new();
        let img = page.append(page.body_id(), ElementSpec::img("a.jpg"));

        assert_eq!(ContainerResolver::default().resolve(&page, &img), Some(page.body_id()));
    }

    #[test]
    fn test_resolution_is_stable() {
        let mut page = MemoryPage::new();
        let card = page.append(page.body_id(), ElementSpec::new("figure"));
        let img = page.append(card, ElementSpec::img("a.jpg"));

        let resolver = ContainerResolver::default();
        assert_eq!(resolver.resolve(&page, &img), resolver.resolve(&page, &img));
    }
}
