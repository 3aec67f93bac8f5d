//! Topmost image selection for stacked photo galleries

use crate::dom::PageDom;

/// Rendered with a non-empty box and not hidden by style
pub fn is_rendered<P: PageDom>(page: &P, image: &P::Node) -> bool {
    !page.bounding_rect(image).is_empty() && page.computed_style(image).is_shown()
}

/// The visible image that paints on top: highest z-index, later in the
/// document on ties.
pub fn pick_topmost<P: PageDom>(page: &P, container: &P::Node) -> Option<P::Node> {
    let mut topmost: Option<(i32, P::Node)> = None;

    for image in page.images_within(container) {
        if !is_rendered(page, &image) {
            continue;
        }

        let z = page.computed_style(&image).z_index.value();
        match &topmost {
            Some((best, _)) if z < *best => {}
            _ => topmost = Some((z, image)),
        }
    }

    topmost.map(|(_, image)| image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, MemoryPage};
    use crate::models::Position;

    fn stacked(z: i32) -> ElementSpec {
        ElementSpec::img(format!("z{}.jpg", z))
            .position(Position::Absolute)
            .z_index(z)
            .size(300.0, 300.0)
    }

    #[test]
    fn test_later_image_wins_z_index_tie() {
        let mut page = MemoryPage::new();
        let gallery = page.append(page.body_id(), ElementSpec::new("div"));
        page.append(gallery, stacked(1));
        page.append(gallery, stacked(5));
        let last = page.append(gallery, stacked(5));

        assert_eq!(pick_topmost(&page, &gallery), Some(last));
    }

    #[test]
    fn test_higher_z_index_beats_dom_order() {
        let mut page = MemoryPage::new();
        let gallery = page.append(page.body_id(), ElementSpec::new("div"));
        let front = page.append(gallery, stacked(9));
        page.append(gallery, stacked(2));
        page.append(gallery, ElementSpec::img("auto.jpg").size(300.0, 300.0));

        assert_eq!(pick_topmost(&page, &gallery), Some(front));
    }

    #[test]
    fn test_negative_z_index_still_eligible() {
        let mut page = MemoryPage::new();
        let gallery = page.append(page.body_id(), ElementSpec::new("div"));
        let only = page.append(gallery, stacked(-1));

        assert_eq!(pick_topmost(&page, &gallery), Some(only));
    }

    #[test]
    fn test_hidden_images_are_skipped() {
        let mut page = MemoryPage::new();
        let gallery = page.append(page.body_id(), ElementSpec::new("div"));
        let visible = page.append(gallery, stacked(1));
        page.append(gallery, stacked(3).display_none());
        page.append(gallery, stacked(4).hidden());
        page.append(gallery, stacked(5).opacity(0.0));
        page.append(gallery, ElementSpec::img("zero.jpg").z_index(6));

        assert_eq!(pick_topmost(&page, &gallery), Some(visible));
    }

    #[test]
    fn test_none_when_nothing_visible() {
        let mut page = MemoryPage::new();
        let gallery = page.append(page.body_id(), ElementSpec::new("div"));
        page.append(gallery, stacked(1).display_none());

        assert_eq!(pick_topmost(&page, &gallery), None);
    }
}
