//! Overlay button lifecycle for product containers

use super::handlers::HandlerTable;
use crate::config::ScanConfig;
use crate::detector::{extract_container_name, pick_topmost};
use crate::dom::PageDom;
use crate::models::{OverlayButton, PointerEvent, Position, Rect};
use crate::utils::search::search_url_with;

/// Inset of the button from the topmost image's bottom-right corner
const INSET_RIGHT: f64 = 8.0;
const INSET_BOTTOM: f64 = 12.0;

/// Owns the one-button-per-container invariant and the hover side table.
/// A container counts as processed once it has a hover binding.
pub struct ButtonController<P: PageDom> {
    label: String,
    search_template: String,
    min_size: f64,
    bindings: HandlerTable<P::Key, P::Node, P::HoverBinding>,
}

impl<P: PageDom> ButtonController<P> {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            label: config.button_label.clone(),
            search_template: config.search_url_template.clone(),
            min_size: config.min_size,
            bindings: HandlerTable::new(),
        }
    }

    /// Place a fresh hidden button over the topmost visible image. No-op when
    /// nothing is visible or the topmost image is too small.
    pub fn attach(&self, page: &mut P, container: &P::Node, name: &str) -> bool {
        let Some(image) = pick_topmost(page, container) else {
            return false;
        };

        let image_rect = page.bounding_rect(&image);
        if !image_rect.fits(self.min_size) {
            return false;
        }

        page.remove_overlay_button(container);

        if page.computed_style(container).position == Position::Static {
            page.set_position_relative(container);
        }

        let button = self.button_for(name, &page.bounding_rect(container), &image_rect);
        page.insert_overlay_button(container, &button);
        true
    }

    /// Attach the button and rebind hover handling, replacing any previous binding
    pub fn process(&mut self, page: &mut P, container: &P::Node, name: &str) -> bool {
        let attached = self.attach(page, container, name);

        let key = page.key(container);
        if let Some((_, previous)) = self.bindings.remove(&key) {
            page.unbind_hover(container, previous);
        }
        let binding = page.bind_hover(container);
        self.bindings.replace(key, container.clone(), binding);

        attached
    }

    /// Returns whether the button is visible afterwards
    pub fn on_pointer(&mut self, page: &mut P, container: &P::Node, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Enter => {
                if !page.has_overlay_button(container) {
                    return false;
                }
                // The gallery may have swapped photos since the last scan
                let name = extract_container_name(page, container);
                self.attach(page, container, &name);
                page.set_overlay_visible(container, true)
            }
            PointerEvent::Leave => {
                page.set_overlay_visible(container, false);
                false
            }
        }
    }

    /// Recompute name and anchor for every processed container still in the
    /// document. Detached containers are pruned first.
    pub fn refresh_processed(&mut self, page: &mut P) -> usize {
        self.prune_detached(page);
        let containers: Vec<P::Node> = self.bindings.nodes().cloned().collect();
        let mut attached = 0;
        for container in &containers {
            let name = extract_container_name(page, container);
            if self.attach(page, container, &name) {
                attached += 1;
            }
        }
        attached
    }

    /// Unbind and drop every container the page has removed. Returns how
    /// many were dropped.
    pub fn prune_detached(&mut self, page: &mut P) -> usize {
        let detached: Vec<P::Key> = self
            .bindings
            .iter()
            .filter(|(_, container)| !page.is_connected(container))
            .map(|(key, _)| key)
            .collect();

        for key in &detached {
            if let Some((container, binding)) = self.bindings.remove(key) {
                page.unbind_hover(&container, binding);
                page.remove_overlay_button(&container);
            }
        }

        if !detached.is_empty() {
            tracing::debug!("Pruned {} detached containers", detached.len());
        }
        detached.len()
    }

    pub fn is_processed(&self, page: &P, container: &P::Node) -> bool {
        self.bindings.contains(&page.key(container))
    }

    pub fn processed(&self) -> impl Iterator<Item = &P::Node> {
        self.bindings.nodes()
    }

    pub fn processed_count(&self) -> usize {
        self.bindings.len()
    }

    /// Unbind every hover handler and remove every button
    pub fn release(&mut self, page: &mut P) {
        for (container, binding) in self.bindings.drain() {
            page.unbind_hover(&container, binding);
            page.remove_overlay_button(&container);
        }
    }

    fn button_for(&self, name: &str, container: &Rect, image: &Rect) -> OverlayButton {
        OverlayButton {
            label: self.label.clone(),
            search_url: search_url_with(&self.search_template, name),
            right: (container.right() - image.right()).max(0.0) + INSET_RIGHT,
            bottom: (container.bottom() - image.bottom()).max(0.0) + INSET_BOTTOM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, MemoryPage, NodeId};
    use pretty_assertions::assert_eq;

    fn card_page() -> (MemoryPage, NodeId, NodeId) {
        let mut page = MemoryPage::new();
        let card = page.append(
            page.body_id(),
            ElementSpec::new("div").class("product").rect(Rect::new(0.0, 0.0, 400.0, 500.0)),
        );
        let img = page.append(
            card,
            ElementSpec::img("/sauvage.jpg")
                .attr("alt", "Dior Sauvage")
                .rect(Rect::new(20.0, 20.0, 300.0, 300.0)),
        );
        (page, card, img)
    }

    #[test]
    fn test_attach_anchors_to_topmost_image() {
        let (mut page, card, _) = card_page();
        let controller = ButtonController::<MemoryPage>::new(&ScanConfig::default());

        assert!(controller.attach(&mut page, &card, "Dior Sauvage"));

        let mounted = page.button(card).unwrap();
        assert!(!mounted.visible);
        assert_eq!(mounted.button.label, "Fragrantica");
        assert_eq!(
            mounted.button.search_url,
            "https://www.fragrantica.com/search/?q=Dior%20Sauvage"
        );
        assert_eq!(mounted.button.right, 88.0);
        assert_eq!(mounted.button.bottom, 192.0);
        assert_eq!(page.computed_style(&card).position, Position::Relative);
    }

    #[test]
    fn test_attach_keeps_existing_positioning() {
        let (mut page, card, _) = card_page();
        let mut style = page.computed_style(&card);
        style.position = Position::Absolute;
        page.set_style(card, style);

        let controller = ButtonController::<MemoryPage>::new(&ScanConfig::default());
        controller.attach(&mut page, &card, "Dior Sauvage");
        assert_eq!(page.computed_style(&card).position, Position::Absolute);
    }

    #[test]
    fn test_attach_skips_small_topmost_image() {
        let (mut page, card, img) = card_page();
        page.set_rect(img, Rect::new(0.0, 0.0, 80.0, 300.0));

        let controller = ButtonController::<MemoryPage>::new(&ScanConfig::default());
        assert!(!controller.attach(&mut page, &card, "Dior Sauvage"));
        assert_eq!(page.button_count(), 0);
    }

    #[test]
    fn test_reprocessing_never_duplicates() {
        let (mut page, card, _) = card_page();
        let mut controller = ButtonController::<MemoryPage>::new(&ScanConfig::default());

        for _ in 0..3 {
            controller.process(&mut page, &card, "Dior Sauvage");
        }

        assert_eq!(page.button_count(), 1);
        assert_eq!(page.buttons_inserted(), 3);
        assert_eq!(page.hover_listener_count(card), 1);
        assert_eq!(controller.processed_count(), 1);
    }

    #[test]
    fn test_hover_shows_and_hides() {
        let (mut page, card, img) = card_page();
        let mut controller = ButtonController::<MemoryPage>::new(&ScanConfig::default());
        controller.process(&mut page, &card, "Dior Sauvage");

        // Name is recomputed on enter
        page.set_attribute(img, "alt", "Dior Homme");
        assert!(controller.on_pointer(&mut page, &card, PointerEvent::Enter));
        let mounted = page.button(card).unwrap();
        assert!(mounted.visible);
        assert!(mounted.button.search_url.ends_with("q=Dior%20Homme"));

        assert!(!controller.on_pointer(&mut page, &card, PointerEvent::Leave));
        assert!(!page.button(card).unwrap().visible);
    }

    #[test]
    fn test_enter_without_button_does_nothing() {
        let (mut page, card, img) = card_page();
        page.set_rect(img, Rect::new(0.0, 0.0, 50.0, 50.0));
        let mut controller = ButtonController::<MemoryPage>::new(&ScanConfig::default());
        controller.process(&mut page, &card, "Dior Sauvage");

        assert!(!controller.on_pointer(&mut page, &card, PointerEvent::Enter));
        assert_eq!(page.button_count(), 0);
    }

    #[test]
    fn test_release_unbinds_everything() {
        let (mut page, card, _) = card_page();
        let mut controller = ButtonController::<MemoryPage>::new(&ScanConfig::default());
        controller.process(&mut page, &card, "Dior Sauvage");

        controller.release(&mut page);
        assert_eq!(page.button_count(), 0);
        assert_eq!(page.hover_listener_count(card), 0);
        assert_eq!(controller.processed_count(), 0);
    }

    #[test]
    fn test_refresh_drops_removed_containers() {
        let (mut page, card, _) = card_page();
        let other = page.append(
            page.body_id(),
            ElementSpec::new("div").class("product").rect(Rect::new(0.0, 600.0, 400.0, 500.0)),
        );
        page.append(
            other,
            ElementSpec::img("/homme.jpg")
                .attr("alt", "Dior Homme")
                .rect(Rect::new(20.0, 620.0, 300.0, 300.0)),
        );

        let mut controller = ButtonController::<MemoryPage>::new(&ScanConfig::default());
        controller.process(&mut page, &card, "Dior Sauvage");
        controller.process(&mut page, &other, "Dior Homme");
        let inserted = page.buttons_inserted();

        page.remove(card);
        assert_eq!(controller.refresh_processed(&mut page), 1);

        assert!(!controller.is_processed(&page, &card));
        assert!(controller.is_processed(&page, &other));
        assert_eq!(controller.processed_count(), 1);
        assert_eq!(page.hover_listener_count(card), 0);
        assert!(page.button(card).is_none());
        // Only the live container got a fresh button
        assert_eq!(page.buttons_inserted(), inserted + 1);
    }
}
