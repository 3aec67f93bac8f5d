//! Scan loop behaviour over time: delayed and periodic rescans, debounced
//! mutation rescans, hover and teardown.

use fragrance_finder::dom::{ElementSpec, MemoryPage, NodeId};
use fragrance_finder::models::{PointerEvent, Rect};
use fragrance_finder::scanner::{
    AddedNode, LoopState, ManualTimers, MutationRecord, ScanLoop, WatchOutcome,
};
use fragrance_finder::ScanConfig;
use std::time::Duration;

fn product_card(page: &mut MemoryPage, alt: &str, x: f64) -> (NodeId, NodeId) {
    let card = page.append(
        page.body_id(),
        ElementSpec::new("div").class("product").rect(Rect::new(x, 0.0, 300.0, 300.0)),
    );
    let img = page.append(
        card,
        ElementSpec::img(format!("/cdn/{}.jpg", alt.to_lowercase().replace(' ', "-")))
            .attr("alt", alt)
            .rect(Rect::new(x, 0.0, 280.0, 280.0)),
    );
    (card, img)
}

fn started(page: &mut MemoryPage) -> ScanLoop<MemoryPage, ManualTimers> {
    let mut scan_loop = ScanLoop::new(&ScanConfig::default(), ManualTimers::new());
    scan_loop.start(page);
    scan_loop
}

#[test]
fn test_late_image_is_picked_up_by_delayed_rescan() {
    let mut page = MemoryPage::new();
    let (card, img) = product_card(&mut page, "Oud Wood", 0.0);
    // Not laid out yet at start
    page.set_rect(img, Rect::default());

    let mut scan_loop = started(&mut page);
    assert_eq!(page.button_count(), 0);

    page.set_rect(img, Rect::new(0.0, 0.0, 280.0, 280.0));
    scan_loop.advance(&mut page, Duration::from_millis(1_999));
    assert_eq!(page.button_count(), 0);

    scan_loop.advance(&mut page, Duration::from_millis(1));
    assert!(page.button(card).is_some());
}

#[test]
fn test_periodic_rescan_runs_every_twenty_seconds() {
    let mut page = MemoryPage::new();
    product_card(&mut page, "Oud Wood", 0.0);
    let mut scan_loop = started(&mut page);

    // delayed at 2s, periodic at 20s, 40s, 60s
    assert_eq!(scan_loop.advance(&mut page, Duration::from_secs(60)), 4);
    assert_eq!(scan_loop.passes(), 5);
}

#[test]
fn test_rapid_mutations_trigger_one_consolidated_rescan() {
    let mut page = MemoryPage::new();
    product_card(&mut page, "Oud Wood", 0.0);
    let mut scan_loop = started(&mut page);
    let before = scan_loop.passes();

    // A carousel injects new cards in a burst
    let (card, _) = product_card(&mut page, "Tobacco Vanille", 320.0);
    let inserted = [MutationRecord::ChildList { added: vec![AddedNode::element(true)] }];
    let swapped = [MutationRecord::Attribute { name: "src".to_string(), target_is_image: true }];

    assert!(matches!(scan_loop.on_mutations(&inserted), WatchOutcome::Schedule(_)));
    for _ in 0..20 {
        assert_eq!(scan_loop.on_mutations(&swapped), WatchOutcome::Coalesced);
    }

    assert_eq!(scan_loop.advance(&mut page, Duration::from_millis(100)), 1);
    assert_eq!(scan_loop.passes(), before + 1);
    assert!(page.button(card).is_some());

    // The window is closed again; the next burst schedules anew
    assert!(matches!(scan_loop.on_mutations(&swapped), WatchOutcome::Schedule(_)));
}

#[test]
fn test_mutation_rescan_refreshes_processed_containers() {
    let mut page = MemoryPage::new();
    let (card, img) = product_card(&mut page, "Oud Wood", 0.0);
    let mut scan_loop = started(&mut page);

    page.set_attribute(img, "alt", "Ombre Leather");
    page.set_attribute(img, "src", "/cdn/ombre-leather.jpg");
    scan_loop.on_mutations(&[MutationRecord::Attribute { name: "src".to_string(), target_is_image: true }]);
    scan_loop.advance(&mut page, Duration::from_millis(100));

    let mounted = page.button(card).unwrap();
    assert!(mounted.button.search_url.ends_with("q=Ombre%20Leather"));
    assert_eq!(page.button_count(), 1);
}

#[test]
fn test_removed_cards_are_released_on_next_rescan() {
    let mut page = MemoryPage::new();
    let cards: Vec<NodeId> = (0..5)
        .map(|i| product_card(&mut page, &format!("Card {}", i), i as f64 * 320.0).0)
        .collect();
    let mut scan_loop = started(&mut page);
    assert_eq!(scan_loop.buttons().processed_count(), 5);
    let inserted = page.buttons_inserted();

    // An infinite-scroll grid swaps out its page of results
    for card in &cards {
        page.remove(*card);
    }
    let (fresh, _) = product_card(&mut page, "Grand Soir", 0.0);

    let inserted_nodes = [MutationRecord::ChildList { added: vec![AddedNode::element(true)] }];
    scan_loop.on_mutations(&inserted_nodes);
    assert_eq!(scan_loop.advance(&mut page, Duration::from_millis(100)), 1);

    assert_eq!(scan_loop.buttons().processed_count(), 1);
    assert!(scan_loop.buttons().is_processed(&page, &fresh));
    for card in &cards {
        assert!(page.button(*card).is_none());
        assert_eq!(page.hover_listener_count(*card), 0);
    }
    assert_eq!(page.button_count(), 1);
    // Nothing was re-inserted into the detached cards
    assert_eq!(page.buttons_inserted(), inserted + 1);
}

#[test]
fn test_unrelated_mutations_do_not_rescan() {
    let mut page = MemoryPage::new();
    product_card(&mut page, "Oud Wood", 0.0);
    let mut scan_loop = started(&mut page);

    let outcome = scan_loop.on_mutations(&[
        MutationRecord::ChildList { added: vec![AddedNode::text(), AddedNode::element(false)] },
        MutationRecord::Attribute { name: "class".to_string(), target_is_image: true },
    ]);
    assert_eq!(outcome, WatchOutcome::Ignored);
    assert_eq!(scan_loop.advance(&mut page, Duration::from_millis(500)), 0);
}

#[test]
fn test_hover_visibility_tracks_last_event() {
    let mut page = MemoryPage::new();
    let (card, _) = product_card(&mut page, "Oud Wood", 0.0);
    let mut scan_loop = started(&mut page);

    assert!(!page.button(card).unwrap().visible);
    assert!(scan_loop.on_pointer(&mut page, &card, PointerEvent::Enter));
    assert!(page.button(card).unwrap().visible);
    assert!(!scan_loop.on_pointer(&mut page, &card, PointerEvent::Leave));
    assert!(!page.button(card).unwrap().visible);
}

#[test]
fn test_teardown_stops_all_activity() {
    let mut page = MemoryPage::new();
    let (card, _) = product_card(&mut page, "Oud Wood", 0.0);
    let mut scan_loop = started(&mut page);

    scan_loop.teardown(&mut page);
    assert_eq!(scan_loop.state(), LoopState::TornDown);
    assert_eq!(page.hover_listener_count(card), 0);
    assert_eq!(page.button_count(), 0);

    assert_eq!(scan_loop.advance(&mut page, Duration::from_secs(120)), 0);
    assert!(!scan_loop.on_pointer(&mut page, &card, PointerEvent::Enter));

    // Idempotent
    scan_loop.teardown(&mut page);
    assert_eq!(scan_loop.state(), LoopState::TornDown);
}
