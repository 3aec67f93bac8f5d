//! WebAssembly content script
//!
//! Binds the scan loop to the live page: the DOM through web-sys, rescans
//! through `setTimeout`/`setInterval`, DOM changes through a `MutationObserver`
//! and hover through `mouseenter`/`mouseleave` listeners on each container.

use crate::config::ScanConfig;
use crate::dom::PageDom;
use crate::models::{ComputedStyle, OverlayButton, PointerEvent, Rect, BUTTON_CLASS};
use crate::scanner::{delayed_rescan_message, AddedNode, MutationRecord, ScanLoop, TimerHost, Trigger};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, NodeList, Window};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

type Shared = Rc<RefCell<ContentScript>>;
type WeakShared = Weak<RefCell<ContentScript>>;

thread_local! {
    static SCRIPT: RefCell<Option<Shared>> = RefCell::new(None);
}

/// Entry point: scan once the document is interactive
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(start);
        if document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
            .is_err()
        {
            console_log!("Fragrance Extension: could not wait for DOMContentLoaded");
        }
    } else {
        start();
    }
}

/// Stop all rescans and remove every button. Call when the extension
/// context is invalidated.
#[wasm_bindgen]
pub fn shutdown() {
    if let Some(script) = SCRIPT.with(|slot| slot.borrow_mut().take()) {
        script.borrow_mut().teardown();
    }
}

fn start() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let config = ScanConfig::default();
    let script: Shared = Rc::new_cyclic(|weak: &WeakShared| {
        RefCell::new(ContentScript::new(window, document, weak.clone(), &config))
    });

    script.borrow_mut().start();
    SCRIPT.with(|slot| *slot.borrow_mut() = Some(script));
}

/// Run `f` on the live script unless it is gone or already busy
fn with_script(weak: &WeakShared, f: impl FnOnce(&mut ContentScript)) {
    if let Some(script) = weak.upgrade() {
        if let Ok(mut script) = script.try_borrow_mut() {
            f(&mut script);
        }
    }
}

pub struct ContentScript {
    page: BrowserPage,
    scan_loop: ScanLoop<BrowserPage, BrowserTimers>,
    observer: Option<ChangeObserver>,
}

struct ChangeObserver {
    observer: web_sys::MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, web_sys::MutationObserver)>,
}

impl ContentScript {
    fn new(window: Window, document: Document, weak: WeakShared, config: &ScanConfig) -> Self {
        let timers = BrowserTimers {
            window: window.clone(),
            script: weak.clone(),
            intervals: Vec::new(),
        };

        Self {
            page: BrowserPage {
                window,
                document,
                script: weak,
                buttons: Vec::new(),
                keys: js_sys::WeakMap::new(),
                next_key: Cell::new(0),
            },
            scan_loop: ScanLoop::new(config, timers),
            observer: None,
        }
    }

    fn start(&mut self) {
        let Self { page, scan_loop, .. } = self;
        if let Some(report) = scan_loop.start(page) {
            console_log!(
                "Fragrance Extension: {} containers, {} buttons",
                report.containers.len(),
                report.buttons_attached()
            );
        }
        self.observer = self.observe_changes();
    }

    fn observe_changes(&self) -> Option<ChangeObserver> {
        let body = self.page.document.body()?;
        let weak = self.page.script.clone();

        let callback = Closure::<dyn FnMut(js_sys::Array, web_sys::MutationObserver)>::new(
            move |records: js_sys::Array, _observer: web_sys::MutationObserver| {
                let records = translate_records(&records);
                with_script(&weak, |script| {
                    script.scan_loop.on_mutations(&records);
                });
            },
        );

        let observer = web_sys::MutationObserver::new(callback.as_ref().unchecked_ref()).ok()?;

        let options = web_sys::MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        options.set_attributes(true);
        options.set_attribute_filter(&js_sys::Array::of1(&JsValue::from_str("src")));
        observer.observe_with_options(&body, &options).ok()?;

        Some(ChangeObserver {
            observer,
            _callback: callback,
        })
    }

    fn fire(&mut self, trigger: Trigger) {
        let Self { page, scan_loop, .. } = self;
        if trigger == Trigger::Delayed {
            console_log!("Fragrance Extension: {}", delayed_rescan_message(scan_loop.delayed_rescan()));
        }
        scan_loop.fire(page, trigger);
    }

    fn on_pointer(&mut self, container: &Element, event: PointerEvent) {
        let Self { page, scan_loop, .. } = self;
        scan_loop.on_pointer(page, container, event);
    }

    fn teardown(&mut self) {
        if let Some(change) = self.observer.take() {
            change.observer.disconnect();
        }
        let Self { page, scan_loop, .. } = self;
        scan_loop.teardown(page);
        console_log!("Fragrance Extension: stopped after {} passes", scan_loop.passes());
    }
}

fn translate_records(records: &js_sys::Array) -> Vec<MutationRecord> {
    records
        .iter()
        .filter_map(|value| value.dyn_into::<web_sys::MutationRecord>().ok())
        .map(|record| {
            if record.type_() == "attributes" {
                let target_is_image = record
                    .target()
                    .and_then(|target| target.dyn_into::<Element>().ok())
                    .map(|element| element.tag_name().eq_ignore_ascii_case("img"))
                    .unwrap_or(false);
                MutationRecord::Attribute {
                    name: record.attribute_name().unwrap_or_default(),
                    target_is_image,
                }
            } else {
                let added = record.added_nodes();
                MutationRecord::ChildList {
                    added: (0..added.length())
                        .filter_map(|i| added.get(i))
                        .map(|node| describe_added(&node))
                        .collect(),
                }
            }
        })
        .collect()
}

fn describe_added(node: &web_sys::Node) -> AddedNode {
    match node.dyn_ref::<Element>() {
        Some(element) if element.tag_name().eq_ignore_ascii_case("img") => AddedNode::image(),
        Some(element) => AddedNode::element(element.query_selector("img").ok().flatten().is_some()),
        None => AddedNode::text(),
    }
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// `PageDom` over the live document
pub struct BrowserPage {
    window: Window,
    document: Document,
    script: WeakShared,
    buttons: Vec<MountedButton>,
    // Element -> key; entries go away with the element
    keys: js_sys::WeakMap,
    next_key: Cell<u32>,
}

struct MountedButton {
    container: Element,
    button: Element,
    _on_click: Closure<dyn FnMut(Event)>,
}

/// Enter/leave listeners attached to one container
pub struct HoverListeners {
    enter: Closure<dyn FnMut(Event)>,
    leave: Closure<dyn FnMut(Event)>,
}

impl BrowserPage {
    fn mounted(&self, container: &Element) -> Option<&MountedButton> {
        self.buttons.iter().find(|m| m.container == *container)
    }

    fn hover_listener(&self, container: &Element, event: PointerEvent) -> Closure<dyn FnMut(Event)> {
        let weak = self.script.clone();
        let container = container.clone();
        Closure::new(move |_event: Event| {
            with_script(&weak, |script| script.on_pointer(&container, event));
        })
    }
}

impl PageDom for BrowserPage {
    type Node = Element;
    type Key = u32;
    type HoverBinding = HoverListeners;

    fn key(&self, node: &Element) -> u32 {
        let object: &js_sys::Object = node.as_ref();
        if let Some(key) = self.keys.get(object).as_f64() {
            return key as u32;
        }
        let key = self.next_key.get();
        self.next_key.set(key.wrapping_add(1));
        self.keys.set(object, &JsValue::from(key));
        key
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Into::into)
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn title(&self) -> Option<String> {
        Some(self.document.title())
    }

    fn images(&self) -> Vec<Element> {
        self.document
            .query_selector_all("img")
            .map(elements)
            .unwrap_or_default()
    }

    fn images_within(&self, node: &Element) -> Vec<Element> {
        node.query_selector_all("img").map(elements).unwrap_or_default()
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_lowercase()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn first_descendant_by_tag(&self, node: &Element, tag: &str) -> Option<Element> {
        node.query_selector(tag).ok().flatten()
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();
        Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
    }

    fn computed_style(&self, node: &Element) -> ComputedStyle {
        match self.window.get_computed_style(node) {
            Ok(Some(style)) => {
                let value = |property: &str| style.get_property_value(property).unwrap_or_default();
                ComputedStyle::from_css(
                    &value("display"),
                    &value("visibility"),
                    &value("opacity"),
                    &value("position"),
                    &value("z-index"),
                )
            }
            _ => ComputedStyle::default(),
        }
    }

    fn set_position_relative(&mut self, node: &Element) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            let _ = element.style().set_property("position", "relative");
        }
    }

    fn has_overlay_button(&self, container: &Element) -> bool {
        self.mounted(container).is_some()
    }

    fn insert_overlay_button(&mut self, container: &Element, overlay: &OverlayButton) {
        let Ok(button) = self.document.create_element("button") else {
            return;
        };
        button.set_class_name(BUTTON_CLASS);
        button.set_text_content(Some(&overlay.label));
        let _ = button.set_attribute("style", &overlay.css_text());

        let window = self.window.clone();
        let url = overlay.search_url.clone();
        let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            // Keep the page's own product link from navigating
            event.prevent_default();
            event.stop_propagation();
            let _ = window.open_with_url_and_target_and_features(&url, "_blank", "noopener,noreferrer");
        });

        if button
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            .is_err()
            || container.append_child(&button).is_err()
        {
            return;
        }

        self.buttons.push(MountedButton {
            container: container.clone(),
            button,
            _on_click: on_click,
        });
    }

    fn remove_overlay_button(&mut self, container: &Element) -> bool {
        match self.buttons.iter().position(|m| m.container == *container) {
            Some(index) => {
                self.buttons.remove(index).button.remove();
                true
            }
            None => false,
        }
    }

    fn set_overlay_visible(&mut self, container: &Element, visible: bool) -> bool {
        let Some(mounted) = self.mounted(container) else {
            return false;
        };
        if let Some(button) = mounted.button.dyn_ref::<HtmlElement>() {
            let display = if visible { "block" } else { "none" };
            let _ = button.style().set_property("display", display);
        }
        true
    }

    fn bind_hover(&mut self, container: &Element) -> HoverListeners {
        let listeners = HoverListeners {
            enter: self.hover_listener(container, PointerEvent::Enter),
            leave: self.hover_listener(container, PointerEvent::Leave),
        };
        let _ = container.add_event_listener_with_callback("mouseenter", listeners.enter.as_ref().unchecked_ref());
        let _ = container.add_event_listener_with_callback("mouseleave", listeners.leave.as_ref().unchecked_ref());
        listeners
    }

    fn unbind_hover(&mut self, container: &Element, binding: HoverListeners) {
        let _ = container.remove_event_listener_with_callback("mouseenter", binding.enter.as_ref().unchecked_ref());
        let _ = container.remove_event_listener_with_callback("mouseleave", binding.leave.as_ref().unchecked_ref());
    }
}

/// Window timers that call back into the content script
pub struct BrowserTimers {
    window: Window,
    script: WeakShared,
    intervals: Vec<(i32, Closure<dyn FnMut()>)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserTimer {
    id: i32,
    repeating: bool,
}

impl TimerHost for BrowserTimers {
    type Handle = BrowserTimer;

    fn schedule_once(&mut self, delay: Duration, trigger: Trigger) -> BrowserTimer {
        let weak = self.script.clone();
        let callback = Closure::once_into_js(move || with_script(&weak, |script| script.fire(trigger)));
        let id = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis(delay))
            .unwrap_or_else(|_| {
                console_log!("Fragrance Extension: setTimeout failed for {:?}", trigger);
                -1
            });
        BrowserTimer { id, repeating: false }
    }

    fn schedule_repeating(&mut self, period: Duration, trigger: Trigger) -> BrowserTimer {
        let weak = self.script.clone();
        let callback = Closure::<dyn FnMut()>::new(move || with_script(&weak, |script| script.fire(trigger)));
        let id = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), millis(period))
            .unwrap_or_else(|_| {
                console_log!("Fragrance Extension: setInterval failed for {:?}", trigger);
                -1
            });
        self.intervals.push((id, callback));
        BrowserTimer { id, repeating: true }
    }

    fn cancel(&mut self, handle: BrowserTimer) {
        if handle.repeating {
            self.window.clear_interval_with_handle(handle.id);
            self.intervals.retain(|(id, _)| *id != handle.id);
        } else {
            self.window.clear_timeout_with_handle(handle.id);
        }
    }
}

fn millis(duration: Duration) -> i32 {
    i32::try_from(duration.as_millis()).unwrap_or(i32::MAX)
}
