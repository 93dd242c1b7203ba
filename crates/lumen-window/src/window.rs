//! Window - the page runtime
//!
//! Owns the document and everything the platform would otherwise provide:
//! a virtual clock, timers, animation frames, event dispatch, scrolling and
//! intersection observers. Single-threaded; every callback receives
//! `&mut Window` and runs to completion.

use std::rc::Rc;

use lumen_dom::{DOMRect, Document, NodeId, ReadyState};

use crate::events::{Event, EventKind, EventTarget, Listener, ListenerId, ListenerRegistry};
use crate::intersection_observer::{
    IntersectionObserverEntry, IntersectionObserverManager, IntersectionObserverOptions,
    ObserverId,
};
use crate::scroll::{Easing, SMOOTH_SCROLL_MS, ScrollAnimation, ScrollBehavior, ScrollToOptions};
use crate::timers::{TimerId, TimerQueue};

/// Frame interval of the virtual clock
pub const FRAME_MS: u64 = 16;

type FrameCallback = Box<dyn FnOnce(&mut Window)>;

/// Visible area size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Browser window
pub struct Window {
    document: Document,
    viewport: Viewport,
    scroll_y: f64,
    now: u64,
    timers: TimerQueue,
    listeners: ListenerRegistry,
    observers: IntersectionObserverManager,
    frame_callbacks: Vec<FrameCallback>,
    scroll_animation: Option<ScrollAnimation>,
    smooth_scroll_ms: u64,
    intersections_dirty: bool,
    last_frame_at: u64,
}

impl Window {
    /// Host a document. The clock starts at 0 and the document keeps its
    /// ready state until [`Window::finish_loading`].
    pub fn new(document: Document, viewport: Viewport) -> Self {
        Self {
            document,
            viewport,
            scroll_y: 0.0,
            now: 0,
            timers: TimerQueue::default(),
            listeners: ListenerRegistry::default(),
            observers: IntersectionObserverManager::default(),
            frame_callbacks: Vec::new(),
            scroll_animation: None,
            smooth_scroll_ms: SMOOTH_SCROLL_MS,
            intersections_dirty: false,
            last_frame_at: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Virtual clock in milliseconds
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub fn ready_state(&self) -> ReadyState {
        self.document.ready_state()
    }

    /// Finish parsing: `DOMContentLoaded` on the document, then `load` on
    /// the window. Does nothing once the document left `Loading`.
    pub fn finish_loading(&mut self) {
        if self.document.ready_state() != ReadyState::Loading {
            return;
        }
        self.document.set_ready_state(ReadyState::Interactive);
        self.dispatch_event(EventTarget::Document, EventKind::DomContentLoaded);

        self.document.set_ready_state(ReadyState::Complete);
        self.dispatch_event(EventTarget::Window, EventKind::Load);
        self.intersections_dirty = true;
    }

    // ------------------------------------------------------------------
    // Timers and frames
    // ------------------------------------------------------------------

    /// Run `callback` once after `delay_ms` of virtual time
    pub fn set_timeout(
        &mut self,
        delay_ms: u64,
        callback: impl FnOnce(&mut Window) + 'static,
    ) -> TimerId {
        let id = self.timers.set_timeout(self.now, delay_ms, Box::new(callback));
        tracing::trace!("setTimeout {:?} in {}ms", id, delay_ms);
        id
    }

    /// Cancel a pending timeout; false if it already ran
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.timers.clear(id)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Run `callback` on the next frame
    pub fn request_animation_frame(&mut self, callback: impl FnOnce(&mut Window) + 'static) {
        self.frame_callbacks.push(Box::new(callback));
    }

    /// Advance the virtual clock, running timers and frames as they fall due
    pub fn advance(&mut self, ms: u64) {
        let deadline = self.now.saturating_add(ms);

        loop {
            let next_timer = self.timers.next_due();
            let next_frame = self.frame_pending().then(|| self.next_frame_at());

            let (at, is_timer) = match (next_timer, next_frame) {
                (Some(t), Some(f)) if t <= f => (t, true),
                (_, Some(f)) => (f, false),
                (Some(t), None) => (t, true),
                (None, None) => break,
            };
            if at > deadline {
                break;
            }
            self.now = self.now.max(at);

            if is_timer {
                if let Some((id, callback)) = self.timers.pop_due(self.now) {
                    tracing::trace!("Timer {:?} fired at {}ms", id, self.now);
                    callback(self);
                }
            } else {
                self.run_frame();
            }
        }

        self.now = deadline;
    }

    fn frame_pending(&self) -> bool {
        !self.frame_callbacks.is_empty()
            || self.scroll_animation.is_some()
            || (self.intersections_dirty && self.observers.has_targets())
    }

    /// Work queued at a boundary that has not rendered yet joins that frame
    fn next_frame_at(&self) -> u64 {
        if self.now % FRAME_MS == 0 && self.now > self.last_frame_at {
            self.now
        } else {
            (self.now / FRAME_MS + 1) * FRAME_MS
        }
    }

    fn run_frame(&mut self) {
        self.last_frame_at = self.now;
        if let Some(animation) = self.scroll_animation {
            let (y, done) = animation.sample(self.now);
            if done {
                self.scroll_animation = None;
            }
            self.set_scroll_position(y);
        }

        let callbacks = std::mem::take(&mut self.frame_callbacks);
        for callback in callbacks {
            callback(self);
        }

        if self.intersections_dirty {
            self.intersections_dirty = false;
            self.update_intersections();
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn add_event_listener(
        &mut self,
        target: EventTarget,
        kind: EventKind,
        listener: impl Fn(&mut Window, &mut Event) + 'static,
    ) -> ListenerId {
        let listener: Listener = Rc::new(listener);
        self.listeners.add(target, kind, listener)
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Number of listeners attached to one target for one kind
    pub fn listener_count(&self, target: EventTarget, kind: EventKind) -> usize {
        self.listeners.count(target, kind)
    }

    /// Create and dispatch an event
    pub fn dispatch_event(&mut self, target: EventTarget, kind: EventKind) -> Event {
        let event = Event::new(kind, target, self.now);
        self.dispatch(event)
    }

    /// Dispatch an event along its propagation path
    ///
    /// Listeners run in registration order per target. A listener removed
    /// while the event is in flight does not run.
    pub fn dispatch(&mut self, mut event: Event) -> Event {
        let path = if event.kind().bubbles() {
            self.propagation_path(event.target())
        } else {
            vec![event.target()]
        };
        tracing::trace!("Dispatching {:?} to {:?}", event.kind(), event.target());

        for current in path {
            event.set_current_target(current);
            for (id, listener) in self.listeners.matching(current, event.kind()) {
                if !self.listeners.contains(id) {
                    continue;
                }
                listener(self, &mut event);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
        event
    }

    fn propagation_path(&self, target: EventTarget) -> Vec<EventTarget> {
        match target {
            EventTarget::Window => vec![EventTarget::Window],
            EventTarget::Document => vec![EventTarget::Document, EventTarget::Window],
            EventTarget::Node(node) => {
                let tree = self.document.tree();
                let mut path = vec![target];
                for ancestor in tree.ancestors(node) {
                    if ancestor == tree.root() {
                        path.push(EventTarget::Document);
                        path.push(EventTarget::Window);
                    } else {
                        path.push(EventTarget::Node(ancestor));
                    }
                }
                path
            }
        }
    }

    /// Simulate a click on an element
    ///
    /// An unprevented click on an in-page anchor jumps to its target.
    pub fn click(&mut self, node: NodeId) -> Event {
        let event = self.dispatch_event(EventTarget::Node(node), EventKind::Click);
        if !event.is_default_prevented() {
            self.follow_fragment_link(node);
        }
        event
    }

    /// Simulate a key press on the document
    pub fn key_down(&mut self, key: &str) -> Event {
        let event = Event::new(EventKind::KeyDown, EventTarget::Document, self.now).with_key(key);
        self.dispatch(event)
    }

    fn follow_fragment_link(&mut self, node: NodeId) {
        let Some(anchor) = self.document.closest_tag(node, "a") else {
            return;
        };
        let Some(fragment) = self
            .document
            .get_attribute(anchor, "href")
            .and_then(|href| href.strip_prefix('#'))
            .map(str::to_string)
        else {
            return;
        };

        let top = if fragment.is_empty() {
            Some(0.0)
        } else {
            self.document
                .get_element_by_id(&fragment)
                .map(|target| self.document.offset_top(target))
        };
        if let Some(top) = top {
            self.scroll_to(ScrollToOptions::instant(top));
        }
    }

    // ------------------------------------------------------------------
    // Scrolling and geometry
    // ------------------------------------------------------------------

    /// `window.pageYOffset`
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Full document height, never less than the viewport
    pub fn document_height(&self) -> f64 {
        self.viewport.height.max(self.document.scroll_height())
    }

    /// Largest reachable scroll offset
    pub fn max_scroll_y(&self) -> f64 {
        (self.document_height() - self.viewport.height).max(0.0)
    }

    /// Viewport in page coordinates
    pub fn viewport_rect(&self) -> DOMRect {
        DOMRect::from_xywh(0.0, self.scroll_y, self.viewport.width, self.viewport.height)
    }

    /// Element box relative to the viewport (`getBoundingClientRect`)
    pub fn bounding_client_rect(&self, node: NodeId) -> Option<DOMRect> {
        self.document
            .layout(node)
            .map(|rect| rect.to_client(self.scroll_y))
    }

    /// Body carries `overflow: hidden`
    pub fn is_scroll_locked(&self) -> bool {
        let body = self.document.body();
        self.document.style(body, "overflow") == Some("hidden")
    }

    /// Length of programmatic smooth scrolls
    pub fn set_smooth_scroll_duration(&mut self, ms: u64) {
        self.smooth_scroll_ms = ms;
    }

    /// A smooth scroll is in progress
    pub fn is_scrolling(&self) -> bool {
        self.scroll_animation.is_some()
    }

    /// Scroll as the user would (wheel, touch, keyboard)
    ///
    /// Ignored while scroll is locked. Interrupts a running smooth scroll.
    /// Returns whether the offset changed.
    pub fn user_scroll_to(&mut self, y: f64) -> bool {
        if self.is_scroll_locked() {
            tracing::trace!("User scroll ignored while locked");
            return false;
        }
        self.scroll_animation = None;
        self.set_scroll_position(y)
    }

    /// Scroll relative to the current offset as the user would
    pub fn user_scroll_by(&mut self, dy: f64) -> bool {
        self.user_scroll_to(self.scroll_y + dy)
    }

    /// `window.scrollTo`
    pub fn scroll_to(&mut self, options: ScrollToOptions) {
        let target = options.top.clamp(0.0, self.max_scroll_y());
        match options.behavior {
            ScrollBehavior::Auto => {
                self.scroll_animation = None;
                self.set_scroll_position(target);
            }
            ScrollBehavior::Smooth => {
                if (target - self.scroll_y).abs() < f64::EPSILON {
                    self.scroll_animation = None;
                    return;
                }
                tracing::debug!("Smooth scroll {} -> {}", self.scroll_y, target);
                self.scroll_animation = Some(ScrollAnimation {
                    from: self.scroll_y,
                    to: target,
                    start: self.now,
                    duration: self.smooth_scroll_ms,
                    easing: Easing::EaseInOut,
                });
            }
        }
    }

    fn set_scroll_position(&mut self, y: f64) -> bool {
        let y = y.clamp(0.0, self.max_scroll_y());
        if (y - self.scroll_y).abs() < f64::EPSILON {
            return false;
        }
        self.scroll_y = y;
        self.intersections_dirty = true;
        self.dispatch_event(EventTarget::Window, EventKind::Scroll);
        true
    }

    /// Resize the viewport, re-clamping the scroll offset
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        let y = self.scroll_y;
        self.set_scroll_position(y);
        self.intersections_dirty = true;
        self.dispatch_event(EventTarget::Window, EventKind::Resize);
    }

    // ------------------------------------------------------------------
    // Intersection observers
    // ------------------------------------------------------------------

    pub fn create_intersection_observer(
        &mut self,
        options: IntersectionObserverOptions,
        callback: impl Fn(&mut Window, &[IntersectionObserverEntry]) + 'static,
    ) -> ObserverId {
        self.observers.create(options, Rc::new(callback))
    }

    /// Start observing; the first report arrives on the next frame
    pub fn observe(&mut self, observer: ObserverId, target: NodeId) {
        if let Some(o) = self.observers.get_mut(observer) {
            o.observe(target);
            self.intersections_dirty = true;
        }
    }

    pub fn unobserve(&mut self, observer: ObserverId, target: NodeId) {
        if let Some(o) = self.observers.get_mut(observer) {
            o.unobserve(target);
        }
    }

    pub fn disconnect(&mut self, observer: ObserverId) {
        self.observers.remove(observer);
    }

    fn update_intersections(&mut self) {
        let viewport = self.viewport_rect();
        let batches = self.observers.process(&self.document, viewport, self.now);
        for (callback, entries) in batches {
            callback(self, &entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    fn tall_window() -> (Window, NodeId) {
        let mut doc = Document::default();
        let main = doc.create_element("main");
        let body = doc.body();
        doc.append_child(body, main);
        doc.set_layout(main, DOMRect::from_xywh(0.0, 0.0, 1000.0, 3000.0));
        (Window::new(doc, Viewport::new(1000.0, 1000.0)), main)
    }

    #[test]
    fn test_timers_fire_in_order() {
        let (mut window, _) = tall_window();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (delay, tag) in [(30, "c"), (10, "a"), (20, "b")] {
            let log = Rc::clone(&log);
            window.set_timeout(delay, move |w| log.borrow_mut().push((tag, w.now())));
        }
        window.advance(15);
        assert_eq!(*log.borrow(), vec![("a", 10)]);
        window.advance(100);
        assert_eq!(*log.borrow(), vec![("a", 10), ("b", 20), ("c", 30)]);
        assert_eq!(window.now(), 115);
    }

    #[test]
    fn test_nested_zero_delay_timer_runs_same_advance() {
        let (mut window, _) = tall_window();
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        window.set_timeout(5, move |w| {
            w.set_timeout(0, move |_| flag.set(true));
        });
        window.advance(5);
        assert!(ran.get());
    }

    #[test]
    fn test_clear_timeout() {
        let (mut window, _) = tall_window();
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        let id = window.set_timeout(10, move |_| flag.set(true));
        assert!(window.clear_timeout(id));
        window.advance(50);
        assert!(!ran.get());
    }

    #[test]
    fn test_animation_frame_runs_on_frame_boundary() {
        let (mut window, _) = tall_window();
        let at = Rc::new(Cell::new(None));
        let slot = Rc::clone(&at);
        window.request_animation_frame(move |w| slot.set(Some(w.now())));

        window.advance(FRAME_MS - 1);
        assert_eq!(at.get(), None);
        window.advance(1);
        assert_eq!(at.get(), Some(FRAME_MS));
    }

    #[test]
    fn test_scroll_dispatches_and_clamps() {
        let (mut window, _) = tall_window();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        window.add_event_listener(EventTarget::Window, EventKind::Scroll, move |_, _| {
            c.set(c.get() + 1)
        });

        assert!(window.user_scroll_to(500.0));
        assert!(!window.user_scroll_to(500.0));
        assert!(window.user_scroll_to(99_999.0));
        assert_eq!(window.scroll_y(), 2000.0);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_scroll_lock_blocks_user_scroll_only() {
        let (mut window, _) = tall_window();
        let body = window.document().body();
        window.document_mut().set_style(body, "overflow", "hidden");

        assert!(!window.user_scroll_to(300.0));
        window.scroll_to(ScrollToOptions::instant(300.0));
        assert_eq!(window.scroll_y(), 300.0);
    }

    #[test]
    fn test_smooth_scroll_reaches_target() {
        let (mut window, _) = tall_window();
        window.scroll_to(ScrollToOptions::smooth(800.0));
        assert!(window.is_scrolling());

        window.advance(200);
        let midway = window.scroll_y();
        assert!(midway > 0.0 && midway < 800.0, "midway = {midway}");

        window.advance(SMOOTH_SCROLL_MS);
        assert_eq!(window.scroll_y(), 800.0);
        assert!(!window.is_scrolling());
    }

    #[test]
    fn test_custom_smooth_scroll_duration() {
        let (mut window, _) = tall_window();
        window.set_smooth_scroll_duration(100);
        window.scroll_to(ScrollToOptions::smooth(800.0));

        // Last frame inside the animation is at 96ms
        window.advance(96);
        assert!(window.scroll_y() < 800.0);
        assert!(window.is_scrolling());

        window.advance(FRAME_MS);
        assert_eq!(window.scroll_y(), 800.0);
        assert!(!window.is_scrolling());
    }

    #[test]
    fn test_user_scroll_by_is_relative_and_clamped() {
        let (mut window, _) = tall_window();

        assert!(window.user_scroll_by(250.0));
        assert!(window.user_scroll_by(250.0));
        assert_eq!(window.scroll_y(), 500.0);

        assert!(window.user_scroll_by(-1000.0));
        assert_eq!(window.scroll_y(), 0.0);
        assert!(!window.user_scroll_by(-10.0));

        let body = window.document().body();
        window.document_mut().set_style(body, "overflow", "hidden");
        assert!(!window.user_scroll_by(100.0));
        assert_eq!(window.scroll_y(), 0.0);
    }

    #[test]
    fn test_user_scroll_interrupts_smooth_scroll() {
        let (mut window, _) = tall_window();
        window.scroll_to(ScrollToOptions::smooth(800.0));
        window.advance(50);
        window.user_scroll_to(10.0);
        window.advance(1000);
        assert_eq!(window.scroll_y(), 10.0);
    }

    #[test]
    fn test_click_bubbles_to_document_and_window() {
        let (mut window, main) = tall_window();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for target in [EventTarget::Node(main), EventTarget::Document, EventTarget::Window] {
            let seen = Rc::clone(&seen);
            window.add_event_listener(target, EventKind::Click, move |_, e| {
                seen.borrow_mut().push((e.current_target(), e.target()))
            });
        }

        window.click(main);
        assert_eq!(
            *seen.borrow(),
            vec![
                (EventTarget::Node(main), EventTarget::Node(main)),
                (EventTarget::Document, EventTarget::Node(main)),
                (EventTarget::Window, EventTarget::Node(main)),
            ]
        );
    }

    #[test]
    fn test_stop_propagation() {
        let (mut window, main) = tall_window();
        let reached = Rc::new(Cell::new(false));
        window.add_event_listener(EventTarget::Node(main), EventKind::Click, |_, e| {
            e.stop_propagation()
        });
        let r = Rc::clone(&reached);
        window.add_event_listener(EventTarget::Document, EventKind::Click, move |_, _| r.set(true));

        window.click(main);
        assert!(!reached.get());
    }

    #[test]
    fn test_listener_removed_during_dispatch_does_not_run() {
        let (mut window, _) = tall_window();
        let second_ran = Rc::new(Cell::new(false));
        let second_id = Rc::new(Cell::new(None));

        let id_slot = Rc::clone(&second_id);
        window.add_event_listener(EventTarget::Document, EventKind::KeyDown, move |w, _| {
            if let Some(id) = id_slot.get() {
                w.remove_event_listener(id);
            }
        });
        let flag = Rc::clone(&second_ran);
        let id = window.add_event_listener(EventTarget::Document, EventKind::KeyDown, move |_, _| {
            flag.set(true)
        });
        second_id.set(Some(id));

        window.key_down("Escape");
        assert!(!second_ran.get());
    }

    #[test]
    fn test_finish_loading_runs_once() {
        let (mut window, _) = tall_window();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        window.add_event_listener(EventTarget::Document, EventKind::DomContentLoaded, move |w, _| {
            assert_eq!(w.ready_state(), ReadyState::Interactive);
            c.set(c.get() + 1);
        });

        window.finish_loading();
        window.finish_loading();
        assert_eq!(count.get(), 1);
        assert_eq!(window.ready_state(), ReadyState::Complete);
    }
}
