//! DOM Events
//!
//! Input, lifecycle and scroll events plus the listener registry the window
//! dispatches through.

use std::rc::Rc;

use lumen_dom::NodeId;

use crate::Window;

/// Event types the runtime produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    Scroll,
    Resize,
    DomContentLoaded,
    Load,
}

impl EventKind {
    /// Whether the event travels up to ancestors, the document and the window
    pub fn bubbles(self) -> bool {
        matches!(self, Self::Click | Self::KeyDown)
    }

    /// Whether `prevent_default` has any effect
    pub fn cancelable(self) -> bool {
        matches!(self, Self::Click | Self::KeyDown)
    }
}

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Document,
    Node(NodeId),
}

impl EventTarget {
    /// Node behind the target, if any
    pub fn node(self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(id),
            _ => None,
        }
    }
}

/// A dispatched event
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    target: EventTarget,
    current_target: EventTarget,
    key: Option<String>,
    timestamp: u64,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    pub fn new(kind: EventKind, target: EventTarget, timestamp: u64) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            key: None,
            timestamp,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Attach a key name (`"Escape"`, `"Enter"`, ...)
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Original target
    pub fn target(&self) -> EventTarget {
        self.target
    }

    /// Target whose listeners are running
    pub fn current_target(&self) -> EventTarget {
        self.current_target
    }

    pub(crate) fn set_current_target(&mut self, target: EventTarget) {
        self.current_target = target;
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Virtual clock time of dispatch
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.kind.cancelable() {
            self.default_prevented = true;
        }
    }

    /// Stop propagation after the current target
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Handle returned by `add_event_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Event listener callback
pub type Listener = Rc<dyn Fn(&mut Window, &mut Event)>;

struct ListenerEntry {
    id: ListenerId,
    target: EventTarget,
    kind: EventKind,
    listener: Listener,
}

/// Listeners in registration order
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    entries: Vec<ListenerEntry>,
}

impl ListenerRegistry {
    pub(crate) fn add(
        &mut self,
        target: EventTarget,
        kind: EventKind,
        listener: Listener,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.entries.push(ListenerEntry {
            id,
            target,
            kind,
            listener,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Snapshot of the listeners for one target and kind
    pub(crate) fn matching(
        &self,
        target: EventTarget,
        kind: EventKind,
    ) -> Vec<(ListenerId, Listener)> {
        self.entries
            .iter()
            .filter(|e| e.target == target && e.kind == kind)
            .map(|e| (e.id, Rc::clone(&e.listener)))
            .collect()
    }

    pub(crate) fn count(&self, target: EventTarget, kind: EventKind) -> usize {
        self.entries
            .iter()
            .filter(|e| e.target == target && e.kind == kind)
            .count()
    }
}
