//! DOM Events
//!
//! Event objects, listener registration and the per-node listener registry.
//! Dispatch itself lives on [`Document`] because listeners get `&mut Document`.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{Document, NodeId};

/// DOM event types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    KeyDown,
    KeyUp,
    Click,
    Input,
    Change,
    Focus,
    Blur,
    Scroll,
    Resize,
    Custom(String),
}

impl EventType {
    pub fn parse(s: &str) -> Self {
        match s {
            "keydown" => Self::KeyDown,
            "keyup" => Self::KeyUp,
            "click" => Self::Click,
            "input" => Self::Input,
            "change" => Self::Change,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "scroll" => Self::Scroll,
            "resize" => Self::Resize,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Click => "click",
            Self::Input => "input",
            Self::Change => "change",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::Custom(name) => name,
        }
    }

    /// Default `bubbles` flag for events of this type
    fn bubbles(&self) -> bool {
        !matches!(self, Self::Focus | Self::Blur | Self::Scroll | Self::Resize)
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// DOM event
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub event_type: EventType,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    pub phase: EventPhase,
    pub bubbles: bool,
    pub cancelable: bool,
    /// Milliseconds, host clock
    pub timestamp: f64,
    /// `KeyboardEvent.key`
    pub key: Option<String>,
    pub shift_key: bool,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl DomEvent {
    /// Create an event with the type's default flags
    pub fn new(event_type: impl Into<EventType>) -> Self {
        let event_type = event_type.into();
        Self {
            bubbles: event_type.bubbles(),
            cancelable: true,
            event_type,
            target: NodeId::NONE,
            current_target: None,
            phase: EventPhase::None,
            timestamp: 0.0,
            key: None,
            shift_key: false,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Create a keydown event for `key`
    pub fn keydown(key: &str) -> Self {
        let mut event = Self::new(EventType::KeyDown);
        event.key = Some(key.to_string());
        event
    }

    /// Builder: hold Shift
    pub fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    /// Builder: timestamp in milliseconds
    pub fn at(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation to further nodes
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation and skip remaining listeners on the current node
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }
}

/// Listener callback. Per-listener state lives behind `Cell`/`RefCell`.
pub type EventCallback = Rc<dyn Fn(&mut Document, &mut DomEvent)>;

/// Handle returned by `add_event_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener registration
#[derive(Clone)]
pub struct EventListener {
    pub event_type: EventType,
    pub callback: EventCallback,
    pub capture: bool,
    pub once: bool,
    /// Named listeners are deduplicated per (type, name, capture), the way the
    /// DOM deduplicates a repeated function reference.
    pub name: Option<String>,
}

impl EventListener {
    pub fn new<F>(event_type: impl Into<EventType>, callback: F) -> Self
    where
        F: Fn(&mut Document, &mut DomEvent) + 'static,
    {
        Self {
            event_type: event_type.into(),
            callback: Rc::new(callback),
            capture: false,
            once: false,
            name: None,
        }
    }

    pub fn capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    /// Remove the listener before its first invocation
    pub fn once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn same_registration(&self, other: &EventListener) -> bool {
        self.name.is_some()
            && self.name == other.name
            && self.event_type == other.event_type
            && self.capture == other.capture
    }
}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListener")
            .field("event_type", &self.event_type)
            .field("capture", &self.capture)
            .field("once", &self.once)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Listener snapshot taken before invoking callbacks
pub(crate) struct PendingListener {
    pub id: ListenerId,
    pub once: bool,
    pub callback: EventCallback,
}

/// Per-node listener lists, in registration order
#[derive(Debug, Default)]
pub(crate) struct ListenerRegistry {
    by_node: HashMap<NodeId, Vec<(ListenerId, EventListener)>>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn add(&mut self, node: NodeId, listener: EventListener) -> ListenerId {
        let list = self.by_node.entry(node).or_default();
        if let Some((id, _)) = list.iter().find(|(_, l)| l.same_registration(&listener)) {
            return *id;
        }
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        list.push((id, listener));
        id
    }

    pub fn remove(&mut self, node: NodeId, id: ListenerId) -> bool {
        let Some(list) = self.by_node.get_mut(&node) else {
            return false;
        };
        let before = list.len();
        list.retain(|(lid, _)| *lid != id);
        before != list.len()
    }

    /// Remove a named registration
    pub fn remove_named(&mut self, node: NodeId, event_type: &EventType, name: &str, capture: bool) -> bool {
        let Some(list) = self.by_node.get_mut(&node) else {
            return false;
        };
        let before = list.len();
        list.retain(|(_, l)| {
            !(l.name.as_deref() == Some(name) && &l.event_type == event_type && l.capture == capture)
        });
        before != list.len()
    }

    pub fn contains(&self, node: NodeId, id: ListenerId) -> bool {
        self.by_node.get(&node).is_some_and(|list| list.iter().any(|(lid, _)| *lid == id))
    }

    pub fn count(&self, node: NodeId) -> usize {
        self.by_node.get(&node).map_or(0, Vec::len)
    }

    /// Listeners on `node` that fire for `event_type` in `phase`
    pub fn matching(&self, node: NodeId, event_type: &EventType, phase: EventPhase) -> Vec<PendingListener> {
        let Some(list) = self.by_node.get(&node) else {
            return Vec::new();
        };
        list.iter()
            .filter(|(_, l)| &l.event_type == event_type)
            .filter(|(_, l)| match phase {
                EventPhase::Capturing => l.capture,
                EventPhase::Bubbling => !l.capture,
                EventPhase::AtTarget | EventPhase::None => true,
            })
            .map(|(id, l)| PendingListener { id: *id, once: l.once, callback: Rc::clone(&l.callback) })
            .collect()
    }
}
