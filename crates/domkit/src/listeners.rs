//! One-shot and throttled listeners

use std::cell::Cell;

use domkit_dom::{Document, DomEvent, EventListener, EventType, ListenerId, NodeId};

use crate::{Config, UtilError};

/// Element given by id or by handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRef<'a> {
    Id(&'a str),
    Node(NodeId),
}

impl ElementRef<'_> {
    pub fn resolve(self, doc: &Document) -> Result<NodeId, UtilError> {
        match self {
            Self::Id(id) => doc.get_element_by_id(id).ok_or_else(|| UtilError::ElementNotFound(id.to_string())),
            Self::Node(node) => Ok(node),
        }
    }
}

impl<'a> From<&'a str> for ElementRef<'a> {
    fn from(id: &'a str) -> Self {
        Self::Id(id)
    }
}

impl From<NodeId> for ElementRef<'_> {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

/// Attach a listener that runs at most once. It is removed before the
/// callback runs.
pub fn one<'a, F>(
    doc: &mut Document,
    target: impl Into<ElementRef<'a>>,
    event_type: impl Into<EventType>,
    callback: F,
) -> Result<ListenerId, UtilError>
where
    F: Fn(&mut Document, &mut DomEvent) + 'static,
{
    let node = target.into().resolve(doc)?;
    let id = doc.add_event_listener(node, EventListener::new(event_type, callback).once(true))?;
    Ok(id)
}

/// Leading-edge throttle over event timestamps
#[derive(Debug)]
pub struct Throttle {
    delay_ms: f64,
    last: Cell<Option<f64>>,
}

impl Throttle {
    pub fn new(delay_ms: f64) -> Self {
        Self { delay_ms, last: Cell::new(None) }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Whether a call at `now_ms` may run; records it if so
    pub fn ready(&self, now_ms: f64) -> bool {
        match self.last.get() {
            Some(last) if now_ms - last < self.delay_ms => false,
            _ => {
                self.last.set(Some(now_ms));
                true
            }
        }
    }
}

/// Attach a listener whose callback runs at most once every `delay_ms`
/// (500 when `None`). Events in between are dropped, not deferred.
pub fn event_listener_throttled<'a, F>(
    doc: &mut Document,
    target: impl Into<ElementRef<'a>>,
    event_type: impl Into<EventType>,
    callback: F,
    delay_ms: impl Into<Option<f64>>,
) -> Result<ListenerId, UtilError>
where
    F: Fn(&mut Document, &mut DomEvent) + 'static,
{
    event_listener_throttled_with(doc, &Config::default(), target, event_type, callback, delay_ms)
}

/// [`event_listener_throttled`] falling back to `config.throttle_delay_ms`
/// when `delay_ms` is missing or unusable
pub fn event_listener_throttled_with<'a, F>(
    doc: &mut Document,
    config: &Config,
    target: impl Into<ElementRef<'a>>,
    event_type: impl Into<EventType>,
    callback: F,
    delay_ms: impl Into<Option<f64>>,
) -> Result<ListenerId, UtilError>
where
    F: Fn(&mut Document, &mut DomEvent) + 'static,
{
    let delay_ms = match delay_ms.into() {
        Some(ms) if ms.is_finite() && ms >= 0.0 => ms,
        _ => config.throttle_delay_ms(),
    };
    let node = target.into().resolve(doc)?;
    let throttle = Throttle::new(delay_ms);
    let listener = EventListener::new(event_type, move |doc: &mut Document, event: &mut DomEvent| {
        if throttle.ready(event.timestamp) {
            callback(doc, event);
        } else {
            tracing::trace!("throttled {} on {}", event.event_type, node);
        }
    });
    let id = doc.add_event_listener(node, listener)?;
    Ok(id)
}
