//! Document - High-level document API

use crate::dom_events::{ListenerRegistry, PendingListener};
use crate::{
    CssLength, DomError, DomEvent, DomResult, DomTree, ElementData, ElementGeometry, EventListener,
    EventPhase, EventType, InputType, ListenerId, NodeId, SelectorError, SelectorList,
    DEFAULT_FONT_SIZE_PX, format_px,
};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    /// Focused element
    focused: Option<NodeId>,
    listeners: ListenerRegistry,
    /// Font size `rem` resolves against, and the initial inherited size
    root_font_size_px: f64,
}

impl Document {
    /// Create a document with `<html><head/><body/></html>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let root = tree.root();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes under the document node cannot violate hierarchy rules
        let _ = tree.append_child(root, html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            focused: None,
            listeners: ListenerRegistry::default(),
            root_font_size_px: DEFAULT_FONT_SIZE_PX,
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn set_root_font_size(&mut self, px: f64) {
        self.root_font_size_px = px;
    }

    // ------------------------------------------------------------------
    // Tree construction
    // ------------------------------------------------------------------

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.tree.append_child(parent, child)
    }

    /// Remove a child. Removing the focused element (or its ancestor) blurs it.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.tree.remove_child(parent, child)?;
        if self.focused.is_some_and(|f| !self.tree.is_connected(f)) {
            self.focused = None;
        }
        Ok(child)
    }

    fn element(&self, id: NodeId) -> DomResult<&ElementData> {
        let node = self.tree.get(id).ok_or(DomError::NotFound(id))?;
        node.as_element().ok_or(DomError::NotAnElement(id))
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        let node = self.tree.get_mut(id).ok_or(DomError::NotFound(id))?;
        node.as_element_mut().ok_or(DomError::NotAnElement(id))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.tree.element(id).is_some()
    }

    pub fn is_connected(&self, id: NodeId) -> bool {
        self.tree.is_connected(id)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut(id)?.set_attr(name, value);
        Ok(())
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.tree.element(id)?.get_attr(name)
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        Ok(self.element_mut(id)?.remove_attr(name))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Connected elements in document order
    pub fn elements(&self) -> Vec<NodeId> {
        self.tree.descendants(self.tree.root())
            .into_iter()
            .filter(|&id| self.is_element(id))
            .collect()
    }

    /// Index of `id` in document order, `None` when detached
    pub fn document_position(&self, id: NodeId) -> Option<usize> {
        if !self.tree.is_connected(id) {
            return None;
        }
        if id == self.tree.root() {
            return Some(0);
        }
        self.tree.descendants(self.tree.root())
            .iter()
            .position(|&n| n == id)
            .map(|p| p + 1)
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|&n| self.tree.element(n).and_then(ElementData::id) == Some(id))
    }

    /// All connected elements matching `selector`, in document order
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let list = SelectorList::parse(selector)?;
        Ok(self.matching(&list))
    }

    /// First connected element matching `selector`
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// All connected elements matching a pre-parsed selector list
    pub fn matching(&self, list: &SelectorList) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|&n| self.tree.element(n).is_some_and(|el| list.matches(el)))
            .collect()
    }

    // ------------------------------------------------------------------
    // Style
    // ------------------------------------------------------------------

    /// Set an inline style property; an empty value removes it
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) -> DomResult<()> {
        self.element_mut(id)?.set_style_property(property, value);
        Ok(())
    }

    /// Inline style property
    pub fn style_property(&self, id: NodeId, property: &str) -> Option<&str> {
        self.tree.element(id)?.style.get(property)
    }

    /// Computed font size in pixels. `None` for detached nodes and non-elements.
    pub fn computed_font_size_px(&self, id: NodeId) -> Option<f64> {
        if !self.is_element(id) || !self.tree.is_connected(id) {
            return None;
        }
        Some(self.resolve_font_size(id))
    }

    /// Computed `font-size` as getComputedStyle reports it (`"16px"`)
    pub fn computed_font_size(&self, id: NodeId) -> Option<String> {
        self.computed_font_size_px(id).map(format_px)
    }

    fn resolve_font_size(&self, id: NodeId) -> f64 {
        let parent_px = match self.tree.parent(id) {
            Some(parent) if self.is_element(parent) => self.resolve_font_size(parent),
            _ => self.root_font_size_px,
        };
        self.style_property(id, "font-size")
            .and_then(CssLength::parse)
            .map_or(parent_px, |len| len.to_px(parent_px, self.root_font_size_px))
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    pub fn set_geometry(&mut self, id: NodeId, geometry: ElementGeometry) -> DomResult<()> {
        self.element_mut(id)?.geometry = geometry;
        Ok(())
    }

    /// `clientWidth`; 0 for detached nodes and non-elements
    pub fn client_width(&self, id: NodeId) -> f64 {
        match self.tree.element(id) {
            Some(el) if self.tree.is_connected(id) => el.geometry.client_width,
            _ => 0.0,
        }
    }

    /// `scrollWidth` at the current computed font size; 0 when not laid out
    pub fn scroll_width(&self, id: NodeId) -> f64 {
        match (self.tree.element(id), self.computed_font_size_px(id)) {
            (Some(el), Some(font_px)) => el.geometry.scroll_width_at(font_px),
            _ => 0.0,
        }
    }

    // ------------------------------------------------------------------
    // Form controls
    // ------------------------------------------------------------------

    pub fn input_type(&self, id: NodeId) -> Option<InputType> {
        self.tree.element(id)?.input_type()
    }

    /// Current value of a form control
    pub fn value(&self, id: NodeId) -> Option<&str> {
        Some(self.tree.element(id)?.input.as_ref()?.effective_value())
    }

    pub fn default_value(&self, id: NodeId) -> Option<&str> {
        Some(self.tree.element(id)?.input.as_ref()?.default_value.as_str())
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        let input = self.element_mut(id)?.input.as_mut().ok_or(DomError::NotAnElement(id))?;
        input.set_value(value);
        Ok(())
    }

    pub fn checked(&self, id: NodeId) -> bool {
        self.tree.element(id)
            .and_then(|el| el.input.as_ref())
            .is_some_and(|i| i.checked)
    }

    /// Set checkedness. Checking a radio unchecks the rest of its named group.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> DomResult<()> {
        let (is_radio, name) = {
            let el = self.element(id)?;
            (el.input_type() == Some(InputType::Radio), el.name().map(str::to_string))
        };
        if checked && is_radio {
            if let Some(name) = name.as_deref() {
                for other in self.radio_group(name) {
                    if other != id {
                        if let Some(input) = self.tree.element_mut(other).and_then(|el| el.input.as_mut()) {
                            input.checked = false;
                        }
                    }
                }
            }
        }
        let input = self.element_mut(id)?.input.as_mut().ok_or(DomError::NotAnElement(id))?;
        input.checked = checked;
        Ok(())
    }

    /// Connected radio inputs named `name`, in document order
    pub fn radio_group(&self, name: &str) -> Vec<NodeId> {
        self.elements()
            .into_iter()
            .filter(|&n| {
                self.tree.element(n).is_some_and(|el| {
                    el.input_type() == Some(InputType::Radio) && el.name() == Some(name)
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Focus a connected element
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.is_element(id) || !self.tree.is_connected(id) {
            tracing::debug!("focus: {} is not a connected element", id);
            return false;
        }
        self.focused = Some(id);
        true
    }

    /// Focused element
    pub fn active_element(&self) -> Option<NodeId> {
        self.focused
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn add_event_listener(&mut self, target: NodeId, listener: EventListener) -> DomResult<ListenerId> {
        if self.tree.get(target).is_none() {
            return Err(DomError::NotFound(target));
        }
        Ok(self.listeners.add(target, listener))
    }

    pub fn remove_event_listener(&mut self, target: NodeId, id: ListenerId) -> bool {
        self.listeners.remove(target, id)
    }

    /// Remove a listener registered with [`EventListener::named`]
    pub fn remove_named_listener(&mut self, target: NodeId, event_type: &EventType, name: &str, capture: bool) -> bool {
        self.listeners.remove_named(target, event_type, name, capture)
    }

    pub fn listener_count(&self, target: NodeId) -> usize {
        self.listeners.count(target)
    }

    /// Dispatch through capture, target and bubble phases.
    /// Returns `false` if a listener prevented the default action.
    pub fn dispatch_event(&mut self, target: NodeId, mut event: DomEvent) -> DomResult<bool> {
        if self.tree.get(target).is_none() {
            return Err(DomError::NotFound(target));
        }
        event.target = target;
        tracing::trace!("dispatch {} to {}", event.event_type, target);

        let mut path = Vec::new();
        let mut current = self.tree.parent(target);
        while let Some(node) = current {
            path.push(node);
            current = self.tree.parent(node);
        }

        for &node in path.iter().rev() {
            if event.is_propagation_stopped() {
                break;
            }
            self.invoke_listeners(node, &mut event, EventPhase::Capturing);
        }
        if !event.is_propagation_stopped() {
            self.invoke_listeners(target, &mut event, EventPhase::AtTarget);
        }
        if event.bubbles {
            for &node in &path {
                if event.is_propagation_stopped() {
                    break;
                }
                self.invoke_listeners(node, &mut event, EventPhase::Bubbling);
            }
        }

        event.current_target = None;
        event.phase = EventPhase::None;
        Ok(!event.is_default_prevented())
    }

    fn invoke_listeners(&mut self, node: NodeId, event: &mut DomEvent, phase: EventPhase) {
        event.current_target = Some(node);
        event.phase = phase;
        let pending = self.listeners.matching(node, &event.event_type, phase);
        for PendingListener { id, once, callback } in pending {
            // An earlier callback may have removed it
            if !self.listeners.contains(node, id) {
                continue;
            }
            if once {
                self.listeners.remove(node, id);
            }
            callback(self, event);
            if event.is_immediate_propagation_stopped() {
                break;
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
