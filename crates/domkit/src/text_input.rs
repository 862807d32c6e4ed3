//! Text input keyboard handling
//!
//! Escape reverts a text input to its default value. Enter moves focus to the
//! next focusable element, Shift+Enter to the previous one. No wrap-around.

use domkit_dom::{Document, DomEvent, EventListener, EventType, SelectorList};

use crate::{Config, UtilError, DEFAULT_FOCUSABLE_SELECTOR};

/// Name the keydown handler is registered under
pub const TEXT_INPUT_LISTENER: &str = "domkit.text-input";

const TEXT_INPUTS: &str = r#"input[type="text"]"#;

/// Install the keydown handler (capture phase) on every text input.
/// Calling again replaces the earlier registration. Returns how many inputs
/// are handled.
pub fn register_text_input_handlers(doc: &mut Document, config: &Config) -> Result<usize, UtilError> {
    let focusable = SelectorList::parse(&config.focusable_selector)?;
    let inputs = doc.query_selector_all(TEXT_INPUTS)?;
    for &input in &inputs {
        doc.remove_named_listener(input, &EventType::KeyDown, TEXT_INPUT_LISTENER, true);
        let focusable = focusable.clone();
        let listener = EventListener::new(EventType::KeyDown, move |doc: &mut Document, event: &mut DomEvent| {
            handle_text_input_key(doc, event, &focusable)
        })
        .capture(true)
        .named(TEXT_INPUT_LISTENER);
        doc.add_event_listener(input, listener)?;
    }
    tracing::debug!("Registered text input handlers on {} inputs", inputs.len());
    Ok(inputs.len())
}

/// Remove the handler from every element. Returns how many were removed.
pub fn unregister_text_input_handlers(doc: &mut Document) -> usize {
    doc.elements()
        .into_iter()
        .filter(|&el| doc.remove_named_listener(el, &EventType::KeyDown, TEXT_INPUT_LISTENER, true))
        .count()
}

/// Keydown handler using the default focus order
pub fn text_input_handler(doc: &mut Document, event: &mut DomEvent) {
    match SelectorList::parse(DEFAULT_FOCUSABLE_SELECTOR) {
        Ok(focusable) => handle_text_input_key(doc, event, &focusable),
        Err(err) => tracing::error!("text_input_handler: {}", err),
    }
}

/// Keydown handler with an explicit focus order
pub fn handle_text_input_key(doc: &mut Document, event: &mut DomEvent, focusable: &SelectorList) {
    let target = event.target;
    match event.key.as_deref() {
        Some("Escape") => {
            let Some(default) = doc.default_value(target).map(str::to_string) else {
                return;
            };
            event.stop_propagation();
            if let Err(err) = doc.set_value(target, &default) {
                tracing::debug!("Escape on {}: {}", target, err);
            }
        }
        Some("Enter") => {
            event.prevent_default();
            event.stop_propagation();
            let order = doc.matching(focusable);
            let Some(index) = order.iter().position(|&n| n == target) else {
                return;
            };
            let next = if event.shift_key { index.checked_sub(1) } else { Some(index + 1) };
            if let Some(&next) = next.and_then(|i| order.get(i)) {
                doc.focus(next);
            }
        }
        _ => {}
    }
}
