//! Radio group value get/set

use domkit_dom::Document;

/// Value of the checked radio in group `name`. `None` when nothing is checked
/// or the checked radio has an empty value.
pub fn radio_button_value(doc: &Document, name: &str) -> Option<String> {
    doc.radio_group(name)
        .into_iter()
        .find(|&radio| doc.checked(radio))
        .and_then(|radio| doc.value(radio))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Check the radio in group `name` whose value is `value`.
/// Returns `false` and changes nothing when there is no such radio.
pub fn set_radio_button_value(doc: &mut Document, name: &str, value: &str) -> bool {
    let Some(radio) = doc.radio_group(name)
        .into_iter()
        .find(|&radio| doc.get_attribute(radio, "value") == Some(value))
    else {
        tracing::debug!("no radio named {:?} with value {:?}", name, value);
        return false;
    };
    doc.set_checked(radio, true).is_ok()
}
