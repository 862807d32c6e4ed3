//! Form control state
//!
//! Value/default value and checkedness for `input` and `textarea`.

/// HTML input types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Password,
    Email,
    Number,
    Search,
    Tel,
    Url,
    Hidden,
    Checkbox,
    Radio,
    Submit,
    Reset,
    Button,
}

impl InputType {
    /// Parse the `type` attribute; unknown values fall back to text
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "password" => Self::Password,
            "email" => Self::Email,
            "number" => Self::Number,
            "search" => Self::Search,
            "tel" => Self::Tel,
            "url" => Self::Url,
            "hidden" => Self::Hidden,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "submit" => Self::Submit,
            "reset" => Self::Reset,
            "button" => Self::Button,
            _ => Self::Text,
        }
    }

    /// Checkbox or radio
    pub fn is_checkable(&self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }
}

/// Live state of a form control
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub input_type: InputType,
    /// Current value
    pub value: String,
    /// Value from the `value` attribute
    pub default_value: String,
    pub checked: bool,
    pub default_checked: bool,
    /// Set once the value is edited, after which the attribute stops driving it
    dirty_value: bool,
    has_value_attr: bool,
}

impl InputState {
    pub(crate) fn reflect_attr(&mut self, name: &str, value: &str) {
        match name {
            "type" => self.input_type = InputType::parse(value),
            "value" => {
                self.has_value_attr = true;
                self.default_value = value.to_string();
                if !self.dirty_value {
                    self.value = value.to_string();
                }
            }
            "checked" => {
                self.default_checked = true;
                self.checked = true;
            }
            _ => {}
        }
    }

    /// Undo [`reflect_attr`](Self::reflect_attr) after the attribute is removed
    pub(crate) fn unreflect_attr(&mut self, name: &str) {
        match name {
            "type" => self.input_type = InputType::Text,
            "value" => {
                self.has_value_attr = false;
                self.default_value.clear();
                if !self.dirty_value {
                    self.value.clear();
                }
            }
            "checked" => {
                self.default_checked = false;
                self.checked = false;
            }
            _ => {}
        }
    }

    /// Set the value as a user edit would
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.dirty_value = true;
    }

    /// Value as scripts see it; checkables without a value attribute report "on"
    pub fn effective_value(&self) -> &str {
        if self.input_type.is_checkable() && !self.has_value_attr {
            "on"
        } else {
            &self.value
        }
    }

    /// Restore the default value
    pub fn reset(&mut self) {
        self.value = self.default_value.clone();
        self.checked = self.default_checked;
        self.dirty_value = false;
    }
}
