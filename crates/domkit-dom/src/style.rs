//! Inline style and CSS lengths

/// Initial font size (`medium`)
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// Inline `style` declarations, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `prop: value; prop: value`
    pub fn parse(css_text: &str) -> Self {
        let mut style = Self::new();
        for decl in css_text.split(';') {
            if let Some((prop, value)) = decl.split_once(':') {
                let (prop, value) = (prop.trim(), value.trim());
                if !prop.is_empty() && !value.is_empty() {
                    style.set(prop, value);
                }
            }
        }
        style
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations.iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.as_str())
    }

    /// Set a declaration; an empty value removes it, as with `el.style.x = ""`
    pub fn set(&mut self, property: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.remove(property);
            return;
        }
        match self.declarations.iter_mut().find(|(p, _)| p.eq_ignore_ascii_case(property)) {
            Some((_, v)) => *v = value.to_string(),
            None => self.declarations.push((property.to_ascii_lowercase(), value.to_string())),
        }
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let pos = self.declarations.iter().position(|(p, _)| p.eq_ignore_ascii_case(property))?;
        Some(self.declarations.remove(pos).1)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialize back to `style` attribute text
    pub fn css_text(&self) -> String {
        self.declarations.iter()
            .map(|(p, v)| format!("{p}: {v};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Font-size lengths understood by the computed-style resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssLength {
    Px(f64),
    Pt(f64),
    Em(f64),
    Rem(f64),
    Percent(f64),
}

impl CssLength {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        match value.as_str() {
            "medium" => return Some(Self::Px(DEFAULT_FONT_SIZE_PX)),
            "small" => return Some(Self::Px(13.0)),
            "large" => return Some(Self::Px(18.0)),
            _ => {}
        }
        let (number, unit) = split_number(&value)?;
        let n: f64 = number.parse().ok()?;
        match unit {
            "px" => Some(Self::Px(n)),
            "pt" => Some(Self::Pt(n)),
            "em" => Some(Self::Em(n)),
            "rem" => Some(Self::Rem(n)),
            "%" => Some(Self::Percent(n)),
            "" if n == 0.0 => Some(Self::Px(0.0)),
            _ => None,
        }
    }

    /// Resolve to pixels against the parent and root font sizes
    pub fn to_px(self, parent_px: f64, root_px: f64) -> f64 {
        match self {
            Self::Px(n) => n,
            Self::Pt(n) => n * 4.0 / 3.0,
            Self::Em(n) => n * parent_px,
            Self::Rem(n) => n * root_px,
            Self::Percent(n) => n * parent_px / 100.0,
        }
    }
}

/// Split `12.5px` into `("12.5", "px")`
fn split_number(s: &str) -> Option<(&str, &str)> {
    let end = leading_number_len(s)?;
    Some((&s[..end], &s[end..]))
}

/// Length in bytes of the numeric prefix (sign, digits, fraction, exponent)
fn leading_number_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut digits = i - int_start;
    if bytes.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_start = j;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    Some(i)
}

/// Numeric prefix of a CSS value, ignoring whatever unit follows (`"13.5px"` -> 13.5)
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = leading_number_len(s)?;
    s[..end].parse().ok()
}

/// Format pixels as a CSS length (`10` -> `"10px"`)
pub fn format_px(px: f64) -> String {
    format!("{px}px")
}
