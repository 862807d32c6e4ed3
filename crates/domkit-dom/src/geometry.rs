//! Element geometry
//!
//! clientWidth/scrollWidth style box metrics.

/// Element geometry state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementGeometry {
    // Client properties (content + padding, no scrollbar)
    pub client_width: f64,
    pub client_height: f64,

    // Scroll properties
    pub scroll_width: f64,
    pub scroll_height: f64,

    /// Width of the text run in `em`. When set, the scroll width follows the
    /// font size instead of the fixed `scroll_width`.
    pub text_extent_em: Option<f64>,
}

impl ElementGeometry {
    /// Fixed box: content width does not react to font size
    pub fn fixed(client_width: f64, scroll_width: f64) -> Self {
        Self {
            client_width,
            scroll_width,
            ..Default::default()
        }
    }

    /// Box holding a single-line text run `extent_em` wide
    pub fn text_run(client_width: f64, extent_em: f64) -> Self {
        Self {
            client_width,
            text_extent_em: Some(extent_em),
            ..Default::default()
        }
    }

    /// Scroll width at the given font size. Never less than the client width.
    pub fn scroll_width_at(&self, font_size_px: f64) -> f64 {
        match self.text_extent_em {
            Some(em) => (em * font_size_px).max(self.client_width),
            None => self.scroll_width,
        }
    }

    /// Check if content overflows horizontally
    pub fn overflows_at(&self, font_size_px: f64) -> bool {
        self.scroll_width_at(font_size_px) > self.client_width
    }
}
