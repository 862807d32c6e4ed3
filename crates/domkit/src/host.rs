//! Host UI tree seen by the text fitter

use domkit_dom::{Document, HostError, NodeId, SelectorError};

/// What [`TextFitter`](crate::TextFitter) needs from the tree it works on.
///
/// [`Document`] implements it; anything else that can answer these questions
/// (a browser binding, a test double) can stand in.
pub trait FitHost {
    /// Elements matching `selector`, in document order
    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError>;

    fn is_element(&self, node: NodeId) -> bool;

    /// Attached to the document
    fn is_connected(&self, node: NodeId) -> bool;

    /// Position in document order, `None` when detached
    fn document_position(&self, node: NodeId) -> Option<usize>;

    /// Computed `font-size` string (`"16px"`); `Ok(None)` when the element has
    /// no computed style (detached, not rendered)
    fn computed_font_size(&self, node: NodeId) -> Result<Option<String>, HostError>;

    fn client_width(&self, node: NodeId) -> Result<f64, HostError>;

    fn scroll_width(&self, node: NodeId) -> Result<f64, HostError>;

    /// Write the inline `font-size`
    fn set_inline_font_size(&mut self, node: NodeId, value: &str) -> Result<(), HostError>;
}

impl FitHost for Document {
    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        Document::query_selector_all(self, selector)
    }

    fn is_element(&self, node: NodeId) -> bool {
        Document::is_element(self, node)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        Document::is_connected(self, node)
    }

    fn document_position(&self, node: NodeId) -> Option<usize> {
        Document::document_position(self, node)
    }

    fn computed_font_size(&self, node: NodeId) -> Result<Option<String>, HostError> {
        Ok(Document::computed_font_size(self, node))
    }

    fn client_width(&self, node: NodeId) -> Result<f64, HostError> {
        Ok(Document::client_width(self, node))
    }

    fn scroll_width(&self, node: NodeId) -> Result<f64, HostError> {
        Ok(Document::scroll_width(self, node))
    }

    fn set_inline_font_size(&mut self, node: NodeId, value: &str) -> Result<(), HostError> {
        self.set_style_property(node, "font-size", value)?;
        Ok(())
    }
}
