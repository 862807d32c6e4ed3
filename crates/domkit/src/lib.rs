//! domkit
//!
//! Small DOM convenience utilities built on the domkit host tree.
//!
//! Features:
//! - Text fitting: shrink an element's font size in one proportional step
//!   until its text fits, never below a floor
//! - One-shot and throttled event listeners
//! - Radio group value get/set
//! - Text input keys: Escape reverts, Enter / Shift+Enter moves focus
//!
//! # Example
//! ```rust,ignore
//! use domkit::{TextFitter, Config};
//!
//! let mut fitter = TextFitter::new(Config::default());
//! fitter.fit_text(&mut document, ".headline", 12.0)?;
//! ```

mod config;
mod host;
mod selector;
mod fit;
mod listeners;
mod radio;
mod text_input;

pub use config::{Config, DEFAULT_MIN_FONT_SIZE_PX, DEFAULT_THROTTLE_DELAY_MS, DEFAULT_FOCUSABLE_SELECTOR};
pub use host::FitHost;
pub use selector::{Selector, ElementCollection};
pub use fit::{TextFitter, MinFontSize, FitSummary, ErrorReporter};
pub use listeners::{ElementRef, one, event_listener_throttled, event_listener_throttled_with, Throttle};
pub use radio::{radio_button_value, set_radio_button_value};
pub use text_input::{
    register_text_input_handlers, unregister_text_input_handlers, text_input_handler,
    handle_text_input_key, TEXT_INPUT_LISTENER,
};

// Re-export the host tree for callers that only depend on domkit
pub use domkit_dom as dom;

use domkit_dom::{DomError, HostError, NodeId, SelectorError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Text fitting errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum FitError {
    #[error("Invalid selector or elements provided to fit_text: {0}")]
    InvalidSelector(String),

    #[error("fit_text failed on element {node}: {source}")]
    Element {
        node: NodeId,
        #[source]
        source: HostError,
    },
}

/// Errors from the listener, radio and text-input helpers
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    #[error("No element with id `{0}`")]
    ElementNotFound(String),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Selector(#[from] SelectorError),
}
