//! Text fitting
//!
//! Shrinks an element's font size so its text fits its box. One linear step
//! per call: `new = size * clientWidth / scrollWidth`, clamped to a floor.
//!
//! The font size an element had the first time it was seen is kept in a
//! side-table and restored before every computation, so calling again after
//! the box changes size (e.g. on resize) starts from the natural size.

use std::collections::HashMap;

use domkit_dom::{HostError, NodeId, format_px, parse_leading_number};

use crate::{Config, FitError, FitHost, Selector};

/// Receives per-element failures instead of the log
pub trait ErrorReporter {
    fn report(&self, error: &FitError);
}

impl<F: Fn(&FitError)> ErrorReporter for F {
    fn report(&self, error: &FitError) {
        self(error)
    }
}

/// Requested minimum font size, normalized when a fit runs.
///
/// Missing, non-numeric, NaN or `< 1` requests fall back to the configured
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MinFontSize(Option<f64>);

impl MinFontSize {
    /// Use the configured default
    pub const DEFAULT: MinFontSize = MinFontSize(None);

    /// Effective floor in pixels
    pub fn resolve(self, default_px: f64) -> f64 {
        match self.0 {
            Some(px) if !px.is_nan() && px >= 1.0 => px,
            _ => default_px,
        }
    }
}

impl From<f64> for MinFontSize {
    fn from(px: f64) -> Self {
        Self(Some(px))
    }
}

impl From<f32> for MinFontSize {
    fn from(px: f32) -> Self {
        Self(Some(px.into()))
    }
}

impl From<i32> for MinFontSize {
    fn from(px: i32) -> Self {
        Self(Some(px.into()))
    }
}

impl From<u32> for MinFontSize {
    fn from(px: u32) -> Self {
        Self(Some(px.into()))
    }
}

impl From<Option<f64>> for MinFontSize {
    fn from(px: Option<f64>) -> Self {
        Self(px)
    }
}

/// Parses like a form field would; anything that is not a number is "missing"
impl From<&str> for MinFontSize {
    fn from(text: &str) -> Self {
        Self(text.trim().parse().ok())
    }
}

/// What one fit call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitSummary {
    /// Elements resolved from the selector
    pub processed: usize,
    /// Font size reduced
    pub resized: usize,
    /// Already fits, or already at/below the floor
    pub unchanged: usize,
    /// No computed style
    pub skipped: usize,
    /// Reverted to baseline after a host failure
    pub failed: usize,
}

enum Outcome {
    Resized,
    Unchanged,
    Skipped,
}

/// Text fitter with its baseline side-table
pub struct TextFitter {
    config: Config,
    /// Font size each element had when first processed. Written once.
    baselines: HashMap<NodeId, String>,
    reporter: Option<Box<dyn ErrorReporter>>,
}

impl TextFitter {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            baselines: HashMap::new(),
            reporter: None,
        }
    }

    /// Forward per-element failures to `reporter` instead of logging them
    pub fn with_reporter(config: Config, reporter: impl ErrorReporter + 'static) -> Self {
        Self {
            reporter: Some(Box::new(reporter)),
            ..Self::new(config)
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fit the text of every element `selector` resolves to.
    ///
    /// An invalid selector is logged once and returned as an error without
    /// touching any element. Failures on one element are reported and do not
    /// stop the others.
    pub fn fit_text<H>(
        &mut self,
        host: &mut H,
        selector: impl Into<Selector>,
        min_font_size: impl Into<MinFontSize>,
    ) -> Result<FitSummary, FitError>
    where
        H: FitHost + ?Sized,
    {
        let floor = min_font_size.into().resolve(self.config.min_font_size_px());
        let selector = selector.into();

        let elements = match selector.resolve(&*host) {
            Ok(elements) => elements,
            Err(err) => {
                tracing::error!("{} ({})", err, selector.kind());
                return Err(err);
            }
        };

        let mut summary = FitSummary {
            processed: elements.len(),
            ..Default::default()
        };
        for node in elements {
            match self.fit_element(host, node, floor) {
                Ok(Outcome::Resized) => summary.resized += 1,
                Ok(Outcome::Unchanged) => summary.unchanged += 1,
                Ok(Outcome::Skipped) => summary.skipped += 1,
                Err(source) => {
                    summary.failed += 1;
                    self.revert(host, node);
                    self.report(&FitError::Element { node, source });
                }
            }
        }

        tracing::debug!(
            "fit_text: {} elements, {} resized, {} unchanged, {} skipped, {} failed (floor {}px)",
            summary.processed, summary.resized, summary.unchanged, summary.skipped, summary.failed, floor
        );
        Ok(summary)
    }

    fn fit_element<H>(&mut self, host: &mut H, node: NodeId, floor: f64) -> Result<Outcome, HostError>
    where
        H: FitHost + ?Sized,
    {
        // Start from the natural size, undoing any earlier shrink
        if let Some(baseline) = self.baselines.get(&node) {
            host.set_inline_font_size(node, baseline)?;
        }

        let Some(computed) = host.computed_font_size(node)? else {
            return Ok(Outcome::Skipped);
        };
        let Some(size) = parse_leading_number(&computed) else {
            tracing::debug!("fit_text: {} has no usable font size ({:?})", node, computed);
            return Ok(Outcome::Skipped);
        };

        self.baselines.entry(node).or_insert(computed);

        if size <= floor {
            return Ok(Outcome::Unchanged);
        }

        let client = host.client_width(node)?;
        let scroll = host.scroll_width(node)?;
        if scroll < client || client <= 0.0 || scroll <= 0.0 {
            return Ok(Outcome::Unchanged);
        }

        let new_size = size * client / scroll;
        if new_size >= size {
            return Ok(Outcome::Unchanged);
        }
        // Landing exactly on the floor applies the floor
        let applied = if new_size > floor { new_size } else { floor };
        host.set_inline_font_size(node, &format_px(applied))?;
        tracing::debug!("fit_text: {} {}px -> {}px", node, size, applied);
        Ok(Outcome::Resized)
    }

    /// Best-effort restore of the baseline after a failure
    fn revert<H>(&self, host: &mut H, node: NodeId)
    where
        H: FitHost + ?Sized,
    {
        if let Some(baseline) = self.baselines.get(&node) {
            if let Err(err) = host.set_inline_font_size(node, baseline) {
                tracing::debug!("fit_text: could not restore {} to {}: {}", node, baseline, err);
            }
        }
    }

    fn report(&self, error: &FitError) {
        match &self.reporter {
            Some(reporter) => reporter.report(error),
            None => tracing::warn!("{}", error),
        }
    }

    /// Font size recorded the first time `node` was processed
    pub fn baseline(&self, node: NodeId) -> Option<&str> {
        self.baselines.get(&node).map(String::as_str)
    }

    /// Number of elements with a recorded baseline
    pub fn tracked(&self) -> usize {
        self.baselines.len()
    }

    /// Drop the baseline of an element that is gone for good
    pub fn forget(&mut self, node: NodeId) -> bool {
        self.baselines.remove(&node).is_some()
    }

    /// Drop baselines of elements no longer attached to `host`. Returns how many.
    pub fn prune<H: FitHost + ?Sized>(&mut self, host: &H) -> usize {
        let before = self.baselines.len();
        self.baselines.retain(|&node, _| host.is_connected(node));
        before - self.baselines.len()
    }
}

impl Default for TextFitter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
