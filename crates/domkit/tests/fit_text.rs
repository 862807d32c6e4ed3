//! Integration tests for text fitting
//!
//! Drives `TextFitter` against a real `Document` and against host doubles
//! that count calls, fail on purpose, or report odd computed styles.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use domkit::dom::{Document, ElementGeometry, HostError, NodeId, NodeList, SelectorError};
use domkit::{Config, ElementCollection, FitError, FitHost, FitSummary, MinFontSize, Selector, TextFitter};
use tracing_subscriber::fmt::MakeWriter;

// ============================================================================
// HELPERS
// ============================================================================

fn boxed(doc: &mut Document, font: &str, geometry: ElementGeometry) -> NodeId {
    let id = doc.create_element("div");
    let body = doc.body();
    doc.append_child(body, id).unwrap();
    doc.set_attribute(id, "class", "fit").unwrap();
    doc.set_style_property(id, "font-size", font).unwrap();
    doc.set_geometry(id, geometry).unwrap();
    id
}

/// Three 30px elements whose text is twice as wide as their box
fn overflowing(doc: &mut Document) -> Vec<NodeId> {
    (0..3).map(|_| boxed(doc, "30px", ElementGeometry::fixed(100.0, 200.0))).collect()
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber that records WARN and above
fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (out, logs)
}

fn count_level(logs: &str, level: &str) -> usize {
    logs.lines().filter(|line| line.contains(level)).count()
}

/// Delegates to a document, counting queries and recording successful style
/// writes. Individual elements can be set up to fail or to report a keyword
/// font size.
struct TestHost<'a> {
    doc: &'a mut Document,
    queries: Cell<usize>,
    writes: Vec<(NodeId, String)>,
    no_layout: Option<NodeId>,
    no_style: Option<NodeId>,
    read_only: Option<NodeId>,
    keyword_font: Option<NodeId>,
}

impl<'a> TestHost<'a> {
    fn new(doc: &'a mut Document) -> Self {
        Self {
            doc,
            queries: Cell::new(0),
            writes: Vec::new(),
            no_layout: None,
            no_style: None,
            read_only: None,
            keyword_font: None,
        }
    }

    /// `scroll_width` fails for `node`
    fn without_layout(mut self, node: NodeId) -> Self {
        self.no_layout = Some(node);
        self
    }

    /// `computed_font_size` fails for `node`
    fn without_style(mut self, node: NodeId) -> Self {
        self.no_style = Some(node);
        self
    }

    /// Every style write to `node` is rejected
    fn read_only(mut self, node: NodeId) -> Self {
        self.read_only = Some(node);
        self
    }

    /// `node` reports `font-size: normal`
    fn keyword_font(mut self, node: NodeId) -> Self {
        self.keyword_font = Some(node);
        self
    }

    fn written(&self) -> Vec<NodeId> {
        self.writes.iter().map(|(node, _)| *node).collect()
    }
}

impl FitHost for TestHost<'_> {
    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        self.queries.set(self.queries.get() + 1);
        FitHost::query_selector_all(&*self.doc, selector)
    }

    fn is_element(&self, node: NodeId) -> bool {
        FitHost::is_element(&*self.doc, node)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        FitHost::is_connected(&*self.doc, node)
    }

    fn document_position(&self, node: NodeId) -> Option<usize> {
        FitHost::document_position(&*self.doc, node)
    }

    fn computed_font_size(&self, node: NodeId) -> Result<Option<String>, HostError> {
        if self.no_style == Some(node) {
            return Err(HostError::ComputedStyle { node, reason: "style engine gone".into() });
        }
        if self.keyword_font == Some(node) {
            return Ok(Some("normal".to_string()));
        }
        FitHost::computed_font_size(&*self.doc, node)
    }

    fn client_width(&self, node: NodeId) -> Result<f64, HostError> {
        FitHost::client_width(&*self.doc, node)
    }

    fn scroll_width(&self, node: NodeId) -> Result<f64, HostError> {
        if self.no_layout == Some(node) {
            return Err(HostError::Layout(node));
        }
        FitHost::scroll_width(&*self.doc, node)
    }

    fn set_inline_font_size(&mut self, node: NodeId, value: &str) -> Result<(), HostError> {
        if self.read_only == Some(node) {
            return Err(HostError::StyleWrite { node, reason: "read-only".into() });
        }
        FitHost::set_inline_font_size(&mut *self.doc, node, value)?;
        self.writes.push((node, value.to_string()));
        Ok(())
    }
}

/// Reporter that keeps every error it is given
fn collecting_reporter() -> (Rc<RefCell<Vec<FitError>>>, impl Fn(&FitError) + 'static) {
    let reports = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&reports);
    (reports, move |err: &FitError| sink.borrow_mut().push(err.clone()))
}

struct Wrapper(Vec<NodeId>);

impl ElementCollection for Wrapper {
    fn to_array(&self) -> Vec<NodeId> {
        self.0.clone()
    }
}

// ============================================================================
// SHRINK CALCULATION
// ============================================================================

#[test]
fn test_fractional_result_written_as_is() {
    let mut doc = Document::default();
    let id = boxed(&mut doc, "30px", ElementGeometry::fixed(100.0, 240.0));

    TextFitter::default().fit_text(&mut doc, id, 10.0).unwrap();

    assert_eq!(doc.style_property(id, "font-size"), Some("12.5px"));
}

#[test]
fn test_inherited_size_is_the_baseline() {
    let mut doc = Document::default();
    let body = doc.body();
    doc.set_style_property(body, "font-size", "24px").unwrap();
    let id = doc.create_element("p");
    doc.append_child(body, id).unwrap();
    doc.set_geometry(id, ElementGeometry::fixed(100.0, 200.0)).unwrap();
    let mut fitter = TextFitter::default();

    fitter.fit_text(&mut doc, id, 10.0).unwrap();

    assert_eq!(fitter.baseline(id), Some("24px"));
    assert_eq!(doc.style_property(id, "font-size"), Some("12px"));
}

#[test]
fn test_floor_cases() {
    // (font, client, scroll, floor, expected)
    let cases = [
        ("20px", 50.0, 100.0, 10.0, "10px"),
        ("16px", 80.0, 160.0, 10.0, "10px"),
        ("16px", 10.0, 1000.0, 12.0, "12px"),
        ("40px", 90.0, 100.0, 10.0, "36px"),
        ("10px", 50.0, 100.0, 10.0, "10px"),
    ];
    for (font, client, scroll, floor, expected) in cases {
        let mut doc = Document::default();
        let id = boxed(&mut doc, font, ElementGeometry::fixed(client, scroll));

        TextFitter::default().fit_text(&mut doc, id, floor).unwrap();

        assert_eq!(doc.style_property(id, "font-size"), Some(expected), "{font} {client}/{scroll} floor {floor}");
    }
}

#[test]
fn test_invalid_floor_uses_default() {
    for floor in [MinFontSize::from(f64::NAN), MinFontSize::from(0.0), MinFontSize::from(-3.0), MinFontSize::from("abc")] {
        let mut doc = Document::default();
        let id = boxed(&mut doc, "16px", ElementGeometry::fixed(10.0, 1000.0));

        TextFitter::default().fit_text(&mut doc, id, floor).unwrap();

        assert_eq!(doc.style_property(id, "font-size"), Some("10px"), "floor {floor:?}");
    }
}

#[test]
fn test_configured_default_floor() {
    let mut doc = Document::default();
    let id = boxed(&mut doc, "16px", ElementGeometry::fixed(10.0, 1000.0));
    let config = Config { default_min_font_size_px: 14.0, ..Config::default() };

    TextFitter::new(config).fit_text(&mut doc, id, MinFontSize::DEFAULT).unwrap();

    assert_eq!(doc.style_property(id, "font-size"), Some("14px"));
}

#[test]
fn test_text_run_settles_after_one_step() {
    let mut doc = Document::default();
    let id = boxed(&mut doc, "20px", ElementGeometry::text_run(100.0, 10.0));
    assert_eq!(doc.scroll_width(id), 200.0);

    TextFitter::default().fit_text(&mut doc, id, 5.0).unwrap();

    assert_eq!(doc.style_property(id, "font-size"), Some("10px"));
    assert_eq!(doc.scroll_width(id), doc.client_width(id));
}

// ============================================================================
// BASELINE
// ============================================================================

#[test]
fn test_repeat_calls_are_idempotent() {
    let mut doc = Document::default();
    let ids = overflowing(&mut doc);
    let mut fitter = TextFitter::default();

    let first = fitter.fit_text(&mut doc, ".fit", 10.0).unwrap();
    let sizes: Vec<_> = ids.iter().map(|&id| doc.computed_font_size(id)).collect();
    let second = fitter.fit_text(&mut doc, ".fit", 10.0).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.resized, 3);
    for (id, size) in ids.iter().zip(sizes) {
        assert_eq!(doc.computed_font_size(*id), size);
        assert_eq!(size.as_deref(), Some("15px"));
    }
}

#[test]
fn test_baseline_survives_external_changes() {
    let mut doc = Document::default();
    let id = boxed(&mut doc, "30px", ElementGeometry::fixed(100.0, 200.0));
    let mut fitter = TextFitter::default();
    fitter.fit_text(&mut doc, id, 10.0).unwrap();

    doc.set_style_property(id, "font-size", "48px").unwrap();
    fitter.fit_text(&mut doc, id, 10.0).unwrap();

    assert_eq!(fitter.baseline(id), Some("30px"));
    assert_eq!(doc.style_property(id, "font-size"), Some("15px"));
}

#[test]
fn test_growing_box_restores_natural_size() {
    let mut doc = Document::default();
    let id = boxed(&mut doc, "20px", ElementGeometry::text_run(100.0, 10.0));
    let mut fitter = TextFitter::default();
    fitter.fit_text(&mut doc, id, 5.0).unwrap();
    assert_eq!(doc.computed_font_size_px(id), Some(10.0));

    doc.set_geometry(id, ElementGeometry::text_run(200.0, 10.0)).unwrap();
    let summary = fitter.fit_text(&mut doc, id, 5.0).unwrap();

    assert_eq!(summary.unchanged, 1);
    assert_eq!(doc.computed_font_size_px(id), Some(20.0));
}

#[test]
fn test_separate_fitters_keep_separate_baselines() {
    let mut doc = Document::default();
    let id = boxed(&mut doc, "30px", ElementGeometry::fixed(100.0, 200.0));
    let mut first = TextFitter::default();
    first.fit_text(&mut doc, id, 10.0).unwrap();

    let mut second = TextFitter::default();
    second.fit_text(&mut doc, id, 10.0).unwrap();

    // The second fitter first saw the already shrunk size
    assert_eq!(second.baseline(id), Some("15px"));
    assert_eq!(doc.style_property(id, "font-size"), Some("10px"));
}

#[test]
fn test_keyword_font_size_skipped() {
    let mut doc = Document::default();
    let ids = overflowing(&mut doc);
    let mut fitter = TextFitter::default();
    let mut host = TestHost::new(&mut doc).keyword_font(ids[1]);

    let summary = fitter.fit_text(&mut host, ".fit", 10.0).unwrap();

    assert_eq!(summary, FitSummary { processed: 3, resized: 2, skipped: 1, ..Default::default() });
    assert_eq!(fitter.baseline(ids[1]), None);
    assert_eq!(doc.style_property(ids[1], "font-size"), Some("30px"));
}

// ============================================================================
// SELECTOR SHAPES
// ============================================================================

#[test]
fn test_only_queries_consult_the_host() {
    for case in 0..5 {
        let mut doc = Document::default();
        let ids = overflowing(&mut doc);
        let (shape, queries): (Selector, usize) = match case {
            0 => (".fit".into(), 1),
            1 => (NodeList::from_vec(ids.clone()).into(), 0),
            2 => (ids.clone().into(), 0),
            3 => (ids.iter().copied().collect::<BTreeSet<_>>().into(), 0),
            _ => (Selector::wrapped(Wrapper(ids.clone())), 0),
        };
        let kind = shape.kind();
        let mut fitter = TextFitter::default();
        let mut host = TestHost::new(&mut doc);

        let summary = fitter.fit_text(&mut host, shape, 10.0).unwrap();

        assert_eq!(host.queries.get(), queries, "{kind}");
        assert_eq!(host.written(), ids, "{kind}");
        assert_eq!(summary.processed, 3, "{kind}");
    }
}

#[test]
fn test_single_element_shape() {
    let mut doc = Document::default();
    let ids = overflowing(&mut doc);
    let mut host = TestHost::new(&mut doc);

    TextFitter::default().fit_text(&mut host, ids[2], 10.0).unwrap();

    assert_eq!(host.queries.get(), 0);
    assert_eq!(host.written(), vec![ids[2]]);
}

#[test]
fn test_set_processed_in_document_order() {
    let mut doc = Document::default();
    let late = doc.create_element("div");
    let ids = overflowing(&mut doc);
    let body = doc.body();
    doc.append_child(body, late).unwrap();
    doc.set_style_property(late, "font-size", "30px").unwrap();
    doc.set_geometry(late, ElementGeometry::fixed(100.0, 200.0)).unwrap();

    let set: BTreeSet<NodeId> = ids.iter().copied().chain([late]).collect();
    assert_eq!(set.iter().next(), Some(&late));
    let mut host = TestHost::new(&mut doc);

    TextFitter::default().fit_text(&mut host, set, 10.0).unwrap();

    assert_eq!(host.written(), vec![ids[0], ids[1], ids[2], late]);
}

#[test]
fn test_list_order_duplicates_and_non_elements() {
    let mut doc = Document::default();
    let ids = overflowing(&mut doc);
    let text = doc.create_text("loose");
    let body = doc.body();
    doc.append_child(body, text).unwrap();
    let mut host = TestHost::new(&mut doc);

    let summary = TextFitter::default()
        .fit_text(&mut host, vec![ids[2], text, ids[0], ids[2]], 10.0)
        .unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(host.written(), vec![ids[2], ids[0]]);
}

#[test]
fn test_empty_match_is_not_an_error() {
    let mut doc = Document::default();
    overflowing(&mut doc);

    let summary = TextFitter::default().fit_text(&mut doc, ".missing", 10.0).unwrap();

    assert_eq!(summary, FitSummary::default());
}

#[test]
fn test_works_through_trait_object() {
    let mut doc = Document::default();
    let ids = overflowing(&mut doc);
    let host: &mut dyn FitHost = &mut doc;

    TextFitter::default().fit_text(host, ".fit", 10.0).unwrap();

    assert_eq!(doc.style_property(ids[0], "font-size"), Some("15px"));
}

// ============================================================================
// INVALID INPUT
// ============================================================================

#[test]
fn test_invalid_selector_logs_once_and_touches_nothing() {
    let mut doc = Document::default();
    let ids = overflowing(&mut doc);
    let text = doc.create_text("x");

    let invalid: Vec<Selector> = vec![
        Selector::None,
        Option::<NodeId>::None.into(),
        "div p".into(),
        "   ".into(),
        text.into(),
    ];
    for selector in invalid {
        let kind = selector.kind();
        let mut fitter = TextFitter::default();
        let mut host = TestHost::new(&mut doc);

        let (result, logs) = capture_logs(|| fitter.fit_text(&mut host, selector, 10.0));

        assert!(matches!(result, Err(FitError::InvalidSelector(_))), "{kind}");
        assert_eq!(count_level(&logs, "ERROR"), 1, "{kind}: {logs}");
        assert!(host.writes.is_empty(), "{kind}");
        assert_eq!(fitter.tracked(), 0, "{kind}");
    }
    for id in ids {
        assert_eq!(doc.style_property(id, "font-size"), Some("30px"));
    }
}

#[test]
fn test_invalid_selector_message() {
    let mut doc = Document::default();

    let err = TextFitter::default().fit_text(&mut doc, Selector::None, 10.0).unwrap_err();

    assert!(err.to_string().starts_with("Invalid selector or elements provided to fit_text"));
}

// ============================================================================
// FAILURE ISOLATION
// ============================================================================

#[test]
fn test_failure_reverts_and_reports() {
    let mut doc = Document::default();
    let ids = overflowing(&mut doc);
    let (reports, reporter) = collecting_reporter();
    let mut fitter = TextFitter::with_reporter(Config::default(), reporter);

    // Shrink once so there is something to revert
    fitter.fit_text(&mut doc, ".fit", 10.0).unwrap();
    assert_eq!(doc.style_property(ids[1], "font-size"), Some("15px"));

    let mut host = TestHost::new(&mut doc).without_layout(ids[1]);
    let (summary, logs) = capture_logs(|| fitter.fit_text(&mut host, ".fit", 10.0).unwrap());

    assert_eq!(summary, FitSummary { processed: 3, resized: 2, failed: 1, ..Default::default() });
    assert_eq!(doc.style_property(ids[0], "font-size"), Some("15px"));
    assert_eq!(doc.style_property(ids[1], "font-size"), Some("30px"));
    assert_eq!(doc.style_property(ids[2], "font-size"), Some("15px"));

    let reports = reports.borrow();
    assert_eq!(reports.len(), 1);
    assert!(matches!(
        &reports[0],
        FitError::Element { node, source: HostError::Layout(_) } if *node == ids[1]
    ));
    // Reported to the sink, not the log
    assert_eq!(count_level(&logs, "WARN"), 0);
}

#[test]
fn test_style_read_failure_on_first_call() {
    let mut doc = Document::default();
    let ids = overflowing(&mut doc);
    let (reports, reporter) = collecting_reporter();
    let mut fitter = TextFitter::with_reporter(Config::default(), reporter);
    let mut host = TestHost::new(&mut doc).without_style(ids[1]);

    let summary = fitter.fit_text(&mut host, ".fit", 10.0).unwrap();

    assert_eq!(summary, FitSummary { processed: 3, resized: 2, failed: 1, ..Default::default() });
    // Nothing to revert to, so nothing is written
    assert_eq!(host.written(), vec![ids[0], ids[2]]);
    assert_eq!(fitter.baseline(ids[1]), None);
    assert_eq!(doc.style_property(ids[1], "font-size"), Some("30px"));
    assert_eq!(doc.style_property(ids[0], "font-size"), Some("15px"));
    assert_eq!(doc.style_property(ids[2], "font-size"), Some("15px"));

    let reports = reports.borrow();
    assert_eq!(reports.len(), 1);
    assert!(matches!(
        &reports[0],
        FitError::Element { node, source: HostError::ComputedStyle { .. } } if *node == ids[1]
    ));
}

#[test]
fn test_rejected_shrink_write() {
    let mut doc = Document::default();
    let ids = overflowing(&mut doc);
    let (reports, reporter) = collecting_reporter();
    let mut fitter = TextFitter::with_reporter(Config::default(), reporter);
    let mut host = TestHost::new(&mut doc).read_only(ids[1]);

    let summary = fitter.fit_text(&mut host, ".fit", 10.0).unwrap();

    assert_eq!(summary, FitSummary { processed: 3, resized: 2, failed: 1, ..Default::default() });
    assert_eq!(host.written(), vec![ids[0], ids[2]]);
    assert_eq!(fitter.baseline(ids[1]), Some("30px"));
    assert_eq!(doc.style_property(ids[1], "font-size"), Some("30px"));
    assert_eq!(doc.style_property(ids[2], "font-size"), Some("15px"));

    let reports = reports.borrow();
    assert_eq!(reports.len(), 1);
    assert!(matches!(
        &reports[0],
        FitError::Element { node, source: HostError::StyleWrite { .. } } if *node == ids[1]
    ));
}

#[test]
fn test_rejected_restore_write() {
    let mut doc = Document::default();
    let ids = overflowing(&mut doc);
    let (reports, reporter) = collecting_reporter();
    let mut fitter = TextFitter::with_reporter(Config::default(), reporter);
    fitter.fit_text(&mut doc, ".fit", 10.0).unwrap();

    let mut host = TestHost::new(&mut doc).read_only(ids[1]);
    let summary = fitter.fit_text(&mut host, ".fit", 10.0).unwrap();

    assert_eq!(summary, FitSummary { processed: 3, resized: 2, failed: 1, ..Default::default() });
    // Siblings restore, then shrink again
    assert_eq!(host.written(), vec![ids[0], ids[0], ids[2], ids[2]]);
    assert_eq!(fitter.baseline(ids[1]), Some("30px"));
    assert_eq!(doc.style_property(ids[1], "font-size"), Some("15px"));
    assert_eq!(doc.style_property(ids[0], "font-size"), Some("15px"));

    let reports = reports.borrow();
    assert_eq!(reports.len(), 1);
    assert!(matches!(&reports[0], FitError::Element { source: HostError::StyleWrite { .. }, .. }));
}

#[test]
fn test_failure_without_reporter_is_logged() {
    let mut doc = Document::default();
    let ids = overflowing(&mut doc);
    let mut fitter = TextFitter::default();
    let mut host = TestHost::new(&mut doc).without_layout(ids[0]);

    let (summary, logs) = capture_logs(|| fitter.fit_text(&mut host, ".fit", 10.0).unwrap());

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.resized, 2);
    assert_eq!(count_level(&logs, "WARN"), 1, "{logs}");
    assert_eq!(count_level(&logs, "ERROR"), 0, "{logs}");
    assert_eq!(doc.style_property(ids[0], "font-size"), Some("30px"));
}

#[test]
fn test_source_error_is_exposed() {
    use std::error::Error;

    let err = FitError::Element { node: NodeId::ROOT, source: HostError::Layout(NodeId::ROOT) };

    assert!(err.source().is_some());
    assert!(err.to_string().contains("#0"));
}
