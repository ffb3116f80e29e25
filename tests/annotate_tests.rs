use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use assert_matches::assert_matches;
use cct_annotate::{
    Annotator, CctError, DecodeError, Dispatcher, DomainClassification, Estimator, FAILURE_CCT,
    Method, Node, Outcome, Rgb, Xy,
};
use serde_json::json;

/// Real dispatcher that counts how often it is reached
#[derive(Clone, Default)]
struct CountingDispatcher {
    inner: Dispatcher,
    calls: Arc<AtomicUsize>,
}

impl Estimator for CountingDispatcher {
    fn estimate(&self, rgb: Rgb, method: Method) -> cct_annotate::Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.estimate(rgb, method)
    }
}

fn doc(value: serde_json::Value) -> Node {
    Node::from(value)
}

fn cct_at(node: &Node, key: &str) -> f64 {
    node.get(key)
        .and_then(Node::as_annotated)
        .unwrap_or_else(|| panic!("{key} not annotated"))
        .cct
}

#[test]
fn white_background_is_annotated_with_daylight_cct() {
    let annotator = Annotator::new();
    let out = annotator
        .annotate(&doc(json!({"background_color": "#FFFFFF"})))
        .expect("annotate");

    let json = serde_json::Value::from(&out);
    let record = json["background_color"].as_object().expect("record");
    let mut keys: Vec<_> = record.keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, vec!["cct", "value"]);
    assert_eq!(record["value"], "#FFFFFF");

    let cct = record["cct"].as_f64().expect("cct");
    assert!(cct > 5000.0, "{cct}");
    assert!((6400.0..6600.0).contains(&cct), "{cct}");
}

#[test]
fn documents_without_color_keys_are_unchanged() {
    let input = doc(json!({
        "name": "dark",
        "sizes": [1, 2, 3],
        "nested": {"colour": "#FFFFFF", "color_mode": "rgb", "flag": true},
        "empty": {},
    }));
    let annotator = Annotator::new();
    assert_eq!(annotator.annotate(&input).expect("annotate"), input);
    assert_eq!(annotator.cache_stats().lookups(), 0);
}

#[test]
fn nested_and_listed_colors_are_annotated() {
    let annotator = Annotator::new();
    let out = annotator
        .annotate(&doc(json!({
            "theme": {
                "header": {"text_color": "#FFA500", "label": "x"},
                "palette_color": ["#FFFFFF", "#808080"],
            }
        })))
        .expect("annotate");

    let header = out.get("theme").and_then(|t| t.get("header")).expect("header");
    let orange = cct_at(header, "text_color");
    assert!((2300.0..2500.0).contains(&orange), "{orange}");
    assert_eq!(header.get("label"), Some(&Node::string("x")));

    let palette = out
        .get("theme")
        .and_then(|t| t.get("palette_color"))
        .and_then(Node::as_list)
        .expect("palette");
    assert_eq!(palette.len(), 2);
    assert!(palette.iter().all(|item| item.as_annotated().is_some()));
}

#[test]
fn invalid_hex_fails_the_whole_call() {
    let annotator = Annotator::new();
    let input = doc(json!({"ok_color": "#FFFFFF", "bad_color": "#ZZZZZZ"}));
    let err = annotator.annotate(&input).expect_err("invalid hex");

    assert_matches!(
        err,
        CctError::Decode { ref value, source: DecodeError::InvalidHex } if value == "#ZZZZZZ"
    );
    assert_eq!(err.code(), "decode_error");
    assert!(!err.is_retryable());
}

#[test]
fn wrong_length_hex_is_rejected() {
    let annotator = Annotator::new();
    assert_matches!(
        annotator.hex_to_cct("#FFF"),
        Err(CctError::Decode { source: DecodeError::InvalidLength(3), .. })
    );
    assert_matches!(
        annotator.hex_to_cct(""),
        Err(CctError::Decode { source: DecodeError::Empty, .. })
    );
}

#[test]
fn repeated_colors_reach_the_dispatcher_once() {
    let estimator = CountingDispatcher::default();
    let calls = estimator.calls.clone();
    let annotator = Annotator::with_estimator(estimator);

    let input = doc(json!({
        "a_color": "#FFFFFF",
        "b_color": "#FFFFFF",
        "c": {"d_color": "#FFA500", "e_color": "#FFFFFF"},
    }));
    let first = annotator.annotate(&input).expect("first");
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let second = annotator.annotate(&input).expect("second");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(first, second);

    let stats = annotator.cache_stats();
    assert_eq!(stats.size, 2);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.hits, 6);
}

#[test]
fn hex_keys_are_case_sensitive_in_the_cache() {
    let estimator = CountingDispatcher::default();
    let calls = estimator.calls.clone();
    let annotator = Annotator::with_estimator(estimator);

    let lower = annotator.hex_to_cct("#ffffff").expect("lower");
    let upper = annotator.hex_to_cct("#FFFFFF").expect("upper");
    let bare = annotator.hex_to_cct("FFFFFF").expect("bare");

    assert_eq!(lower, upper);
    assert_eq!(upper, bare);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn in_place_failure_keeps_earlier_annotations() {
    let annotator = Annotator::new();
    let mut document = doc(json!({
        "first_color": "#FFFFFF",
        "broken_color": "#12345G",
        "last_color": "#FFA500",
    }));

    let err = annotator.annotate_in_place(&mut document).expect_err("broken");
    assert_eq!(err.code(), "decode_error");

    assert!(document.get("first_color").and_then(Node::as_annotated).is_some());
    assert_eq!(document.get("broken_color"), Some(&Node::string("#12345G")));
    assert_eq!(document.get("last_color"), Some(&Node::string("#FFA500")));
}

#[test]
fn in_place_walk_follows_document_order() {
    let annotator = Annotator::new();
    let mut document = cct_annotate::parse_document(
        r##"{"zebra_color": "#FFFFFF", "middle_color": "nope", "alpha_color": "#FFA500"}"##,
        cct_annotate::DocumentFormat::Json,
    )
    .expect("parse");

    assert!(annotator.annotate_in_place(&mut document).is_err());

    assert!(document.get("zebra_color").and_then(Node::as_annotated).is_some());
    assert_eq!(document.get("middle_color"), Some(&Node::string("nope")));
    assert_eq!(document.get("alpha_color"), Some(&Node::string("#FFA500")));
    assert_eq!(annotator.cache_stats().size, 1);
}

#[test]
fn copying_annotate_leaves_input_untouched_on_failure() {
    let annotator = Annotator::new();
    let input = doc(json!({"first_color": "#FFFFFF", "broken_color": "oops"}));
    let snapshot = input.clone();
    assert!(annotator.annotate(&input).is_err());
    assert_eq!(input, snapshot);
}

#[test]
fn gray_and_black_share_the_white_chromaticity() {
    let annotator = Annotator::new();
    let white = annotator.hex_to_cct("#FFFFFF").expect("white");
    let gray = annotator.hex_to_cct("#808080").expect("gray");
    let black = annotator.hex_to_cct("#000000").expect("black");

    assert_eq!(white, gray);
    assert!((6400.0..6600.0).contains(&black), "{black}");
}

#[test]
fn ohno_clamps_above_its_range() {
    let annotator = Annotator::new().with_method(Method::Ohno2013);
    assert_eq!(annotator.hex_to_cct("#0000FF").expect("blue"), 20_001.0);
}

#[test]
fn ohno_clamps_below_its_range() {
    let estimation = Dispatcher::standard()
        .estimate_xy(Xy::new(0.70, 0.29), Method::Ohno2013)
        .expect("estimate");
    assert_eq!(estimation.classification, DomainClassification::BeyondLow);
    assert_eq!(estimation.outcome, Outcome::Clamped);
    assert_eq!(estimation.cct, 999.0);
}

#[test]
fn other_methods_report_zero_out_of_range() {
    let annotator = Annotator::new().with_method(Method::McCamy1992);
    assert_eq!(annotator.hex_to_cct("#FF0000").expect("red"), FAILURE_CCT);
    assert_eq!(annotator.hex_to_cct("#0000FF").expect("blue"), FAILURE_CCT);

    let white = annotator.hex_to_cct("#FFFFFF").expect("white");
    assert!((white - 6505.08).abs() < 0.5, "{white}");
}

#[test]
fn every_method_annotates_white() {
    for method in Method::all().filter(|m| *m != Method::Andres99High) {
        let annotator = Annotator::new().with_method(method);
        let cct = annotator.hex_to_cct("#FFFFFF").expect("white");
        assert!((6300.0..6700.0).contains(&cct), "{method}: {cct}");
    }
}

#[test]
fn unknown_method_names_are_rejected() {
    assert_matches!(
        Method::parse("Planck 1900"),
        Err(CctError::UnsupportedMethod(ref name)) if name == "Planck 1900"
    );
}

#[test]
fn yaml_documents_round_trip_through_the_annotator() {
    let node = cct_annotate::parse_document(
        "title: light\nborder_color: '#FFFFFF'\n",
        cct_annotate::DocumentFormat::Yaml,
    )
    .expect("parse");
    let out = Annotator::new().annotate(&node).expect("annotate");
    let rendered =
        cct_annotate::render_document(&out, cct_annotate::DocumentFormat::Yaml).expect("render");

    let reparsed: serde_yaml::Value = serde_yaml::from_str(&rendered).expect("yaml");
    assert_eq!(reparsed["title"], serde_yaml::Value::from("light"));
    assert_eq!(reparsed["border_color"]["value"], serde_yaml::Value::from("#FFFFFF"));
    assert!(reparsed["border_color"]["cct"].as_f64().is_some());
}

#[test]
fn annotator_is_shareable_across_threads() {
    let annotator = Arc::new(Annotator::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let annotator = annotator.clone();
            std::thread::spawn(move || annotator.hex_to_cct("#FFA500").expect("orange"))
        })
        .collect();

    let results: Vec<f64> = handles.into_iter().map(|h| h.join().expect("join")).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(annotator.cache_stats().size, 1);
}
