//! End-to-end tests for the layouting pipeline.
//!
//! Parses the minimal fixture document, applies the fixture layout and
//! checks the re-serialized XML.

use std::fs;
use std::path::Path;

use ggb_layouter::layout::{view_axes, Rgb};
use ggb_layouter::{AttributeValue, GeoGebraDocument, LayoutConfig, LayoutError};
use pretty_assertions::assert_eq;

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("minimal")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn styled_document() -> GeoGebraDocument<'static> {
    let mut doc = GeoGebraDocument::parse(&load_fixture("geogebra.xml")).unwrap();
    let layout = LayoutConfig::parse(&load_fixture("layout.json")).unwrap();
    doc.apply_layout(&layout).unwrap();
    doc
}

/// Reparse the serialized output so assertions see what a reader would see.
fn reparsed(doc: &GeoGebraDocument<'_>) -> GeoGebraDocument<'static> {
    GeoGebraDocument::parse(&doc.xml_repr()).unwrap()
}

#[test]
fn test_background_color_on_views() {
    let doc = reparsed(&styled_document());

    let views = doc.euclidian_views();
    assert_eq!(views.len(), 2);
    for view in views {
        let bg = view.role("bgColor").unwrap();
        assert_eq!(Rgb::from_object(bg).unwrap(), Rgb::new(0, 0, 255));
    }
}

#[test]
fn test_captions_untouched_without_tex() {
    let doc = reparsed(&styled_document());
    let elements = doc.elements().unwrap();

    let point = elements[0];
    assert_eq!(point.class_name(), "Point");
    assert_eq!(
        point.role("caption").unwrap().attr("val").unwrap(),
        &AttributeValue::String("%n".to_string())
    );

    let segment = elements[1];
    let caption = segment.children_of("Caption").next().unwrap();
    assert_eq!(caption.attr("val").unwrap().as_str(), Some("side"));
}

#[test]
fn test_hidden_lines_dotted() {
    let doc = reparsed(&styled_document());
    for element in doc.elements().unwrap() {
        let style = element.role("lineStyle").unwrap();
        assert_eq!(style.attr("typeHidden").unwrap(), &AttributeValue::Integer(1));
    }

    let segment = doc.elements().unwrap()[1];
    let style = segment.role("lineStyle").unwrap();
    assert_eq!(style.attr("thickness").unwrap(), &AttributeValue::Integer(5));
    assert_eq!(style.attr("opacity").unwrap(), &AttributeValue::Integer(178));
}

#[test]
fn test_axes_without_ticks() {
    let doc = reparsed(&styled_document());
    let view = doc.euclidian_views()[0];

    let axes: Vec<_> = view_axes(view).collect();
    assert_eq!(axes.len(), 2);
    for axis in axes {
        assert_eq!(axis.attr("tickStyle").unwrap(), &AttributeValue::Integer(0));
        assert_eq!(axis.attr("show").unwrap(), &AttributeValue::Boolean(true));
        assert_eq!(axis.attr("showNumbers").unwrap(), &AttributeValue::Boolean(true));
        assert_eq!(axis.attr("positiveAxis").unwrap(), &AttributeValue::Boolean(false));
    }

    // The view line style keeps its own shape.
    assert_eq!(view.role("lineStyle").unwrap().class_name(), "EVLineStyle");
}

#[test]
fn test_serialized_fragments() {
    let xml = styled_document().xml_repr();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<geogebra "));
    assert!(xml.contains(r#"format="5.0""#));
    assert!(xml.contains(r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#));
    assert!(xml.contains(r#"xsi:noNamespaceSchemaLocation="http://www.geogebra.org/ggb.xsd""#));
    assert!(xml.contains(r#"        <bgColor r="0" g="0" b="255"/>"#));
    assert!(xml.contains(r#"<axis id="0" show="true" label="" unitLabel="" tickStyle="0" showNumbers="true" positiveAxis="false"/>"#));
    assert!(xml.contains(r#"<lineStyle thickness="5" type="0" typeHidden="1" opacity="178"/>"#));
    assert!(xml.contains(r#"<coordSystem xZero="215" yZero="315" scale="50" yscale="50"/>"#));
}

#[test]
fn test_untouched_structure_survives() {
    let original = GeoGebraDocument::parse(&load_fixture("geogebra.xml")).unwrap();
    let styled = reparsed(&styled_document());

    assert_eq!(
        original.root().role("kernel").unwrap(),
        styled.root().role("kernel").unwrap()
    );
    assert_eq!(
        original.root().role("gui").unwrap(),
        styled.root().role("gui").unwrap()
    );

    let coords = |doc: &GeoGebraDocument<'_>| doc.elements().unwrap()[0].role("coords").unwrap().clone();
    assert_eq!(coords(&original), coords(&styled));
}

#[test]
fn test_styling_twice_is_stable() {
    let layout = LayoutConfig::parse(&load_fixture("layout.json")).unwrap();
    let mut doc = styled_document();
    let once = doc.xml_repr();
    doc.apply_layout(&layout).unwrap();
    assert_eq!(once, doc.xml_repr());
}

#[test]
fn test_missing_layout_key_aborts() {
    let mut doc = GeoGebraDocument::parse(&load_fixture("geogebra.xml")).unwrap();
    let layout = LayoutConfig::parse(
        r#"{"background_color": "blue", "color_palette": {"blue": [0, 0, 255]}}"#,
    )
    .unwrap();

    let err = doc.apply_layout(&layout).unwrap_err();
    assert!(matches!(
        err,
        LayoutError::MissingConfigKey(ref key) if key == "default_caption_style.tex"
    ));
}

#[test]
fn test_malformed_color_aborts() {
    let mut doc = GeoGebraDocument::parse(&load_fixture("geogebra.xml")).unwrap();
    let layout = LayoutConfig::parse(
        r#"{"background_color": [0, 0], "color_palette": {}}"#,
    )
    .unwrap();
    assert!(matches!(
        doc.apply_layout(&layout),
        Err(LayoutError::MalformedValue(_))
    ));
}
