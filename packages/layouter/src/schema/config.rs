//! Curated schema table for GeoGebra `geogebra.xml` documents.

use std::f64::consts::FRAC_PI_6;
use std::sync::LazyLock;

use super::core::SchemaRegistry;
use super::types::SchemaDef;
use crate::config::DEFAULT_CAPTION;
use crate::error::Result;

/// Toolbar layout GeoGebra writes when the user never customised it.
const DEFAULT_TOOLBAR: &str = "0 73 62 | 1 501 67 , 5 19 , 72 75 76 | 2 15 45 , 18 65 , 7 37 | 4 3 8 9 , 13 44 , 58 , 47 | 16 51 64 , 70 | 10 34 53 11 , 24  20 22 , 21 23 | 55 56 57 , 12 | 36 46 , 38 49  50 , 71  14  68 | 30 29 54 32 31 33 | 25 17 26 60 52 61 | 40 41 42 , 27 28 35 , 6";

#[allow(clippy::expect_used)] // Static table, covered by test_create_geogebra_registry.
static GGB_REGISTRY: LazyLock<SchemaRegistry> =
    LazyLock::new(|| create_geogebra_registry().expect("valid curated GeoGebra schema table"));

/// Process-wide GeoGebra registry, built on first use and never mutated.
#[must_use]
pub fn ggb_registry() -> &'static SchemaRegistry {
    &GGB_REGISTRY
}

/// Create a registry holding every curated GeoGebra schema.
///
/// # Errors
/// Fails only if the table itself is inconsistent (unknown references or
/// duplicated tags).
pub fn create_geogebra_registry() -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    let defs = leaf_schemas()
        .into_iter()
        .chain(container_schemas())
        .chain(element_schemas());
    for def in defs {
        registry.register(def)?;
    }
    registry.register(root_schema())?;
    Ok(registry)
}

/// Schemas without child roles. Roles below may only reference these.
fn leaf_schemas() -> Vec<SchemaDef> {
    vec![
        SchemaDef::new("AbsoluteScreenLocation").with_attr("x", 0).with_attr("y", 0),
        SchemaDef::new("AlgebraStyle").with_attr("val", 3).with_attr("spreadsheet", 0),
        SchemaDef::new("AngleStyle").with_attr("val", 0),
        SchemaDef::new("AngleUnit").with_attr("val", "degree"),
        SchemaDef::new("Animation")
            .with_attr("speed", 1)
            .with_attr("type", 1)
            .with_attr("playing", false)
            .with_unset(&["step"]),
        SchemaDef::new("ArcSize").with_attr("val", 40),
        SchemaDef::new("Auxiliary").with_attr("val", false),
        SchemaDef::new("Axis")
            .with_attr("id", 0)
            .with_attr("show", true)
            .with_attr("label", "")
            .with_attr("unitLabel", 1)
            .with_attr("tickStyle", 1)
            .with_attr("showNumbers", true)
            .with_unset(&["tickDistance", "tickExpression", "positiveAxis", "selectionAllowed"]),
        // Colour family
        SchemaDef::new("Color").with_attr("r", 0).with_attr("g", 0).with_attr("b", 0),
        SchemaDef::new("AxesColor").extends("Color"),
        SchemaDef::new("BGColor").with_tag("bgColor").extends("Color"),
        SchemaDef::new("GridColor").extends("Color"),
        SchemaDef::new("ObjColor").extends("Color").with_unset(&["alpha"]),
        SchemaDef::new("Caption").with_attr("val", DEFAULT_CAPTION),
        SchemaDef::new("Checkbox").with_attr("fixed", true),
        SchemaDef::new("Clipping")
            .with_attr("use", true)
            .with_attr("show", false)
            .with_attr("size", 1),
        SchemaDef::new("Coefficients").with_attr("rep", "array").with_attr("data", "[]"),
        SchemaDef::new("Collapsed").with_attr("val", 0),
        SchemaDef::new("Condition").with_attr("showObject", true),
        SchemaDef::new("Construction")
            .with_attr("title", "")
            .with_attr("author", "")
            .with_attr("date", ""),
        SchemaDef::new("Continuous").with_attr("val", false),
        SchemaDef::new("Coords")
            .with_attr("x", 0)
            .with_attr("y", 0)
            .with_attr("z", 0)
            .with_unset(&["w", "ox", "oy", "oz", "ow", "vx", "vy", "vz", "vw"]),
        SchemaDef::new("CoordStyle").with_unset(&["style", "val"]),
        SchemaDef::new("CoordSystem")
            .with_attr("xZero", 640)
            .with_attr("yZero", 380)
            .with_attr("scale", 50)
            .with_unset(&["yscale", "zZero", "xAngle", "zAngle"]),
        SchemaDef::new("CurveParam").with_attr("t", 0),
        SchemaDef::new("Decimals").with_attr("val", 2),
        SchemaDef::new("Decoration").with_attr("type", 4),
        SchemaDef::new("DockBar").with_attr("show", false).with_attr("east", false),
        SchemaDef::new("EigenVectors")
            .with_tag("eigenvectors")
            .with_attr("x0", 1)
            .with_attr("y0", 0)
            .with_attr("z0", 0)
            .with_attr("x1", 0)
            .with_attr("y1", 1)
            .with_attr("z1", 0)
            .with_attr("x2", 0)
            .with_attr("y2", 0)
            .with_attr("z2", 1),
        SchemaDef::new("Entry").with_attr("key", "").with_attr("val", ""),
        SchemaDef::new("EqnStyle").with_attr("style", "user").with_attr("parameter", "t"),
        SchemaDef::new("EVSettings")
            .with_tag("evSettings")
            .with_attr("axes", true)
            .with_attr("grid", false)
            .with_attr("gridIsBold", false)
            .with_attr("pointCapturing", 3)
            .with_attr("rightAngleStyle", 1)
            .with_attr("checkboxSize", 26)
            .with_attr("gridType", 3),
        SchemaDef::new("Expression")
            .with_attr("label", "")
            .with_attr("exp", "")
            .with_unset(&["type", "value", "eval", "evalCmd", "native"]),
        SchemaDef::new("Fading").with_attr("val", 0.1),
        SchemaDef::new("Fixed").with_attr("val", true),
        SchemaDef::new("Font")
            .with_attr("size", 16)
            .with_unset(&["serif", "sizeM", "style"]),
        SchemaDef::new("GGBScript").with_tag("ggbscript").with_unset(&["val", "onUpdate"]),
        SchemaDef::new("Grid")
            .with_attr("distX", 2)
            .with_attr("distY", 2)
            .with_attr("distTheta", FRAC_PI_6),
        SchemaDef::new("Input").with_unset(&["a0", "show", "cmd", "top"]),
        SchemaDef::new("IsLatex").with_tag("isLaTeX").with_attr("val", false),
        SchemaDef::new("JavaScript").with_tag("javascript").with_unset(&["val", "onUpdate"]),
        SchemaDef::new("KeepTypeOnTransform").with_attr("val", true),
        SchemaDef::new("LabelingStyle").with_attr("val", 0),
        SchemaDef::new("LabelMode").with_attr("val", 0),
        SchemaDef::new("LabelOffset").with_attr("x", -15).with_attr("y", 15),
        SchemaDef::new("LabelStyle").with_attr("axes", 1).with_attr("serif", false),
        SchemaDef::new("Layer").with_attr("val", 0),
        SchemaDef::new("Length").with_attr("val", 0),
        // Element and view line styles share the tag; attribute presence picks one.
        SchemaDef::union("LineStyle", "lineStyle")
            .with_variant(
                SchemaDef::new("ElementLineStyle")
                    .with_tag("lineStyle")
                    .with_unset(&["thickness", "type", "typeHidden", "opacity"]),
                &["thickness", "type", "typeHidden", "opacity"],
            )
            .with_variant(
                SchemaDef::new("EVLineStyle")
                    .with_tag("lineStyle")
                    .with_attr("axes", 1)
                    .with_attr("grid", 0),
                &["axes", "grid"],
            ),
        SchemaDef::new("LinkedGeo").with_attr("exp", ""),
        SchemaDef::new("Matrix")
            .with_attr("A0", 1)
            .with_attr("A1", 1)
            .with_attr("A2", 0)
            .with_attr("A3", 0)
            .with_attr("A4", 0)
            .with_attr("A5", 0),
        SchemaDef::new("Mode").with_attr("val", 1),
        SchemaDef::new("OutlyingIntersections").with_attr("val", false),
        SchemaDef::new("Output").with_attr("a0", ""),
        SchemaDef::new("Pane")
            .with_attr("location", "")
            .with_attr("divider", 0.5)
            .with_attr("orientation", 0),
        SchemaDef::new("Panes"),
        SchemaDef::new("Perspectives"),
        SchemaDef::new("Plate").with_attr("show", false),
        SchemaDef::new("PointSize").with_attr("val", 5),
        SchemaDef::new("PointStyle").with_attr("val", 0),
        SchemaDef::new("PrefCellSize").with_attr("width", 70).with_attr("height", 35),
        SchemaDef::new("Projection").with_attr("type", 0),
        SchemaDef::new("Scripting").with_attr("blocked", false).with_attr("disabled", false),
        SchemaDef::new("Selection")
            .with_attr("hScroll", 0)
            .with_attr("vScroll", 0)
            .with_attr("column", -1)
            .with_attr("row", -1),
        SchemaDef::new("SelectionAllowed").with_attr("val", false),
        SchemaDef::new("Show")
            .with_attr("object", false)
            .with_attr("label", true)
            .with_attr("ev", 4)
            .with_unset(&["axes", "grid"]),
        SchemaDef::new("Size").with_attr("width", 1310).with_attr("height", 513),
        SchemaDef::new("Slider")
            .with_attr("min", 0)
            .with_attr("max", 100)
            .with_attr("absoluteScreenLocation", true)
            .with_attr("width", 200)
            .with_attr("fixed", false)
            .with_attr("horizontal", true)
            .with_attr("showAlgebra", true)
            .with_unset(&["x", "y"]),
        SchemaDef::new("StartPoint")
            .with_attr("exp", "")
            .with_unset(&["x", "y", "z", "w"]),
        SchemaDef::new("Symbolic").with_attr("val", true),
        SchemaDef::new("TableView")
            .with_tag("tableview")
            .with_attr("min", -2)
            .with_attr("max", 2)
            .with_attr("step", 1),
        SchemaDef::new("ToolBar")
            .with_tag("toolbar")
            .with_attr("show", true)
            .with_attr("items", DEFAULT_TOOLBAR)
            .with_attr("position", 1)
            .with_attr("help", false),
        SchemaDef::new("Trace").with_attr("val", true),
        SchemaDef::new("UsePathAndRegionParameters").with_attr("val", true),
        SchemaDef::new("UserInput").with_attr("show", false),
        SchemaDef::new("Uses3D").with_attr("val", true),
        SchemaDef::new("Value").with_attr("val", 0),
        SchemaDef::new("View")
            .with_attr("id", 1)
            .with_attr("visible", false)
            .with_attr("inframe", false)
            .with_attr("stylebar", false)
            .with_attr("location", "1,1,1")
            .with_attr("size", 500)
            .with_attr("window", "100,100,600,400")
            .with_unset(&["toolbar"]),
        SchemaDef::new("ViewNumber").with_attr("viewNo", 1),
        SchemaDef::new("Views"),
        SchemaDef::new("Window").with_attr("width", 1310).with_attr("height", 1103),
    ]
}

/// Schemas with child roles, ordered so every role target precedes its user.
fn container_schemas() -> Vec<SchemaDef> {
    vec![
        SchemaDef::new("CASMap").with_tag("casMap").with_role("entry", "Entry"),
        SchemaDef::new("AlgebraView")
            .with_role("mode", "Mode")
            .with_role("collapsed", "Collapsed"),
        SchemaDef::new("Command")
            .with_attr("name", "")
            .with_unset(&["var"])
            .with_role("input", "Input")
            .with_role("output", "Output"),
        SchemaDef::new("InputCell").with_role("expression", "Expression"),
        SchemaDef::new("OutputCell").with_role("expression", "Expression"),
        SchemaDef::new("CellPair")
            .with_role("inputCell", "InputCell")
            .with_role("outputCell", "OutputCell"),
        SchemaDef::new("CASCell")
            .with_tag("cascell")
            .with_attr("casLabel", "")
            .with_role("cellPair", "CellPair"),
        SchemaDef::new("EuclidianView")
            .with_role("size", "Size")
            .with_role("settings", "EVSettings")
            .with_role("axesColor", "AxesColor")
            .with_role("lineStyle", "EVLineStyle")
            .with_role("gridColor", "GridColor")
            .with_role("grid", "Grid")
            .with_role("labelStyle", "LabelStyle")
            .with_role("bgColor", "BGColor")
            .with_role("viewNumber", "ViewNumber")
            .with_role("coordSystem", "CoordSystem"),
        SchemaDef::new("EuclidianView3D")
            .with_role("plate", "Plate")
            .with_role("clipping", "Clipping")
            .with_role("projection", "Projection")
            .with_role("settings", "EVSettings")
            .with_role("bgColor", "BGColor")
            .with_role("coordSystem", "CoordSystem"),
        SchemaDef::new("SpreadsheetView")
            .with_role("size", "Size")
            .with_role("prefCellSize", "PrefCellSize")
            .with_role("selection", "Selection"),
        SchemaDef::new("Kernel")
            .with_role("uses3D", "Uses3D")
            .with_role("usePathAndRegionParameters", "UsePathAndRegionParameters")
            .with_role("coordStyle", "CoordStyle")
            .with_role("angleUnit", "AngleUnit")
            .with_role("continuous", "Continuous")
            .with_role("algebraStyle", "AlgebraStyle")
            .with_role("decimals", "Decimals"),
        SchemaDef::new("Perspective")
            .with_attr("id", "tmp")
            .with_role("views", "Views")
            .with_role("toolBar", "ToolBar")
            .with_role("input", "Input")
            .with_role("dockBar", "DockBar")
            .with_role("panes", "Panes"),
        SchemaDef::new("GUI")
            .with_tag("gui")
            .with_role("labelingStyle", "LabelingStyle")
            .with_role("window", "Window")
            .with_role("font", "Font")
            .with_role("perspectives", "Perspectives"),
    ]
}

fn element_kind(name: &str, kind: &str) -> SchemaDef {
    SchemaDef::new(name)
        .with_tag("element")
        .extends("Element")
        .with_discriminator("type", kind)
}

/// The `element` family; kinds are picked by the `type` attribute.
fn element_schemas() -> Vec<SchemaDef> {
    vec![
        SchemaDef::new("Element")
            .with_attr("label", "")
            .with_attr("type", "element")
            .with_role("color", "ObjColor")
            .with_role("show", "Show")
            .with_role("layer", "Layer")
            .with_role("labelMode", "LabelMode")
            .with_role("animation", "Animation")
            .with_role("lineStyle", "ElementLineStyle"),
        element_kind("Boolean", "boolean")
            .with_role("value", "Value")
            .with_role("checkbox", "Checkbox"),
        element_kind("FunctionNVar", "functionNVar"),
        element_kind("List", "list")
            .with_role("pointSize", "PointSize")
            .with_role("pointStyle", "PointStyle"),
        element_kind("Numeric", "numeric")
            .with_role("value", "Value")
            .with_role("symbolic", "Symbolic")
            .with_role("slider", "Slider"),
        element_kind("Point", "point")
            .with_role("auxiliary", "Auxiliary")
            .with_role("coords", "Coords")
            .with_role("labelOffset", "LabelOffset")
            .with_role("size", "PointSize")
            .with_role("style", "PointStyle")
            .with_role("caption", "Caption")
            .with_role("javascript", "JavaScript"),
        element_kind("Polygon", "polygon"),
        element_kind("Segment", "segment")
            .with_role("auxiliary", "Auxiliary")
            .with_role("coords", "Coords")
            .with_role("outlyingIntersections", "OutlyingIntersections")
            .with_role("keepTypeOnTransform", "KeepTypeOnTransform"),
        element_kind("TextField", "textfield")
            .with_role("fixed", "Fixed")
            .with_role("linkedGeo", "LinkedGeo"),
        element_kind("Vector", "vector").with_role("startPoint", "StartPoint"),
        element_kind("Vector3D", "vector3d"),
    ]
}

fn root_schema() -> SchemaDef {
    SchemaDef::new("GeoGebra")
        .with_tag("geogebra")
        .as_document_root()
        .with_attr("app", "classic")
        .with_attr("platform", "w")
        .with_attr("format", "5.0")
        .with_attr("version", "5.0.528.0")
        .with_attr("id", "")
        .with_attr("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance")
        .with_attr("xsi:noNamespaceSchemaLocation", "http://www.geogebra.org/ggb.xsd")
        .with_role("algebraView", "AlgebraView")
        .with_role("construction", "Construction")
        .with_role("scripting", "Scripting")
        .with_role("euclidianView3D", "EuclidianView3D")
        .with_role("gui", "GUI")
        .with_role("kernel", "Kernel")
        .with_role("tableView", "TableView")
        .with_role("spreadsheetView", "SpreadsheetView")
}
