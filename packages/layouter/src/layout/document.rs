//! The `<geogebra>` document root.

use crate::config::ParseOptions;
use crate::error::{LayoutError, Result};
use crate::schema::{ggb_registry, SchemaRegistry, Specializer, TypedObject};
use crate::value::AttributeValue;
use crate::xml::{TagNode, XmlElement};

/// Schema name of the document root.
pub const ROOT_SCHEMA: &str = "GeoGebra";

/// Schema names counted as Euclidian views.
const VIEW_SCHEMAS: [&str; 2] = ["EuclidianView", "EuclidianView3D"];

/// A specialized GeoGebra document.
#[derive(Debug, Clone)]
pub struct GeoGebraDocument<'r> {
    pub(crate) registry: &'r SchemaRegistry,
    pub(crate) root: TypedObject,
}

impl GeoGebraDocument<'static> {
    /// Parse `geogebra.xml` text against the curated GeoGebra registry.
    ///
    /// # Errors
    /// See [`GeoGebraDocument::parse_with`].
    pub fn parse(xml: &str) -> Result<Self> {
        Self::parse_with(ggb_registry(), xml, ParseOptions::default())
    }
}

impl<'r> GeoGebraDocument<'r> {
    /// Parse and specialize a document with an explicit registry and options.
    ///
    /// # Errors
    /// `XmlParse` for malformed XML, `DepthLimitExceeded` past the nesting
    /// ceiling, `UnknownTag` for unregistered elements and `MalformedValue`
    /// when the root is not `<geogebra>`.
    pub fn parse_with(registry: &'r SchemaRegistry, xml: &str, options: ParseOptions) -> Result<Self> {
        let node = TagNode::parse(xml, &options)?;
        let root = Specializer::new(registry)
            .with_options(options)
            .specialize(&node)?;
        Self::from_root(registry, root)
    }

    /// Wrap an already specialized root.
    ///
    /// A `format` the codec collapsed to an integer is restored to its dotted
    /// form (`5` becomes `"5.0"`).
    ///
    /// # Errors
    /// `MalformedValue` when `root` is not a GeoGebra root.
    pub fn from_root(registry: &'r SchemaRegistry, mut root: TypedObject) -> Result<Self> {
        if !root.is_a(ROOT_SCHEMA) {
            return Err(LayoutError::MalformedValue(format!(
                "expected <geogebra> document root, got <{}>",
                root.tag()
            )));
        }
        if let Some(major) = root.attr("format")?.as_i64() {
            root.set_attr("format", AttributeValue::String(format!("{major}.0")))?;
        }
        Ok(Self { registry, root })
    }

    /// The registry the document was specialized with.
    #[must_use]
    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> &TypedObject {
        &self.root
    }

    /// The construction holding the document's elements.
    ///
    /// # Errors
    /// `MissingChildRole` if the construction was removed.
    pub fn construction(&self) -> Result<&TypedObject> {
        self.root.role("construction")
    }

    /// Every `<element>` of the construction, in document order.
    ///
    /// # Errors
    /// As [`GeoGebraDocument::construction`].
    pub fn elements(&self) -> Result<Vec<&TypedObject>> {
        Ok(self
            .construction()?
            .iter()
            .filter(|child| is_element(child))
            .collect())
    }

    /// All 2-D and 3-D Euclidian views directly under the root.
    #[must_use]
    pub fn euclidian_views(&self) -> Vec<&TypedObject> {
        self.root.iter().filter(|child| is_view(child)).collect()
    }

    /// The 3-D view.
    ///
    /// # Errors
    /// `MissingChildRole` if it was removed.
    pub fn euclidian_view_3d(&self) -> Result<&TypedObject> {
        self.root.role("euclidianView3D")
    }

    /// Serialize with XML declaration.
    #[must_use]
    pub fn xml_repr(&self) -> String {
        self.root.xml_repr()
    }
}

/// Whether `obj` is a construction `<element>` of any kind.
pub(crate) fn is_element(obj: &TypedObject) -> bool {
    obj.tag() == "element"
}

/// Whether `obj` is a 2-D or 3-D Euclidian view.
pub(crate) fn is_view(obj: &TypedObject) -> bool {
    VIEW_SCHEMAS.iter().any(|name| obj.is_a(name))
}

/// Axis children of a view, found by type scan.
pub fn view_axes(view: &TypedObject) -> impl Iterator<Item = &TypedObject> {
    view.children_of("Axis")
}

/// The axis of a view with the given `id` (0 = x, 1 = y, 2 = z).
#[must_use]
pub fn view_axis(view: &TypedObject, id: i64) -> Option<&TypedObject> {
    view_axes(view).find(|axis| axis.attr("id").ok().and_then(AttributeValue::as_i64) == Some(id))
}
