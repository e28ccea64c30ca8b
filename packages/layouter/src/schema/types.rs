//! Schema declarations and their resolved, shared form.

use indexmap::IndexMap;

use crate::value::AttributeValue;

/// Handle of a schema inside a [`SchemaRegistry`](super::SchemaRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub(crate) usize);

/// Lower-case the first character: `"BGColor"` becomes `"bGColor"`.
fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Declarative description of a tag class, consumed by the registry.
///
/// Built with a fluent API:
///
/// ```
/// use ggb_layouter::schema::SchemaDef;
///
/// let caption = SchemaDef::new("Caption").with_attr("val", "%n");
/// assert_eq!(caption.tag, "caption");
///
/// let bg = SchemaDef::new("BGColor").with_tag("bgColor").extends("Color");
/// assert_eq!(bg.parent.as_deref(), Some("Color"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDef {
    /// Unique schema name.
    pub name: String,

    /// Element tag. Defaults to the name with its first letter lower-cased.
    pub tag: String,

    /// Schema whose attributes and roles are inherited.
    pub parent: Option<String>,

    /// Default attributes in output order. `Absent` declares without a default.
    pub attrs: Vec<(String, AttributeValue)>,

    /// Child roles: logical name to schema name.
    pub roles: Vec<(String, String)>,

    /// Attribute name and value selecting this schema among same-tag elements.
    pub discriminator: Option<(String, String)>,

    /// Whether serialization prefixes an XML declaration.
    pub document_root: bool,

    /// Union members with the attribute keys that select them; first is the fallback.
    pub variants: Vec<(SchemaDef, Vec<String>)>,
}

impl SchemaDef {
    /// Create a concrete schema declaration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            tag: camel_case(&name),
            name,
            parent: None,
            attrs: Vec::new(),
            roles: Vec::new(),
            discriminator: None,
            document_root: false,
            variants: Vec::new(),
        }
    }

    /// Create a union schema that dispatches on which attributes are present.
    #[must_use]
    pub fn union(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::new(name).with_tag(tag)
    }

    /// Set the element tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Inherit attributes and roles from another schema.
    #[must_use]
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Declare one attribute with its default.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, default: impl Into<AttributeValue>) -> Self {
        self.attrs.push((name.into(), default.into()));
        self
    }

    /// Declare attributes that have no default value.
    #[must_use]
    pub fn with_unset(mut self, names: &[&str]) -> Self {
        self.attrs
            .extend(names.iter().map(|name| ((*name).to_string(), AttributeValue::Absent)));
        self
    }

    /// Declare a child role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>, schema: impl Into<String>) -> Self {
        self.roles.push((role.into(), schema.into()));
        self
    }

    /// Select this schema by `attr="value"` among elements sharing its tag.
    ///
    /// The value also becomes the attribute's default.
    #[must_use]
    pub fn with_discriminator(mut self, attr: impl Into<String>, value: impl Into<String>) -> Self {
        let attr = attr.into();
        let value = value.into();
        self.attrs.push((attr.clone(), AttributeValue::String(value.clone())));
        self.discriminator = Some((attr, value));
        self
    }

    /// Mark as the document root.
    #[must_use]
    pub fn as_document_root(mut self) -> Self {
        self.document_root = true;
        self
    }

    /// Add a union member chosen when any of `keys` is present on the element.
    #[must_use]
    pub fn with_variant(mut self, variant: SchemaDef, keys: &[&str]) -> Self {
        let keys = keys.iter().map(|k| (*k).to_string()).collect();
        self.variants.push((variant, keys));
        self
    }

    /// Whether this declaration is a union.
    #[must_use]
    pub fn is_union(&self) -> bool {
        !self.variants.is_empty()
    }
}

/// A resolved child role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub(crate) name: String,
    pub(crate) schema: SchemaId,
    pub(crate) family: SchemaId,
}

impl Role {
    /// Logical role name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema used for the default-shaped placeholder.
    #[must_use]
    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    /// Whether an object of `schema` can occupy this role.
    ///
    /// Members of the same union are interchangeable.
    #[must_use]
    pub fn accepts(&self, schema: &Schema) -> bool {
        schema.id == self.schema || schema.family == self.family
    }
}

/// Union member selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub(crate) schema: SchemaId,
    pub(crate) keys: Vec<String>,
}

/// A registered tag class. Shared read-only by every instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub(crate) id: SchemaId,
    pub(crate) name: String,
    pub(crate) tag: String,
    pub(crate) family: SchemaId,
    pub(crate) lineage: Vec<String>,
    pub(crate) attrs: IndexMap<String, AttributeValue>,
    pub(crate) roles: Vec<Role>,
    pub(crate) discriminator: Option<(String, String)>,
    pub(crate) document_root: bool,
    pub(crate) variants: Vec<Variant>,
}

impl Schema {
    /// Registry handle.
    #[must_use]
    pub fn id(&self) -> SchemaId {
        self.id
    }

    /// Schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Whether this schema is `name` or inherits from it (or belongs to union `name`).
    #[must_use]
    pub fn is_a(&self, name: &str) -> bool {
        self.lineage.iter().any(|n| n == name)
    }

    /// Default attribute table.
    #[must_use]
    pub fn defaults(&self) -> &IndexMap<String, AttributeValue> {
        &self.attrs
    }

    /// Whether `name` is a declared attribute.
    #[must_use]
    pub fn declares_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Declared child roles.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Look up a role by name.
    #[must_use]
    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|role| role.name == name)
    }

    /// Index of the first role that accepts `child`.
    #[must_use]
    pub fn role_index_for(&self, child: &Schema) -> Option<usize> {
        self.roles.iter().position(|role| role.accepts(child))
    }

    /// Whether serialization prefixes an XML declaration.
    #[must_use]
    pub fn is_document_root(&self) -> bool {
        self.document_root
    }

    /// Whether this is a union dispatching to variants.
    #[must_use]
    pub fn is_union(&self) -> bool {
        !self.variants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_tag() {
        assert_eq!(SchemaDef::new("Caption").tag, "caption");
        assert_eq!(SchemaDef::new("EuclidianView3D").tag, "euclidianView3D");
        assert_eq!(SchemaDef::new("GUI").with_tag("gui").tag, "gui");
    }

    #[test]
    fn test_discriminator_sets_default() {
        let def = SchemaDef::new("Point")
            .with_tag("element")
            .with_discriminator("type", "point");
        assert_eq!(def.discriminator, Some(("type".to_string(), "point".to_string())));
        assert_eq!(
            def.attrs,
            vec![("type".to_string(), AttributeValue::String("point".to_string()))]
        );
    }

    #[test]
    fn test_with_unset() {
        let def = SchemaDef::new("Font").with_attr("size", 16).with_unset(&["serif", "style"]);
        assert_eq!(def.attrs.len(), 3);
        assert!(def.attrs[1].1.is_absent());
    }

    #[test]
    fn test_union_declaration() {
        let def = SchemaDef::union("LineStyle", "lineStyle")
            .with_variant(SchemaDef::new("A").with_tag("lineStyle"), &["thickness"])
            .with_variant(SchemaDef::new("B").with_tag("lineStyle"), &["axes"]);
        assert!(def.is_union());
        assert_eq!(def.variants[1].1, vec!["axes".to_string()]);
    }
}
