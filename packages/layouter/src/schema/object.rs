//! Schema-backed element objects and the attribute/child accessor protocol.

use std::borrow::Cow;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

use indexmap::IndexMap;

use super::types::{Role, Schema};
use crate::error::{LayoutError, Result};
use crate::value::{decode, AttributeValue};
use crate::xml::XmlElement;

/// What a logical name resolves to on a [`TypedObject`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    /// A declared attribute.
    Attr(&'a AttributeValue),
    /// The child occupying a declared role.
    Child(&'a TypedObject),
}

/// A value assigned through [`TypedObject::set`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// New attribute value.
    Attr(AttributeValue),
    /// Replacement child for a role.
    Child(TypedObject),
}

impl From<AttributeValue> for FieldValue {
    fn from(value: AttributeValue) -> Self {
        Self::Attr(value)
    }
}

impl From<TypedObject> for FieldValue {
    fn from(child: TypedObject) -> Self {
        Self::Child(child)
    }
}

/// One element specialized against its schema.
///
/// Owns its children exclusively; the schema is shared.
#[derive(Debug, Clone)]
pub struct TypedObject {
    schema: Arc<Schema>,
    attrs: IndexMap<String, AttributeValue>,
    children: Vec<TypedObject>,
    content: Option<String>,
}

impl TypedObject {
    pub(crate) fn from_parts(
        schema: Arc<Schema>,
        attrs: IndexMap<String, AttributeValue>,
        children: Vec<TypedObject>,
        content: Option<String>,
    ) -> Self {
        Self {
            schema,
            attrs,
            children,
            content,
        }
    }

    /// The backing schema.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Element tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.schema.tag()
    }

    /// Schema name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.schema.name()
    }

    /// Instance-of test along the schema lineage.
    #[must_use]
    pub fn is_a(&self, name: &str) -> bool {
        self.schema.is_a(name)
    }

    /// All attributes in output order.
    #[must_use]
    pub fn attrs(&self) -> &IndexMap<String, AttributeValue> {
        &self.attrs
    }

    /// Whether `name` is a known attribute (declared or supplied by the source).
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Whether `name` is a declared child role.
    #[must_use]
    pub fn has_role(&self, name: &str) -> bool {
        self.schema.role(name).is_some()
    }

    fn unknown(&self, name: &str) -> LayoutError {
        LayoutError::UnknownAttribute {
            tag: self.tag().to_string(),
            name: name.to_string(),
        }
    }

    /// Read an attribute.
    ///
    /// # Errors
    /// Returns `UnknownAttribute` if `name` is outside the known attribute set.
    pub fn attr(&self, name: &str) -> Result<&AttributeValue> {
        self.attrs.get(name).ok_or_else(|| self.unknown(name))
    }

    /// Overwrite an attribute.
    ///
    /// # Errors
    /// Returns `UnknownAttribute` if `name` is outside the known attribute set.
    pub fn set_attr(&mut self, name: &str, value: impl Into<AttributeValue>) -> Result<()> {
        if !self.attrs.contains_key(name) {
            return Err(self.unknown(name));
        }
        self.attrs.insert(name.to_string(), value.into());
        Ok(())
    }

    fn role_def(&self, name: &str) -> Result<Role> {
        self.schema
            .role(name)
            .cloned()
            .ok_or_else(|| self.unknown(name))
    }

    /// Position of the unique child occupying `role`.
    fn role_position(&self, role: &Role) -> Result<Option<usize>> {
        let mut matches = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| role.accepts(&child.schema))
            .map(|(i, _)| i);
        let first = matches.next();
        if matches.next().is_some() {
            return Err(LayoutError::AmbiguousChildRole {
                tag: self.tag().to_string(),
                role: role.name().to_string(),
            });
        }
        Ok(first)
    }

    /// Read the child occupying a declared role.
    ///
    /// # Errors
    /// `UnknownAttribute` for undeclared roles, `AmbiguousChildRole` when more
    /// than one child matches, `MissingChildRole` when none does.
    pub fn role(&self, name: &str) -> Result<&TypedObject> {
        let role = self.role_def(name)?;
        match self.role_position(&role)? {
            Some(i) => Ok(&self.children[i]),
            None => Err(self.missing_role(name)),
        }
    }

    /// Mutable access to the child occupying a declared role.
    ///
    /// # Errors
    /// Same as [`TypedObject::role`].
    pub fn role_mut(&mut self, name: &str) -> Result<&mut TypedObject> {
        let role = self.role_def(name)?;
        match self.role_position(&role)? {
            Some(i) => Ok(&mut self.children[i]),
            None => Err(self.missing_role(name)),
        }
    }

    fn missing_role(&self, name: &str) -> LayoutError {
        LayoutError::MissingChildRole {
            tag: self.tag().to_string(),
            role: name.to_string(),
        }
    }

    /// Replace the child occupying a role, keeping its position.
    ///
    /// If the role is currently empty the child is appended.
    ///
    /// # Errors
    /// `UnknownAttribute` for undeclared roles, `MalformedValue` if `child` is
    /// not of the role's class, `AmbiguousChildRole` on duplicate occupants.
    pub fn set_role(&mut self, name: &str, child: TypedObject) -> Result<()> {
        let role = self.role_def(name)?;
        if !role.accepts(&child.schema) {
            return Err(LayoutError::MalformedValue(format!(
                "<{}> cannot occupy role '{name}' on <{}>",
                child.tag(),
                self.tag()
            )));
        }
        match self.role_position(&role)? {
            Some(i) => self.children[i] = child,
            None => self.children.push(child),
        }
        Ok(())
    }

    /// Resolve a logical name to an attribute or role child.
    ///
    /// Attributes take precedence over roles of the same name.
    ///
    /// # Errors
    /// `UnknownAttribute` when the name is neither.
    pub fn get(&self, name: &str) -> Result<Field<'_>> {
        if let Some(value) = self.attrs.get(name) {
            return Ok(Field::Attr(value));
        }
        if self.has_role(name) {
            return self.role(name).map(Field::Child);
        }
        Err(self.unknown(name))
    }

    /// Assign through a logical name.
    ///
    /// # Errors
    /// `UnknownAttribute` when the name is neither an attribute nor a role,
    /// `MalformedValue` when the value kind does not match the name's kind.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        match value.into() {
            FieldValue::Attr(value) => {
                if !self.has_attr(name) && self.has_role(name) {
                    return Err(LayoutError::MalformedValue(format!(
                        "role '{name}' on <{}> needs an element, not an attribute value",
                        self.tag()
                    )));
                }
                self.set_attr(name, value)
            }
            FieldValue::Child(child) => {
                if self.has_attr(name) && !self.has_role(name) {
                    return Err(LayoutError::MalformedValue(format!(
                        "attribute '{name}' on <{}> needs a value, not an element",
                        self.tag()
                    )));
                }
                self.set_role(name, child)
            }
        }
    }

    /// Text content.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Children in document order.
    #[must_use]
    pub fn children(&self) -> &[TypedObject] {
        &self.children
    }

    /// Mutable children.
    pub fn children_mut(&mut self) -> &mut [TypedObject] {
        &mut self.children
    }

    /// Append a child.
    pub fn add_child(&mut self, child: TypedObject) {
        self.children.push(child);
    }

    /// Remove and return the child at `index`.
    pub fn remove_child(&mut self, index: usize) -> Option<TypedObject> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    /// Whether an equal child is present.
    #[must_use]
    pub fn contains(&self, child: &TypedObject) -> bool {
        self.children.contains(child)
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate over children.
    pub fn iter(&self) -> std::slice::Iter<'_, TypedObject> {
        self.children.iter()
    }

    /// Children that are instances of `class`.
    pub fn children_of<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a TypedObject> {
        self.children.iter().filter(move |child| child.is_a(class))
    }

    /// Mutable children that are instances of `class`.
    pub fn children_of_mut<'a>(
        &'a mut self,
        class: &'a str,
    ) -> impl Iterator<Item = &'a mut TypedObject> {
        self.children.iter_mut().filter(move |child| child.is_a(class))
    }

    /// Position of the first child that is an instance of `class`.
    #[must_use]
    pub fn position_of(&self, class: &str) -> Option<usize> {
        self.children.iter().position(|child| child.is_a(class))
    }
}

impl PartialEq for TypedObject {
    fn eq(&self, other: &Self) -> bool {
        self.schema.id() == other.schema.id()
            && self.attrs == other.attrs
            && self.children == other.children
            && self.content == other.content
    }
}

impl Index<usize> for TypedObject {
    type Output = TypedObject;

    fn index(&self, index: usize) -> &Self::Output {
        &self.children[index]
    }
}

impl IndexMut<usize> for TypedObject {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.children[index]
    }
}

impl<'a> IntoIterator for &'a TypedObject {
    type Item = &'a TypedObject;
    type IntoIter = std::slice::Iter<'a, TypedObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

impl XmlElement for TypedObject {
    type Child = TypedObject;

    fn tag(&self) -> &str {
        self.schema.tag()
    }

    fn attributes(&self) -> Vec<(&str, Cow<'_, str>)> {
        self.attrs
            .iter()
            .filter_map(|(name, value)| decode(value).map(|text| (name.as_str(), Cow::Owned(text))))
            .collect()
    }

    fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    fn child_elements(&self) -> &[TypedObject] {
        &self.children
    }

    fn is_document_root(&self) -> bool {
        self.schema.is_document_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseOptions;
    use crate::schema::{SchemaDef, SchemaRegistry, Specializer};
    use crate::xml::TagNode;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register(SchemaDef::new("Color").with_attr("r", 0).with_attr("g", 0).with_attr("b", 0))
            .unwrap();
        registry
            .register(SchemaDef::new("BGColor").with_tag("bgColor").extends("Color"))
            .unwrap();
        registry
            .register(SchemaDef::new("Caption").with_attr("val", "%n"))
            .unwrap();
        registry
            .register(
                SchemaDef::new("View")
                    .with_attr("id", 1)
                    .with_attr("caption", "overview")
                    .with_role("caption", "Caption")
                    .with_role("bgColor", "BGColor"),
            )
            .unwrap();
        registry
    }

    fn view(registry: &SchemaRegistry, xml: &str) -> TypedObject {
        let node = TagNode::parse(xml, &ParseOptions::default()).unwrap();
        Specializer::new(registry).specialize(&node).unwrap()
    }

    #[test]
    fn test_get_attribute_and_role() {
        let registry = registry();
        let obj = view(&registry, r#"<view id="2"><bgColor r="9"/></view>"#);

        assert_eq!(obj.get("id").unwrap(), Field::Attr(&AttributeValue::Integer(2)));
        match obj.get("bgColor").unwrap() {
            Field::Child(color) => assert_eq!(color.attr("r").unwrap(), &AttributeValue::Integer(9)),
            Field::Attr(_) => panic!("bgColor should resolve to a child"),
        }
        assert!(matches!(
            obj.get("nope"),
            Err(LayoutError::UnknownAttribute { ref name, .. }) if name == "nope"
        ));
    }

    #[test]
    fn test_attribute_shadows_role_of_same_name() {
        let registry = registry();
        let obj = view(&registry, "<view/>");
        assert!(matches!(obj.get("caption").unwrap(), Field::Attr(_)));
        assert_eq!(obj.role("caption").unwrap().class_name(), "Caption");
    }

    #[test]
    fn test_set_attribute() {
        let registry = registry();
        let mut obj = view(&registry, "<view/>");

        obj.set("id", AttributeValue::from(7)).unwrap();
        assert_eq!(obj.attr("id").unwrap(), &AttributeValue::Integer(7));

        obj.set_attr("id", "seven").unwrap();
        assert_eq!(obj.attr("id").unwrap().as_str(), Some("seven"));

        assert!(matches!(
            obj.set_attr("missing", 1),
            Err(LayoutError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_set_role_keeps_position() {
        let registry = registry();
        let mut obj = view(&registry, r#"<view><bgColor r="1"/><caption val="x"/></view>"#);

        let mut blue = registry.instantiate("BGColor").unwrap();
        blue.set_attr("b", 255).unwrap();
        obj.set("bgColor", blue).unwrap();

        assert_eq!(obj.len(), 2);
        assert_eq!(obj[0].class_name(), "BGColor");
        assert_eq!(obj[0].attr("b").unwrap(), &AttributeValue::Integer(255));
        assert_eq!(obj[1].class_name(), "Caption");
    }

    #[test]
    fn test_set_role_rejects_other_class() {
        let registry = registry();
        let mut obj = view(&registry, "<view/>");
        let plain = registry.instantiate("Color").unwrap();
        assert!(matches!(
            obj.set_role("bgColor", plain),
            Err(LayoutError::MalformedValue(_))
        ));
    }

    #[test]
    fn test_set_role_appends_when_removed() {
        let registry = registry();
        let mut obj = view(&registry, "<view/>");
        let index = obj.position_of("BGColor").unwrap();
        obj.remove_child(index).unwrap();

        assert!(matches!(
            obj.role("bgColor"),
            Err(LayoutError::MissingChildRole { .. })
        ));

        obj.set_role("bgColor", registry.instantiate("BGColor").unwrap())
            .unwrap();
        assert_eq!(obj.children().last().unwrap().class_name(), "BGColor");
    }

    #[test]
    fn test_duplicate_role_child_is_ambiguous() {
        let registry = registry();
        let mut obj = view(&registry, "<view/>");
        obj.add_child(registry.instantiate("Caption").unwrap());
        assert!(matches!(
            obj.role("caption"),
            Err(LayoutError::AmbiguousChildRole { .. })
        ));
    }

    #[test]
    fn test_children_of_follows_lineage() {
        let registry = registry();
        let obj = view(&registry, "<view/>");
        assert_eq!(obj.children_of("Color").count(), 1);
        assert_eq!(obj.children_of("BGColor").count(), 1);
        assert_eq!(obj.children_of("View").count(), 0);
        assert!(obj.contains(&registry.instantiate("Caption").unwrap()));
    }

    #[test]
    fn test_serializes_without_absent_attributes() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(SchemaDef::new("Font").with_attr("size", 16).with_unset(&["serif"]))
            .unwrap();
        let font = registry.instantiate("Font").unwrap();
        assert_eq!(font.xml_repr(), "<font size=\"16\"/>\n");
    }
}
