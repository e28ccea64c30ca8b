//! Specializer that turns generic nodes into schema-backed objects.

use std::sync::Arc;

use super::core::SchemaRegistry;
use super::object::TypedObject;
use crate::config::ParseOptions;
use crate::error::{LayoutError, Result};
use crate::value::encode;
use crate::xml::TagNode;

/// Engine that specializes a whole [`TagNode`] tree against a registry.
///
/// Every node must resolve to a schema; otherwise `UnknownTag` is raised
/// with the parent element as context.
pub struct Specializer<'r> {
    registry: &'r SchemaRegistry,
    options: ParseOptions,
}

impl<'r> Specializer<'r> {
    /// Create a new specializer with default options.
    #[must_use]
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            options: ParseOptions::default(),
        }
    }

    /// Set the processing options.
    #[must_use]
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Specialize a node and its whole subtree.
    ///
    /// Attributes are seeded from schema defaults and overlaid with the
    /// node's own (defaults keep their position, extra source attributes
    /// follow in source order). Children keep source order; each declared
    /// role left empty by the source gets a default-shaped placeholder,
    /// appended in role order.
    ///
    /// # Errors
    /// `UnknownTag` for unresolvable elements, `AmbiguousChildRole` when two
    /// children fill one role, `DepthLimitExceeded` when the source nests
    /// deeper than the ceiling (placeholders do not count).
    pub fn specialize(&self, node: &TagNode) -> Result<TypedObject> {
        self.specialize_at(node, None, 1)
    }

    fn specialize_at(&self, node: &TagNode, parent: Option<&str>, depth: usize) -> Result<TypedObject> {
        let max_depth = self.options.max_depth;
        if depth > max_depth {
            return Err(LayoutError::DepthLimitExceeded {
                limit: max_depth,
                tag: node.tag.clone(),
            });
        }

        let schema = self
            .registry
            .resolve(node)
            .ok_or_else(|| LayoutError::UnknownTag {
                tag: node.tag.clone(),
                context: parent.map(|p| format!("<{p}>")),
            })?;

        let mut attrs = schema.defaults().clone();
        for (name, raw) in &node.attributes {
            attrs.insert(name.clone(), encode(raw));
        }

        let roles = schema.roles();
        let mut filled = vec![false; roles.len()];
        let mut children = Vec::with_capacity(node.children.len() + roles.len());

        for child_node in &node.children {
            let child = self.specialize_at(child_node, Some(&node.tag), depth + 1)?;
            if let Some(index) = schema.role_index_for(child.schema()) {
                if filled[index] {
                    return Err(LayoutError::AmbiguousChildRole {
                        tag: node.tag.clone(),
                        role: roles[index].name().to_string(),
                    });
                }
                filled[index] = true;
            }
            children.push(child);
        }

        for (role, _) in roles.iter().zip(&filled).filter(|(_, filled)| !**filled) {
            tracing::trace!(tag = %node.tag, role = role.name(), "seeding default child");
            children.push(self.registry.default_shaped(role.schema()));
        }

        Ok(TypedObject::from_parts(
            Arc::clone(schema),
            attrs,
            children,
            node.text.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaDef;
    use crate::value::AttributeValue;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register(SchemaDef::new("Caption").with_attr("val", "%n"))
            .unwrap();
        registry
            .register(SchemaDef::new("Coords").with_attr("x", 0).with_attr("y", 0).with_unset(&["z"]))
            .unwrap();
        registry
            .register(
                SchemaDef::new("Element")
                    .with_attr("label", "")
                    .with_attr("type", "element")
                    .with_role("caption", "Caption")
                    .with_role("coords", "Coords"),
            )
            .unwrap();
        registry
            .register(SchemaDef::new("Construction").with_attr("title", ""))
            .unwrap();
        registry
    }

    fn specialize(xml: &str) -> Result<TypedObject> {
        let registry = registry();
        let node = TagNode::parse(xml, &ParseOptions::default())?;
        Specializer::new(&registry).specialize(&node)
    }

    #[test]
    fn test_attribute_defaulting() {
        let obj = specialize(r#"<element label="A"><coords x="1.5"/></element>"#).unwrap();

        assert_eq!(obj.attr("label").unwrap(), &AttributeValue::String("A".into()));
        assert_eq!(obj.attr("type").unwrap(), &AttributeValue::String("element".into()));

        let coords = obj.role("coords").unwrap();
        assert_eq!(coords.attr("x").unwrap(), &AttributeValue::Float(1.5));
        assert_eq!(coords.attr("y").unwrap(), &AttributeValue::Integer(0));
        assert!(coords.attr("z").unwrap().is_absent());
    }

    #[test]
    fn test_role_completeness() {
        let obj = specialize(r#"<element label="A"/>"#).unwrap();
        let caption = obj.role("caption").unwrap();
        assert_eq!(caption.attr("val").unwrap(), &AttributeValue::String("%n".into()));
        assert!(obj.role("coords").is_ok());
    }

    #[test]
    fn test_children_keep_source_order() {
        let obj = specialize(r#"<construction><element label="B"/><element label="A"/></construction>"#)
            .unwrap();
        let labels: Vec<String> = obj
            .iter()
            .map(|el| el.attr("label").unwrap().to_string())
            .collect();
        assert_eq!(labels, vec!["B", "A"]);
    }

    #[test]
    fn test_placeholders_follow_source_children() {
        let obj = specialize(r#"<element><coords x="2"/></element>"#).unwrap();
        let classes: Vec<&str> = obj.iter().map(TypedObject::class_name).collect();
        assert_eq!(classes, vec!["Coords", "Caption"]);
    }

    #[test]
    fn test_source_attributes_after_defaults() {
        let obj = specialize(r#"<element extra="1" label="A"/>"#).unwrap();
        let keys: Vec<&str> = obj.attrs().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["label", "type", "extra"]);
        assert_eq!(obj.attr("extra").unwrap(), &AttributeValue::Integer(1));
    }

    #[test]
    fn test_ambiguous_child_role() {
        let err = specialize(r#"<element><caption val="a"/><caption val="b"/></element>"#)
            .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::AmbiguousChildRole { ref role, .. } if role == "caption"
        ));
    }

    #[test]
    fn test_unknown_tag_names_parent() {
        let err = specialize(r#"<construction><mystery/></construction>"#).unwrap_err();
        assert_eq!(err.to_string(), "No schema for element <mystery> in <construction>");
    }

    #[test]
    fn test_depth_limit() {
        let registry = registry();
        let node = TagNode::parse(r#"<element><coords/></element>"#, &ParseOptions::default()).unwrap();
        let specializer =
            Specializer::new(&registry).with_options(ParseOptions::default().with_max_depth(1));
        assert!(matches!(
            specializer.specialize(&node),
            Err(LayoutError::DepthLimitExceeded { limit: 1, .. })
        ));
    }

    #[test]
    fn test_placeholders_not_counted_in_depth() {
        let registry = registry();
        let node = TagNode::parse(r#"<construction><element/></construction>"#, &ParseOptions::default())
            .unwrap();
        let specializer =
            Specializer::new(&registry).with_options(ParseOptions::default().with_max_depth(2));
        let obj = specializer.specialize(&node).unwrap();
        assert_eq!(obj[0].role("caption").unwrap().tag(), "caption");
    }

    #[test]
    fn test_text_content_preserved() {
        let obj = specialize(r#"<caption val="x">some text</caption>"#).unwrap();
        assert_eq!(obj.content(), Some("some text"));
    }
}
