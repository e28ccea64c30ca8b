//! Schema registry mapping tags and discriminators to schemas.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use super::object::TypedObject;
use super::types::{Role, Schema, SchemaDef, SchemaId, Variant};
use crate::error::{LayoutError, Result};
use crate::xml::TagNode;

/// Key for discriminator lookup: tag, attribute name, attribute value.
type DiscriminatorKey = (String, String, String);

fn duplicate_name(name: &str) -> LayoutError {
    LayoutError::MalformedValue(format!("schema '{name}' registered twice"))
}

/// Registry of schemas, populated once and then only read.
///
/// Schemas are resolved by a discriminator attribute first (scoped to the
/// tag the discriminated schema was declared with), then by tag.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: Vec<Arc<Schema>>,
    by_name: HashMap<String, SchemaId>,
    by_tag: HashMap<String, SchemaId>,
    by_discriminator: HashMap<DiscriminatorKey, SchemaId>,
    discriminator_attrs: HashMap<String, Vec<String>>,
}

impl SchemaRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema declaration.
    ///
    /// Parents and role targets must already be registered. Union variants
    /// are registered alongside the union.
    ///
    /// # Errors
    /// `UnknownSchema` for unresolved references, `DuplicateTag` when a second
    /// concrete schema claims a tag, `MalformedValue` for a duplicate name.
    pub fn register(&mut self, def: SchemaDef) -> Result<SchemaId> {
        if def.is_union() {
            return self.register_union(def);
        }
        let id = SchemaId(self.schemas.len());
        let schema = self.resolve_def(&def, id, id, None)?;
        self.claim(&schema)?;
        Ok(self.push(schema))
    }

    fn register_union(&mut self, def: SchemaDef) -> Result<SchemaId> {
        self.ensure_unnamed(&def.name)?;
        let base = self.schemas.len();
        let union_id = SchemaId(base + def.variants.len());

        // Nothing is stored until every variant resolves and the tag is free.
        let mut members: Vec<Schema> = Vec::with_capacity(def.variants.len());
        let mut variants = Vec::with_capacity(def.variants.len());
        for (offset, (variant_def, keys)) in def.variants.iter().enumerate() {
            if variant_def.name == def.name || members.iter().any(|m| m.name == variant_def.name) {
                return Err(duplicate_name(&variant_def.name));
            }
            let id = SchemaId(base + offset);
            members.push(self.resolve_def(variant_def, id, union_id, Some(&def.name))?);
            variants.push(Variant {
                schema: id,
                keys: keys.clone(),
            });
        }

        let schema = Schema {
            id: union_id,
            name: def.name.clone(),
            tag: def.tag.clone(),
            family: union_id,
            lineage: vec![def.name.clone()],
            attrs: IndexMap::new(),
            roles: Vec::new(),
            discriminator: None,
            document_root: false,
            variants,
        };
        self.claim(&schema)?;
        for member in members {
            self.push(member);
        }
        Ok(self.push(schema))
    }

    fn ensure_unnamed(&self, name: &str) -> Result<()> {
        if self.by_name.contains_key(name) {
            return Err(duplicate_name(name));
        }
        Ok(())
    }

    fn resolve_def(
        &self,
        def: &SchemaDef,
        id: SchemaId,
        family: SchemaId,
        union_name: Option<&str>,
    ) -> Result<Schema> {
        self.ensure_unnamed(&def.name)?;

        let mut lineage = vec![def.name.clone()];
        let mut attrs = IndexMap::new();
        let mut roles: Vec<Role> = Vec::new();

        if let Some(parent_name) = &def.parent {
            let parent = self
                .by_name(parent_name)
                .ok_or_else(|| LayoutError::UnknownSchema(parent_name.clone()))?;
            lineage.extend(parent.lineage.iter().cloned());
            attrs = parent.attrs.clone();
            roles = parent.roles.clone();
        }
        if let Some(union_name) = union_name {
            lineage.push(union_name.to_string());
        }

        // Stored in the form a reparse of the written default would produce.
        for (name, default) in &def.attrs {
            attrs.insert(name.clone(), default.canonical());
        }

        for (role_name, target_name) in &def.roles {
            let target = self
                .by_name(target_name)
                .ok_or_else(|| LayoutError::UnknownSchema(target_name.clone()))?;
            let role = Role {
                name: role_name.clone(),
                schema: target.id,
                family: target.family,
            };
            match roles.iter_mut().find(|r| r.name == *role_name) {
                Some(existing) => *existing = role,
                None => roles.push(role),
            }
        }

        Ok(Schema {
            id,
            name: def.name.clone(),
            tag: def.tag.clone(),
            family,
            lineage,
            attrs,
            roles,
            discriminator: def.discriminator.clone(),
            document_root: def.document_root,
            variants: Vec::new(),
        })
    }

    /// Record tag or discriminator ownership for a top-level schema.
    fn claim(&mut self, schema: &Schema) -> Result<()> {
        if let Some((attr, value)) = &schema.discriminator {
            self.by_discriminator
                .insert((schema.tag.clone(), attr.clone(), value.clone()), schema.id);
            let attrs = self.discriminator_attrs.entry(schema.tag.clone()).or_default();
            if !attrs.contains(attr) {
                attrs.push(attr.clone());
            }
            return Ok(());
        }

        if let Some(existing) = self.by_tag.get(&schema.tag) {
            return Err(LayoutError::DuplicateTag {
                tag: schema.tag.clone(),
                existing: self.schemas[existing.0].name.clone(),
                new: schema.name.clone(),
            });
        }
        self.by_tag.insert(schema.tag.clone(), schema.id);
        Ok(())
    }

    fn push(&mut self, schema: Schema) -> SchemaId {
        let id = schema.id;
        debug_assert_eq!(id.0, self.schemas.len());
        self.by_name.insert(schema.name.clone(), id);
        self.schemas.push(Arc::new(schema));
        id
    }

    /// Get a schema by a handle this registry issued.
    #[must_use]
    pub(crate) fn get(&self, id: SchemaId) -> &Arc<Schema> {
        &self.schemas[id.0]
    }

    /// Get a schema by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Arc<Schema>> {
        self.by_name.get(name).map(|id| self.get(*id))
    }

    /// Get the schema registered for a tag (without discriminator dispatch).
    #[must_use]
    pub fn by_tag(&self, tag: &str) -> Option<&Arc<Schema>> {
        self.by_tag.get(tag).map(|id| self.get(*id))
    }

    /// Check if a schema claims a tag, directly or through a discriminator.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag) || self.discriminator_attrs.contains_key(tag)
    }

    /// Iterate over every schema in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.iter()
    }

    /// Number of registered schemas, union variants included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Pick the concrete schema for a generic node.
    ///
    /// Discriminator match wins over the plain tag; a union is narrowed to the
    /// first variant whose keys appear on the node, else its first variant.
    #[must_use]
    pub fn resolve(&self, node: &TagNode) -> Option<&Arc<Schema>> {
        let discriminated = self.discriminator_attrs.get(&node.tag).and_then(|attrs| {
            attrs.iter().find_map(|attr| {
                let value = node.attribute(attr)?.trim();
                self.by_discriminator
                    .get(&(node.tag.clone(), attr.clone(), value.to_string()))
            })
        });

        let schema = match discriminated {
            Some(id) => self.get(*id),
            None => self.by_tag(&node.tag)?,
        };
        Some(self.narrow(schema, |key| node.has_attribute(key)))
    }

    fn narrow<'a>(&'a self, schema: &'a Arc<Schema>, present: impl Fn(&str) -> bool) -> &'a Arc<Schema> {
        if !schema.is_union() {
            return schema;
        }
        let chosen = schema
            .variants
            .iter()
            .find(|variant| variant.keys.iter().any(|key| present(key.as_str())))
            .or_else(|| schema.variants.first());
        chosen.map_or(schema, |variant| self.get(variant.schema))
    }

    /// Build a default-shaped object of the named schema.
    ///
    /// Attributes are seeded from defaults and every role gets a
    /// default-shaped placeholder, recursively.
    ///
    /// # Errors
    /// `UnknownSchema` if the name is not registered.
    pub fn instantiate(&self, name: &str) -> Result<TypedObject> {
        let schema = self
            .by_name(name)
            .ok_or_else(|| LayoutError::UnknownSchema(name.to_string()))?;
        Ok(self.default_shaped(schema.id))
    }

    /// Role targets are always registered before the schema naming them, so
    /// the recursion follows strictly decreasing ids and terminates.
    pub(crate) fn default_shaped(&self, id: SchemaId) -> TypedObject {
        let schema = self.narrow(self.get(id), |_| false);
        let children = schema
            .roles
            .iter()
            .map(|role| self.default_shaped(role.schema))
            .collect();

        TypedObject::from_parts(Arc::clone(schema), schema.attrs.clone(), children, None)
    }
}
