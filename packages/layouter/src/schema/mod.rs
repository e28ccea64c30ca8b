//! Schema-driven specialization of GeoGebra elements.
//!
//! A [`SchemaDef`] declares one tag class: its element tag, default
//! attributes and named child roles. Definitions are registered once in a
//! [`SchemaRegistry`]; the [`Specializer`] then turns a generic
//! [`TagNode`](crate::xml::TagNode) tree into [`TypedObject`]s whose
//! attributes and role children are reachable by logical name.

mod config;
mod core;
mod engine;
mod object;
mod types;

pub use config::{create_geogebra_registry, ggb_registry};
pub use core::SchemaRegistry;
pub use engine::Specializer;
pub use object::{Field, FieldValue, TypedObject};
pub use types::{Role, Schema, SchemaDef, SchemaId, Variant};
