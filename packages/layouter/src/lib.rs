//! GeoGebra Layouter - Apply a JSON layout to GeoGebra documents.
//!
//! This crate reads the `geogebra.xml` of a GeoGebra file, specializes every
//! element against a curated schema table, restyles it from a JSON layout
//! (background colour, captions, hidden lines, axes) and writes it back.
//!
//! # Example
//!
//! ```
//! use ggb_layouter::{GeoGebraDocument, LayoutConfig};
//!
//! let xml = r#"<geogebra format="5.0"><euclidianView/><construction/></geogebra>"#;
//! let mut doc = GeoGebraDocument::parse(xml).unwrap();
//!
//! let layout = LayoutConfig::parse(r#"{
//!     "background_color": [0, 0, 255],
//!     "color_palette": {},
//!     "default_caption_style": {"tex": false, "bold": false},
//!     "line_style": {"hidden_style": "dotted"},
//!     "axes": {"show": true, "show_ticks": false, "show_numbers": true,
//!              "positive_axis_only": false, "color": [0, 0, 0]}
//! }"#).unwrap();
//!
//! let report = doc.apply_layout(&layout).unwrap();
//! assert_eq!(report.background_views, 2);
//! assert!(doc.xml_repr().contains(r#"<bgColor r="0" g="0" b="255"/>"#));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants and validation
//! - [`error`]: Error types and Result alias
//! - [`value`]: Typed attribute values and the text codec
//! - [`xml`]: XML reading, generic element tree and serialization
//! - [`schema`]: Schema registry, specializer and typed objects
//! - [`layout`]: Layout configuration and the styling pass
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod schema;
pub mod value;
pub mod xml;

// Re-export commonly used items
pub use error::{LayoutError, Result};
pub use layout::{GeoGebraDocument, LayoutConfig, LayoutReport};
pub use schema::{ggb_registry, SchemaRegistry, TypedObject};
pub use value::AttributeValue;
