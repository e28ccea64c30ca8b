//! Layout configuration and the document styling pass.
//!
//! A [`LayoutConfig`] is read from JSON and applied to a
//! [`GeoGebraDocument`] in four steps: background colour, caption style,
//! hidden-line style and axis style.

mod color;
mod config;
mod document;
mod styling;
mod tex;

pub use color::{parse_color, Rgb};
pub use config::LayoutConfig;
pub use document::{view_axes, view_axis, GeoGebraDocument, ROOT_SCHEMA};
pub use styling::{hidden_line_style, LayoutReport, HIDDEN_UNCHANGED};
pub use tex::{strip_tex, strip_tex_cmd, wrap_tex};
