//! XML reading, the generic element tree, and serialization.

mod node;
mod utils;

pub use node::{TagNode, XmlElement};
pub use utils::{
    collect_attributes, element_children, escape_attribute, escape_text, leading_text,
    qualified_tag_name,
};
