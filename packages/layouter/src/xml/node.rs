//! Generic element tree and the serialization shared by all element types.

use std::borrow::Cow;

use roxmltree::{Document, Node};

use super::utils::{collect_attributes, element_children, escape_attribute, escape_text, leading_text, qualified_tag_name};
use crate::config::{ParseOptions, INDENT_UNIT, XML_DECLARATION};
use crate::error::{LayoutError, Result};

/// Anything that can be written out as an XML element.
///
/// Output layout:
/// - `<tag a="v"/>` when there are no children and no text,
/// - `<tag a="v">text</tag>` when there is text but no children,
/// - a block with one indent level per depth otherwise, text on its own line.
pub trait XmlElement {
    /// Child element type.
    type Child: XmlElement;

    /// Tag name, including any namespace prefix.
    fn tag(&self) -> &str;

    /// Attribute names and rendered (unescaped) values, in output order.
    ///
    /// Attributes without a value are left out.
    fn attributes(&self) -> Vec<(&str, Cow<'_, str>)>;

    /// Text content, if any.
    fn content(&self) -> Option<&str>;

    /// Child elements in document order.
    fn child_elements(&self) -> &[Self::Child];

    /// Whether this element is the document root (gets an XML declaration).
    fn is_document_root(&self) -> bool {
        false
    }

    /// Render the opening tag body: name plus escaped attributes.
    fn attr_repr(&self) -> String {
        let mut out = String::from(self.tag());
        for (name, value) in self.attributes() {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attribute(&value));
            out.push('"');
        }
        out
    }

    /// Serialize this element and its subtree at the given indent level.
    fn indented_xml_repr(&self, indent: usize) -> String {
        let mut out = String::new();
        write_indented(self, indent, &mut out);
        out
    }

    /// Serialize as a complete document fragment.
    ///
    /// Document roots are prefixed with the XML declaration.
    fn xml_repr(&self) -> String {
        let body = self.indented_xml_repr(0);
        if self.is_document_root() {
            format!("{XML_DECLARATION}\n{body}")
        } else {
            body
        }
    }
}

fn write_indented<E: XmlElement + ?Sized>(element: &E, indent: usize, out: &mut String) {
    let pad = INDENT_UNIT.repeat(indent);
    let children = element.child_elements();
    let content = element.content();

    out.push_str(&pad);
    out.push('<');
    out.push_str(&element.attr_repr());

    if children.is_empty() {
        match content {
            None => out.push_str("/>\n"),
            Some(text) => {
                out.push('>');
                out.push_str(&escape_text(text));
                out.push_str("</");
                out.push_str(element.tag());
                out.push_str(">\n");
            }
        }
        return;
    }

    out.push_str(">\n");
    if let Some(text) = content.filter(|t| !t.is_empty()) {
        out.push_str(&pad);
        out.push_str(&escape_text(text));
        out.push('\n');
    }
    for child in children {
        write_indented(child, indent + 1, out);
    }
    out.push_str(&pad);
    out.push_str("</");
    out.push_str(element.tag());
    out.push_str(">\n");
}

/// One parsed XML element before it is specialized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagNode {
    /// Tag name, including any namespace prefix.
    pub tag: String,
    /// Raw attribute text in document order.
    pub attributes: Vec<(String, String)>,
    /// Trimmed leading text, `None` when blank.
    pub text: Option<String>,
    /// Child elements in document order.
    pub children: Vec<TagNode>,
}

impl TagNode {
    /// Create an empty node with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child.
    #[must_use]
    pub fn with_child(mut self, child: TagNode) -> Self {
        self.children.push(child);
        self
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Look up a raw attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the attribute is present.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Parse an XML document into a node tree.
    ///
    /// # Errors
    /// Returns `XmlParse` for malformed XML and `DepthLimitExceeded` when the
    /// document nests deeper than `options.max_depth`.
    pub fn parse(xml: &str, options: &ParseOptions) -> Result<Self> {
        let doc = Document::parse(xml)?;
        Self::from_node(doc.root_element(), 1, options.max_depth)
    }

    fn from_node(node: Node<'_, '_>, depth: usize, max_depth: usize) -> Result<Self> {
        let tag = qualified_tag_name(node);
        if depth > max_depth {
            return Err(LayoutError::DepthLimitExceeded {
                limit: max_depth,
                tag,
            });
        }

        let children = element_children(node)
            .map(|child| Self::from_node(child, depth + 1, max_depth))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            tag,
            attributes: collect_attributes(node),
            text: leading_text(node),
            children,
        })
    }
}

impl XmlElement for TagNode {
    type Child = TagNode;

    fn tag(&self) -> &str {
        &self.tag
    }

    fn attributes(&self) -> Vec<(&str, Cow<'_, str>)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), Cow::Borrowed(value.as_str())))
            .collect()
    }

    fn content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn child_elements(&self) -> &[TagNode] {
        &self.children
    }
}
