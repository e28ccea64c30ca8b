//! XML utility functions for reading roxmltree nodes and escaping output.

use roxmltree::Node;

/// Namespace URI bound to the reserved `xml` prefix.
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Get the tag name as written in the source, including any prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use ggb_layouter::xml::qualified_tag_name;
///
/// let xml = r#"<a:root xmlns:a="urn:a"><child/></a:root>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(qualified_tag_name(doc.root_element()), "a:root");
/// ```
pub fn qualified_tag_name(node: Node<'_, '_>) -> String {
    let tag = node.tag_name();
    match tag.namespace().and_then(|uri| prefix_for(node, uri)) {
        Some(prefix) => format!("{prefix}:{}", tag.name()),
        None => tag.name().to_string(),
    }
}

/// Collect the attributes of an element in document order.
///
/// Namespace declarations made on this element come first, written as
/// `xmlns` / `xmlns:prefix` attributes, so they survive a round trip.
/// Prefixed attributes keep their `prefix:name` form.
pub fn collect_attributes(node: Node<'_, '_>) -> Vec<(String, String)> {
    let mut attributes: Vec<(String, String)> = declared_namespaces(node)
        .into_iter()
        .map(|(prefix, uri)| match prefix {
            Some(prefix) => (format!("xmlns:{prefix}"), uri),
            None => ("xmlns".to_string(), uri),
        })
        .collect();

    for attr in node.attributes() {
        let name = match attr.namespace().and_then(|uri| prefix_for(node, uri)) {
            Some(prefix) => format!("{prefix}:{}", attr.name()),
            None => attr.name().to_string(),
        };
        attributes.push((name, attr.value().to_string()));
    }

    attributes
}

/// Namespaces declared on this element rather than inherited from its parent.
fn declared_namespaces(node: Node<'_, '_>) -> Vec<(Option<String>, String)> {
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();

    node.namespaces()
        .filter(|ns| ns.uri() != XML_NAMESPACE)
        .filter(|ns| !inherited.contains(&(ns.name(), ns.uri())))
        .map(|ns| (ns.name().map(String::from), ns.uri().to_string()))
        .collect()
}

fn prefix_for<'a>(node: Node<'a, '_>, uri: &str) -> Option<&'a str> {
    node.lookup_prefix(uri).filter(|prefix| !prefix.is_empty())
}

/// Get the element's leading text, trimmed; `None` when blank.
pub fn leading_text(node: Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(String::from)
}

/// Get all element children of a node.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Escape a string for use inside a double-quoted attribute value.
///
/// # Examples
/// ```
/// use ggb_layouter::xml::escape_attribute;
///
/// assert_eq!(escape_attribute("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
/// assert_eq!(escape_attribute("line\nbreak"), "line&#xa;break");
/// ```
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#xa;"),
            '\r' => escaped.push_str("&#xd;"),
            '\t' => escaped.push_str("&#x9;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape a string for use as element text content.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_qualified_tag_name_plain() {
        let doc = Document::parse("<root><child/></root>").unwrap();
        assert_eq!(qualified_tag_name(doc.root_element()), "root");
    }

    #[test]
    fn test_collect_attributes_keeps_order() {
        let doc = Document::parse(r#"<root b="2" a="1"/>"#).unwrap();
        let attrs = collect_attributes(doc.root_element());
        assert_eq!(
            attrs,
            vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string())
            ]
        );
    }

    #[test]
    fn test_collect_attributes_namespaces() {
        let xml = r#"<geogebra format="5.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:noNamespaceSchemaLocation="http://www.geogebra.org/apps/xsd/ggb.xsd"><kernel/></geogebra>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();
        let attrs = collect_attributes(root);

        assert_eq!(attrs[0].0, "xmlns:xsi");
        assert!(attrs.iter().any(|(k, _)| k == "xsi:noNamespaceSchemaLocation"));
        assert!(attrs.iter().any(|(k, v)| k == "format" && v == "5.0"));

        // Child inherits the declaration and does not repeat it.
        let kernel = root.first_element_child().unwrap();
        assert!(collect_attributes(kernel).is_empty());
    }

    #[test]
    fn test_leading_text() {
        let doc = Document::parse("<a>  text  <b/></a>").unwrap();
        assert_eq!(leading_text(doc.root_element()).as_deref(), Some("text"));

        let doc = Document::parse("<a>\n    <b/></a>").unwrap();
        assert_eq!(leading_text(doc.root_element()), None);
    }

    #[test]
    fn test_element_children() {
        let doc = Document::parse("<root>text<child1/>more<child2/></root>").unwrap();
        assert_eq!(element_children(doc.root_element()).count(), 2);
    }

    #[test]
    fn test_escape_attribute_all_specials() {
        assert_eq!(escape_attribute("'x'"), "&apos;x&apos;");
        assert_eq!(escape_attribute("a>b"), "a&gt;b");
        assert_eq!(escape_attribute("plain"), "plain");
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b && c"), "a &lt; b &amp;&amp; c");
        assert_eq!(escape_text("\"quoted\""), "\"quoted\"");
    }
}
