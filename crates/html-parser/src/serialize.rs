//! Serialization of the tree back to markup.
//!
//! Text content is emitted verbatim; the serializer normalizes only tag
//! shape (attribute quoting, synthesized closing tags for recovered trees).

use crate::ast::{AttributeValue, Document, Element, Node};
use crate::is_void_element;

impl Document {
    /// Serializes the whole document back to markup.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            write_node(node, &mut out);
        }
        out
    }
}

impl Element {
    /// Serializes this element, including its own tags.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(el) => write_element(el, out),
        Node::Text(t) => out.push_str(&t.content),
        Node::Comment(c) => {
            out.push_str("<!--");
            out.push_str(&c.content);
            out.push_str("-->");
        }
        Node::Doctype(d) => {
            out.push_str("<!");
            out.push_str(&d.content);
            out.push('>');
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);

    for attr in &el.attributes {
        out.push(' ');
        out.push_str(&attr.name);
        if let AttributeValue::Text(value) = &attr.value {
            out.push_str("=\"");
            // Values are stored raw; only the quote needs escaping.
            out.push_str(&value.value.replace('"', "&quot;"));
            out.push('"');
        }
    }

    if is_void_element(&el.name) {
        out.push('>');
        return;
    }

    if el.self_closing && el.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &el.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}
