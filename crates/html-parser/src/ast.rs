//! Tree types for parsed HTML documents.

use smol_str::SmolStr;
use source_map::Span;

/// A parsed HTML document: a sequence of top-level nodes.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// The top-level nodes in document order.
    pub nodes: Vec<Node>,
    /// The span of the entire document.
    pub span: Span,
}

/// A node in the tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// An element with a tag, attributes and children.
    Element(Element),
    /// A run of character data.
    Text(Text),
    /// A `<!-- -->` comment.
    Comment(Comment),
    /// A `<!DOCTYPE>` or other markup declaration.
    Doctype(Doctype),
}

impl Node {
    /// Returns the span of this node.
    pub fn span(&self) -> Span {
        match self {
            Node::Element(el) => el.span,
            Node::Text(t) => t.span,
            Node::Comment(c) => c.span,
            Node::Doctype(d) => d.span,
        }
    }
}

/// An element node.
#[derive(Debug, Clone)]
pub struct Element {
    /// The span of the whole element, including its tags.
    pub span: Span,
    /// The lowercased tag name.
    pub name: SmolStr,
    /// Attributes in source order, names lowercased.
    pub attributes: Vec<Attribute>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
    /// Whether the start tag ended with `/>`.
    pub self_closing: bool,
    /// The span of the start tag, `<` through `>`.
    pub start_tag_span: Span,
    /// The span of the end tag, if one was present in the source.
    pub end_tag_span: Option<Span>,
}

impl Element {
    /// Returns the value of the named attribute, if present.
    ///
    /// Boolean attributes yield an empty string.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| match &a.value {
                AttributeValue::Text(t) => t.value.as_str(),
                AttributeValue::True => "",
            })
    }

    /// Returns the verbatim text of this element's first text child.
    ///
    /// This is the inline content of raw-text elements like `<script>`.
    pub fn inline_text(&self) -> Option<&str> {
        self.children.iter().find_map(|node| match node {
            Node::Text(t) => Some(t.content.as_str()),
            _ => None,
        })
    }

    /// Returns the span of this element's first text child.
    pub fn inline_text_span(&self) -> Option<Span> {
        self.children.iter().find_map(|node| match node {
            Node::Text(t) => Some(t.span),
            _ => None,
        })
    }
}

/// An attribute on an element.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// The span of the whole attribute.
    pub span: Span,
    /// The lowercased attribute name.
    pub name: SmolStr,
    /// The attribute value.
    pub value: AttributeValue,
}

/// An attribute value.
#[derive(Debug, Clone)]
pub enum AttributeValue {
    /// A textual value, quoted or unquoted in the source.
    Text(TextValue),
    /// A boolean attribute with no value.
    True,
}

/// A textual attribute value with its span.
#[derive(Debug, Clone)]
pub struct TextValue {
    /// The span of the value text (excluding quotes).
    pub span: Span,
    /// The raw value text.
    pub value: String,
}

/// A text node.
#[derive(Debug, Clone)]
pub struct Text {
    /// The span of the text.
    pub span: Span,
    /// The verbatim text content.
    pub content: String,
}

/// A comment node.
#[derive(Debug, Clone)]
pub struct Comment {
    /// The span including the comment delimiters.
    pub span: Span,
    /// The text between `<!--` and `-->`.
    pub content: String,
}

/// A doctype or other `<!...>` markup declaration.
#[derive(Debug, Clone)]
pub struct Doctype {
    /// The span including the delimiters.
    pub span: Span,
    /// The text between `<!` and `>`.
    pub content: String,
}

/// The parent of a matched element: either another element or the document
/// root itself.
#[derive(Debug, Clone, Copy)]
pub enum ParentRef<'a> {
    /// The element sits at the top level of the document.
    Document,
    /// The element is a child of this element.
    Element(&'a Element),
}

impl Document {
    /// Returns all elements matching the predicate, in document order
    /// (pre-order traversal).
    pub fn query_elements<F>(&self, pred: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        let mut out = Vec::new();
        collect_elements(&self.nodes, &pred, &mut out);
        out
    }

    /// Returns the first element matching the predicate, in document order.
    pub fn first_element<F>(&self, pred: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        first_element_in(&self.nodes, &pred)
    }

    /// Removes every element matching the predicate from the tree.
    ///
    /// Matching elements are removed wholesale; their descendants are not
    /// visited.
    pub fn remove_elements<F>(&mut self, pred: F)
    where
        F: Fn(&Element) -> bool,
    {
        remove_elements_in(&mut self.nodes, &pred);
    }

    /// Returns the parent of the first element (in document order) matching
    /// the predicate, or `None` if no element matches.
    pub fn parent_of_first<F>(&self, pred: F) -> Option<ParentRef<'_>>
    where
        F: Fn(&Element) -> bool,
    {
        fn walk<'a, F>(nodes: &'a [Node], parent: Option<&'a Element>, pred: &F) -> Option<Option<&'a Element>>
        where
            F: Fn(&Element) -> bool,
        {
            for node in nodes {
                if let Node::Element(el) = node {
                    if pred(el) {
                        return Some(parent);
                    }
                    if let Some(found) = walk(&el.children, Some(el), pred) {
                        return Some(found);
                    }
                }
            }
            None
        }

        walk(&self.nodes, None, &pred).map(|parent| match parent {
            Some(el) => ParentRef::Element(el),
            None => ParentRef::Document,
        })
    }
}

fn collect_elements<'a, F>(nodes: &'a [Node], pred: &F, out: &mut Vec<&'a Element>)
where
    F: Fn(&Element) -> bool,
{
    for node in nodes {
        if let Node::Element(el) = node {
            if pred(el) {
                out.push(el);
            }
            collect_elements(&el.children, pred, out);
        }
    }
}

fn first_element_in<'a, F>(nodes: &'a [Node], pred: &F) -> Option<&'a Element>
where
    F: Fn(&Element) -> bool,
{
    for node in nodes {
        if let Node::Element(el) = node {
            if pred(el) {
                return Some(el);
            }
            if let Some(found) = first_element_in(&el.children, pred) {
                return Some(found);
            }
        }
    }
    None
}

fn remove_elements_in<F>(nodes: &mut Vec<Node>, pred: &F)
where
    F: Fn(&Element) -> bool,
{
    nodes.retain(|node| !matches!(node, Node::Element(el) if pred(el)));
    for node in nodes {
        if let Node::Element(el) = node {
            remove_elements_in(&mut el.children, pred);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;

    #[test]
    fn test_query_document_order() {
        let doc = parse("<a></a><b><a></a></b><a></a>").document;
        let matches = doc.query_elements(|el| el.name == "a");
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn test_first_element_prefers_nested_earlier_match() {
        let doc = parse("<div><x id=\"inner\"></x></div><x id=\"outer\"></x>").document;
        let first = doc.first_element(|el| el.name == "x").unwrap();
        assert_eq!(first.attr("id"), Some("inner"));
    }

    #[test]
    fn test_parent_of_first_nested() {
        let doc = parse("<div><x></x></div><x></x>").document;
        match doc.parent_of_first(|el| el.name == "x").unwrap() {
            crate::ParentRef::Element(parent) => assert_eq!(parent.name, "div"),
            crate::ParentRef::Document => panic!("expected element parent"),
        }
    }

    #[test]
    fn test_parent_of_first_top_level() {
        let doc = parse("<x></x>").document;
        assert!(matches!(
            doc.parent_of_first(|el| el.name == "x"),
            Some(crate::ParentRef::Document)
        ));
    }

    #[test]
    fn test_remove_elements() {
        let mut doc = parse("<div><script>a</script><p>keep</p></div>").document;
        doc.remove_elements(|el| el.name == "script");
        assert!(doc.first_element(|el| el.name == "script").is_none());
        assert!(doc.first_element(|el| el.name == "p").is_some());
    }

    #[test]
    fn test_attr_access() {
        let doc = parse("<link rel=\"import\" href=\"a.html\" disabled>").document;
        let link = doc.first_element(|el| el.name == "link").unwrap();
        assert_eq!(link.attr("rel"), Some("import"));
        assert_eq!(link.attr("href"), Some("a.html"));
        assert_eq!(link.attr("disabled"), Some(""));
        assert_eq!(link.attr("missing"), None);
    }
}
