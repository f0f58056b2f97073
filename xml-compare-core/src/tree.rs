use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// A generic XML tree node.
///
/// The sibling index of a node is its position in the parent's `children`;
/// the chain of sibling indices from the root is its structural path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XmlNode {
    /// Qualified element name, prefix included.
    pub tag: String,
    /// XML attributes keyed by qualified name.
    pub attributes: BTreeMap<String, String>,
    /// Child elements.
    pub children: Vec<XmlNode>,
    /// Optional text or CDATA payload.
    pub text: Option<String>,
    /// 1-based line of the start tag, when the node came from a parser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl XmlNode {
    /// Create a new XML node with no attributes, children, or text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
            line: None,
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder-style text setter.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Return the attribute value for `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Return the first child with the provided tag.
    pub fn get_child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Return all children with the provided tag.
    pub fn get_children(&self, tag: &str) -> Vec<&XmlNode> {
        self.children
            .iter()
            .filter(|child| child.tag == tag)
            .collect()
    }

    /// Follow a chain of sibling indices down from this node.
    pub fn at_path(&self, path: &[usize]) -> Option<&XmlNode> {
        let mut current = self;
        for &index in path {
            current = current.children.get(index)?;
        }
        Some(current)
    }

    /// Number of nodes in this subtree, this node included.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

impl Display for XmlNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (key, value) in &self.attributes {
            write!(f, " {}=\"{}\"", key, value)?;
        }

        if self.children.is_empty() && self.text.is_none() {
            return write!(f, "/>");
        }

        write!(f, ">")?;
        if let Some(text) = &self.text {
            write!(f, "{}", text)?;
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}
