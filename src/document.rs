use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::editor::{EditorError, Path};

/// Text content of a leaf node. A soft line break is a leaf holding `"\n"`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A block or inline element with ordered children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: String,
    pub children: Vec<Node>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            children: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Creates an element of the same kind and attributes, without children.
    pub fn shallow_clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            children: Vec::new(),
            attributes: self.attributes.clone(),
        }
    }
}

/// Untagged: elements are tried first, since `text` may also be an element
/// attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(Text),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(Text::new(text))
    }

    pub fn element(kind: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element(Element::new(kind).with_children(children))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(element) => &element.children,
            Node::Text(_) => &[],
        }
    }

    /// Concatenated text of every leaf below this node, in document order.
    pub fn string(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&text.text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

/// Root of a document tree. Paths index into `children` first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn node(&self, path: &Path) -> Option<&Node> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.children.get(*first)?;
        for idx in rest {
            node = node.as_element()?.children.get(*idx)?;
        }
        Some(node)
    }

    pub fn node_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.children.get_mut(*first)?;
        for idx in rest {
            node = node.as_element_mut()?.children.get_mut(*idx)?;
        }
        Some(node)
    }

    /// Children of the container addressed by `path`; the empty path is the root.
    pub fn children_at_mut(&mut self, path: &Path) -> Option<&mut Vec<Node>> {
        if path.is_root() {
            return Some(&mut self.children);
        }
        self.node_mut(path)?
            .as_element_mut()
            .map(|element| &mut element.children)
    }

    pub fn string(&self) -> String {
        self.children.iter().map(Node::string).collect()
    }

    /// Checks that no element below the root is left without children.
    pub fn validate(&self) -> Result<(), EditorError> {
        fn walk(node: &Node, path: &mut Path) -> Result<(), EditorError> {
            let Node::Element(element) = node else {
                return Ok(());
            };
            if element.children.is_empty() {
                return Err(EditorError::structural(
                    path.clone(),
                    format!("element `{}` has no children", element.kind),
                ));
            }
            for (idx, child) in element.children.iter().enumerate() {
                path.push(idx);
                walk(child, path)?;
                path.pop();
            }
            Ok(())
        }

        let mut path = Path::root();
        for (idx, child) in self.children.iter().enumerate() {
            path.push(idx);
            walk(child, &mut path)?;
            path.pop();
        }
        Ok(())
    }
}
