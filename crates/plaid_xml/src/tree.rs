use alloc::string::String;
use alloc::vec::Vec;

use indexmap::IndexMap;

/// A child of an [`XmlElement`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    /// A `<![CDATA[...]]>` section, written without escaping.
    CData(String),
}

/// An element with ordered attributes and children.
///
/// ```
/// use plaid_xml::{XmlElement, XmlNode};
///
/// let item = XmlElement::new("item")
///     .with_attribute("id", "7")
///     .with_child(XmlNode::Text("first".into()));
/// let list = XmlElement::new("list").with_child(XmlNode::Element(item));
///
/// let first = list.element("item").unwrap();
/// assert_eq!(first.attribute("id"), Some("7"));
/// assert_eq!(first.text(), "first");
/// assert!(list.has_element_children());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) | XmlNode::CData(_) => None,
        })
    }

    /// Child elements called `name`.
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |element| element.name == name)
    }

    /// The first child element called `name`.
    pub fn element(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.name == name)
    }

    pub fn has_element_children(&self) -> bool {
        self.elements().next().is_some()
    }

    /// Text and CDATA content, concatenated.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                XmlNode::Text(text) | XmlNode::CData(text) => out.push_str(text),
                XmlNode::Element(_) => {}
            }
        }
        out
    }
}
