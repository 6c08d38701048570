use alloc::string::String;

use crate::tree::{XmlElement, XmlNode};

/// Renders [`XmlElement`] trees as text.
///
/// Elements whose children are all elements are indented one level per
/// depth; elements holding text are written inline so their content is
/// preserved exactly.
///
/// ```
/// use plaid_xml::{XmlElement, XmlNode, XmlWriter};
///
/// let root = XmlElement::new("a")
///     .with_attribute("q", "\"x\" & y")
///     .with_child(XmlNode::Element(XmlElement::new("b").with_child(XmlNode::Text("1 < 2".into()))))
///     .with_child(XmlNode::Element(XmlElement::new("c")));
///
/// assert_eq!(
///     XmlWriter::new().header(false).write(&root),
///     "<a q=\"&quot;x&quot; &amp; y\">\n  <b>1 &lt; 2</b>\n  <c/>\n</a>"
/// );
/// assert_eq!(
///     XmlWriter::new().compact(true).write(&root),
///     "<?xml version=\"1.0\" encoding=\"utf-8\"?><a q=\"&quot;x&quot; &amp; y\"><b>1 &lt; 2</b><c/></a>"
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XmlWriter {
    compact: bool,
    header: bool,
    indent: usize,
}

impl Default for XmlWriter {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl XmlWriter {
    pub const HEADER: &'static str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";

    /// Indented by two spaces, with the XML declaration.
    #[inline]
    pub const fn new() -> Self {
        Self {
            compact: false,
            header: true,
            indent: 2,
        }
    }

    #[inline]
    pub const fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Whether to start with the XML declaration.
    #[inline]
    pub const fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    #[inline]
    pub const fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn write(&self, root: &XmlElement) -> String {
        let mut out = String::new();
        if self.header {
            out.push_str(Self::HEADER);
            if !self.compact {
                out.push('\n');
            }
        }
        self.write_element(root, 0, &mut out);
        out
    }

    fn write_element(&self, element: &XmlElement, depth: usize, out: &mut String) {
        out.push('<');
        out.push_str(&element.name);
        for (name, value) in &element.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(value, true, out);
            out.push('"');
        }
        if element.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');

        let block = !self.compact && element.children.iter().all(|c| matches!(c, XmlNode::Element(_)));
        for child in &element.children {
            if block {
                self.newline(depth + 1, out);
            }
            match child {
                XmlNode::Element(child) => {
                    let depth = if block { depth + 1 } else { depth };
                    self.write_element(child, depth, out);
                }
                XmlNode::Text(text) => escape_into(text, false, out),
                XmlNode::CData(text) => write_cdata(text, out),
            }
        }
        if block {
            self.newline(depth, out);
        }

        out.push_str("</");
        out.push_str(&element.name);
        out.push('>');
    }

    fn newline(&self, depth: usize, out: &mut String) {
        out.push('\n');
        out.extend(core::iter::repeat_n(' ', depth * self.indent));
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' if attribute => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
}

/// `]]>` cannot appear inside a section, so it is split across two.
fn write_cdata(text: &str, out: &mut String) {
    out.push_str("<![CDATA[");
    out.push_str(&text.replace("]]>", "]]]]><![CDATA[>"));
    out.push_str("]]>");
}

#[cfg(test)]
mod tests {
    use super::XmlWriter;
    use crate::reader::XmlReader;
    use crate::tree::{XmlElement, XmlNode};

    #[test]
    fn text_survives_a_round_trip() {
        let root = XmlElement::new("doc")
            .with_attribute("multi", "line\nbreak\ttab")
            .with_child(XmlNode::Element(
                XmlElement::new("raw").with_child(XmlNode::CData("a ]]> b <c>".into())),
            ))
            .with_child(XmlNode::Element(
                XmlElement::new("mixed")
                    .with_child(XmlNode::Text(" lead ".into()))
                    .with_child(XmlNode::Element(XmlElement::new("br")))
                    .with_child(XmlNode::Text("tail\r\n".into())),
            ));

        for writer in [XmlWriter::new(), XmlWriter::new().compact(true).header(false)] {
            let text = writer.write(&root);
            let back = XmlReader::new(&text).parse().unwrap();
            assert_eq!(back.attribute("multi"), Some("line\nbreak\ttab"));
            assert_eq!(back.element("raw").unwrap().text(), "a ]]> b <c>");
            let mixed = back.element("mixed").unwrap();
            assert_eq!(mixed.text(), " lead tail\r\n");
            assert!(mixed.element("br").is_some());
        }
    }
}
