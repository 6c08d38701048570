use alloc::string::String;

use crate::error::{XmlError, XmlErrorKind};
use crate::tree::{XmlElement, XmlNode};

/// A non-validating XML parser producing one [`XmlElement`] tree.
///
/// The declaration, processing instructions, comments and a `DOCTYPE`
/// without internal subset are skipped. The five predefined entities and
/// numeric character references are decoded. Whitespace-only text between
/// child elements is dropped.
///
/// ```
/// use plaid_xml::XmlReader;
///
/// let root = XmlReader::new(
///     r#"<?xml version="1.0"?>
///     <!-- inventory -->
///     <shelf id="a&amp;b">
///         <book>Dune &#x2014; Herbert</book>
///         <note><![CDATA[<raw> & ready]]></note>
///         <empty/>
///     </shelf>"#,
/// )
/// .parse()
/// .unwrap();
///
/// assert_eq!(root.attribute("id"), Some("a&b"));
/// assert_eq!(root.element("book").unwrap().text(), "Dune \u{2014} Herbert");
/// assert_eq!(root.element("note").unwrap().text(), "<raw> & ready");
/// assert_eq!(root.elements().count(), 3);
/// ```
pub struct XmlReader<'a> {
    input: &'a str,
    pos: usize,
    max_depth: usize,
}

impl<'a> XmlReader<'a> {
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    #[inline]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    #[inline]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses the document and returns its root element.
    pub fn parse(mut self) -> Result<XmlElement, XmlError> {
        self.skip_misc()?;
        if self.rest().is_empty() {
            return Err(self.error(XmlErrorKind::MissingRoot));
        }
        let root = self.parse_element(0)?;
        self.skip_misc()?;
        if !self.rest().is_empty() {
            return Err(self.error(XmlErrorKind::TrailingContent));
        }
        Ok(root)
    }

    // -------------------------------------------------------------------------
    // Scanning

    #[inline]
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    #[inline]
    fn error(&self, kind: XmlErrorKind) -> XmlError {
        XmlError::at(self.input, self.pos, kind)
    }

    fn unexpected(&self, expected: &'static str) -> XmlError {
        match self.rest().chars().next() {
            Some(found) => self.error(XmlErrorKind::UnexpectedChar { found, expected }),
            None => self.error(XmlErrorKind::UnexpectedEnd { expected }),
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str, expected: &'static str) -> Result<(), XmlError> {
        if self.eat(token) { Ok(()) } else { Err(self.unexpected(expected)) }
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start_matches([' ', '\t', '\r', '\n']);
        self.pos = self.input.len() - trimmed.len();
    }

    /// Moves past `terminator`, failing at the end of input.
    fn skip_past(&mut self, terminator: &str, expected: &'static str) -> Result<&'a str, XmlError> {
        match self.rest().find(terminator) {
            Some(i) => {
                let skipped = &self.rest()[..i];
                self.pos += i + terminator.len();
                Ok(skipped)
            }
            None => {
                self.pos = self.input.len();
                Err(self.error(XmlErrorKind::UnexpectedEnd { expected }))
            }
        }
    }

    /// Whitespace, comments, processing instructions and doctypes.
    fn skip_misc(&mut self) -> Result<(), XmlError> {
        loop {
            self.skip_whitespace();
            if self.eat("<?") {
                self.skip_past("?>", "`?>`")?;
            } else if self.eat("<!--") {
                self.skip_past("-->", "`-->`")?;
            } else if self.eat("<!DOCTYPE") {
                self.skip_past(">", "`>`")?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_name(&mut self) -> Result<&'a str, XmlError> {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(i, c)| !is_name_char(c, i == 0))
            .map_or(rest.len(), |(i, _)| i);
        if len == 0 {
            return Err(self.unexpected("a name"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    // -------------------------------------------------------------------------
    // Elements

    fn parse_element(&mut self, depth: usize) -> Result<XmlElement, XmlError> {
        if depth >= self.max_depth {
            return Err(self.error(XmlErrorKind::DepthLimitExceeded(self.max_depth)));
        }
        self.expect("<", "`<`")?;
        let mut element = XmlElement::new(self.parse_name()?);

        loop {
            self.skip_whitespace();
            if self.eat("/>") {
                return Ok(element);
            }
            if self.eat(">") {
                break;
            }
            let name_pos = self.pos;
            let name = self.parse_name()?;
            self.skip_whitespace();
            self.expect("=", "`=`")?;
            self.skip_whitespace();
            let value = self.parse_attribute_value()?;
            if element.attributes.contains_key(name) {
                return Err(XmlError::at(
                    self.input,
                    name_pos,
                    XmlErrorKind::DuplicateAttribute(name.into()),
                ));
            }
            element.attributes.insert(name.into(), value);
        }

        self.parse_content(&mut element, depth)?;
        if element.has_element_children() {
            element.children.retain(|child| match child {
                XmlNode::Text(text) => !text.trim().is_empty(),
                XmlNode::Element(_) | XmlNode::CData(_) => true,
            });
        }
        Ok(element)
    }

    fn parse_attribute_value(&mut self) -> Result<String, XmlError> {
        let quote = match self.rest().chars().next() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.unexpected("a quoted value")),
        };
        self.pos += 1;
        let Some(len) = self.rest().find(quote) else {
            self.pos = self.input.len();
            return Err(self.error(XmlErrorKind::UnexpectedEnd { expected: "a closing quote" }));
        };
        let start = self.pos;
        if let Some(i) = self.rest()[..len].find('<') {
            self.pos += i;
            return Err(self.unexpected("an attribute value"));
        }
        let value = self.decode(start, &self.input[start..start + len])?;
        self.pos = start + len + 1;
        Ok(value)
    }

    /// Children up to and including the closing tag.
    fn parse_content(&mut self, element: &mut XmlElement, depth: usize) -> Result<(), XmlError> {
        loop {
            if self.eat("</") {
                let found_pos = self.pos;
                let name = self.parse_name()?;
                if name != element.name {
                    return Err(XmlError::at(
                        self.input,
                        found_pos,
                        XmlErrorKind::MismatchedTag {
                            expected: element.name.clone(),
                            found: name.into(),
                        },
                    ));
                }
                self.skip_whitespace();
                return self.expect(">", "`>`");
            }
            if self.eat("<![CDATA[") {
                let data = self.skip_past("]]>", "`]]>`")?;
                push_text(element, XmlNode::CData(data.into()));
            } else if self.eat("<!--") {
                self.skip_past("-->", "`-->`")?;
            } else if self.eat("<?") {
                self.skip_past("?>", "`?>`")?;
            } else if self.rest().starts_with('<') {
                let child = self.parse_element(depth + 1)?;
                element.children.push(XmlNode::Element(child));
            } else if self.rest().is_empty() {
                return Err(self.error(XmlErrorKind::UnexpectedEnd {
                    expected: "a closing tag",
                }));
            } else {
                let start = self.pos;
                let len = self.rest().find('<').unwrap_or(self.rest().len());
                self.pos += len;
                let text = self.decode(start, &self.input[start..start + len])?;
                push_text(element, XmlNode::Text(text));
            }
        }
    }

    /// Replaces entity and character references in `raw`, found at `start`.
    fn decode(&self, start: usize, raw: &str) -> Result<String, XmlError> {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(amp) = rest.find('&') {
            out.push_str(&rest[..amp]);
            let offset = start + (raw.len() - rest.len()) + amp;
            let after = &rest[amp + 1..];
            let Some(semi) = after.find(';') else {
                return Err(XmlError::at(self.input, offset, XmlErrorKind::UnknownEntity(after.into())));
            };
            let name = &after[..semi];
            out.push(decode_reference(name).ok_or_else(|| {
                let kind = if name.starts_with('#') {
                    XmlErrorKind::InvalidCharReference(name.into())
                } else {
                    XmlErrorKind::UnknownEntity(name.into())
                };
                XmlError::at(self.input, offset, kind)
            })?);
            rest = &after[semi + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Appends text, merging it into a preceding text node of the same kind.
fn push_text(element: &mut XmlElement, node: XmlNode) {
    match (element.children.last_mut(), node) {
        (Some(XmlNode::Text(last)), XmlNode::Text(text)) => last.push_str(&text),
        (_, node) => element.children.push(node),
    }
}

/// Whether `text` is an element or attribute name this reader accepts.
pub(crate) fn is_name(text: &str) -> bool {
    !text.is_empty() && text.char_indices().all(|(i, c)| is_name_char(c, i == 0))
}

fn is_name_char(c: char, first: bool) -> bool {
    c.is_alphabetic() || c == '_' || c == ':' || (!first && (c.is_ascii_digit() || c == '-' || c == '.'))
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::XmlReader;
    use crate::error::XmlErrorKind;
    use crate::tree::{XmlElement, XmlNode};

    fn child_names(element: &XmlElement) -> Vec<&str> {
        element.elements().map(|e| e.name.as_str()).collect()
    }

    fn kind(text: &str) -> XmlErrorKind {
        XmlReader::new(text).parse().unwrap_err().kind
    }

    #[test]
    fn structure() {
        let root = XmlReader::new("<a x='1' y=\"2\">\n  <b/>\n  <c>t<!-- skip -->u</c>\n</a>")
            .parse()
            .unwrap();
        assert_eq!(child_names(&root), ["b", "c"]);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.attribute("x"), Some("1"));
        let c = root.element("c").unwrap();
        assert_eq!(c.children, [XmlNode::Text("tu".into())]);
    }

    #[test]
    fn whitespace_text_is_kept_without_children() {
        let root = XmlReader::new("<a>  </a>").parse().unwrap();
        assert_eq!(root.text(), "  ");
    }

    #[test]
    fn references() {
        let root = XmlReader::new("<a>&lt;&#65;&#x42;&apos;&quot;&gt;</a>").parse().unwrap();
        assert_eq!(root.text(), "<AB'\">");
        assert_eq!(kind("<a>&nbsp;</a>"), XmlErrorKind::UnknownEntity("nbsp".into()));
        assert_eq!(kind("<a>&#xD800;</a>"), XmlErrorKind::InvalidCharReference("#xD800".into()));
    }

    #[test]
    fn malformed() {
        let err = XmlReader::new("<a>\n  <b></c>\n</a>").parse().unwrap_err();
        assert_eq!(
            err.kind,
            XmlErrorKind::MismatchedTag {
                expected: "b".into(),
                found: "c".into()
            }
        );
        assert_eq!((err.line, err.column), (2, 8));

        assert_eq!(kind("<a x='1' x='2'/>"), XmlErrorKind::DuplicateAttribute("x".into()));
        assert_eq!(kind("<a>"), XmlErrorKind::UnexpectedEnd { expected: "a closing tag" });
        assert_eq!(kind("<a/><b/>"), XmlErrorKind::TrailingContent);
        assert_eq!(kind("<!-- only -->"), XmlErrorKind::MissingRoot);
        assert_eq!(kind("<a x=1/>"), XmlErrorKind::UnexpectedChar { found: '1', expected: "a quoted value" });
        assert_eq!(kind("<a><![CDATA[x</a>"), XmlErrorKind::UnexpectedEnd { expected: "`]]>`" });
    }

    #[test]
    fn depth_limit() {
        assert!(XmlReader::new("<a><b><c/></b></a>").max_depth(3).parse().is_ok());
        assert_eq!(
            XmlReader::new("<a><b><c/></b></a>").max_depth(2).parse().unwrap_err().kind,
            XmlErrorKind::DepthLimitExceeded(2)
        );
    }
}
