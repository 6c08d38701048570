use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use plaid_mapper::info::TypeInfo;
use plaid_mapper::info::markers::{Role, RoleKind, XmlRoot};
use plaid_mapper::processor::{Definition, Mapper, ObjectLayout, ScalarSupport};
use plaid_mapper::registry::TypeRegistry;
use plaid_mapper::{Lookup, MapError, Reflect, ScalarRef, Typed, Value};

use crate::reader::{XmlReader, is_name};
use crate::tree::{XmlElement, XmlNode};
use crate::writer::XmlWriter;

const ITEM: &str = "item";
const ENTRY: &str = "entry";
const KEY: &str = "key";
const VALUE: &str = "value";
const NIL: &str = "nil";

/// Where scalar items of lists and maps put their text.
///
/// Readers accept both styles regardless of this setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValueStyle {
    /// `<item>3</item>`
    #[default]
    Element,
    /// `<item value="3"/>`
    Attribute,
}

/// Maps typed values to and from XML documents.
///
/// Member [roles](Role) decide the layout of objects:
///
/// - `attribute`: an attribute holding scalar text;
/// - `element`: a child element named after the member;
/// - `cdata`: a child element holding a CDATA section;
/// - `list`: the items repeat directly in the owner, one `entry` element each.
///
/// Lists elsewhere become `<item>` children, maps `<entry key="..">`
/// children, and null is written as `nil="true"`. Discriminators are written
/// as attributes, so the definition's discriminator key has to be a valid
/// XML name; [`XmlMapper::definition`] uses `type`.
pub struct XmlMapper<'a> {
    mapper: Mapper<'a>,
    style: ValueStyle,
    writer: XmlWriter,
}

impl<'a> XmlMapper<'a> {
    /// Fails for definitions with sequence-layout objects, which have no
    /// element names, and for discriminator keys that are not XML names.
    pub fn new(mapper: Mapper<'a>) -> Result<Self, MapError> {
        let definition = mapper.definition();
        if definition.layout() == ObjectLayout::Sequence {
            return Err(MapError::Configuration("XML needs lookup-layout objects".into()));
        }
        if !is_name(definition.discriminator_key()) {
            return Err(MapError::Configuration(format!(
                "the discriminator key `{}` is not an XML name",
                definition.discriminator_key()
            )));
        }
        Ok(Self {
            mapper,
            style: ValueStyle::default(),
            writer: XmlWriter::new(),
        })
    }

    /// A definition suited to XML: lookup layout, scalars as text and `type`
    /// as the discriminator key.
    pub fn definition(registry: Arc<TypeRegistry>) -> Result<Definition, MapError> {
        Definition::builder(registry)
            .with_default_processors()
            .scalars(ScalarSupport::STRINGS)
            .discriminator_key("type")
            .build()
    }

    pub fn value_style(mut self, style: ValueStyle) -> Self {
        self.style = style;
        self
    }

    pub fn writer(mut self, writer: XmlWriter) -> Self {
        self.writer = writer;
        self
    }

    #[inline]
    pub const fn mapper(&self) -> &Mapper<'a> {
        &self.mapper
    }

    /// Serializes `value` into a document element.
    pub fn to_element<T: Reflect>(&self, value: &T) -> Result<XmlElement, MapError> {
        let info = value.reflect_type_info();
        let data = self.mapper.serialize(value.as_reflect())?;
        let mut root = XmlElement::new(root_name(info));
        self.write_value(info, &data, &mut root)?;
        Ok(root)
    }

    pub fn to_xml<T: Reflect>(&self, value: &T) -> Result<String, MapError> {
        Ok(self.writer.write(&self.to_element(value)?))
    }

    /// Deserializes a new `T` from a document element.
    ///
    /// A root name other than the one `T` writes is accepted.
    pub fn from_element<T: Typed>(&self, element: &XmlElement) -> Result<T, MapError> {
        let info = T::type_info();
        let expected = root_name(info);
        if element.name != expected {
            log::debug!("reading `{}` from <{}>, expected <{expected}>", info.type_path(), element.name);
        }
        let data = self.read_value(info, element)?;
        self.mapper.from_value(&data)
    }

    pub fn from_xml<T: Typed>(&self, text: &str) -> Result<T, MapError> {
        let root = XmlReader::new(text).parse()?;
        self.from_element(&root)
    }

    /// Merges a document onto `target`; absent members keep their values.
    pub fn populate_element<T: Reflect>(&self, target: &mut T, element: &XmlElement) -> Result<(), MapError> {
        let data = self.read_value(target.reflect_type_info(), element)?;
        self.mapper.apply(target, &data)
    }

    pub fn populate_xml<T: Reflect>(&self, target: &mut T, text: &str) -> Result<(), MapError> {
        let root = XmlReader::new(text).parse()?;
        self.populate_element(target, &root)
    }

    // -------------------------------------------------------------------------
    // Writing

    fn text_of(&self, value: &Value) -> Option<String> {
        match value {
            Value::String(text) => Some(text.clone()),
            Value::Bool(_) | Value::Number(_) => {
                ScalarRef::from_value(value).map(|scalar| self.mapper.definition().format().format_scalar(scalar))
            }
            Value::Null | Value::Sequence(_) | Value::Lookup(_) => None,
        }
    }

    fn write_value(&self, info: &'static TypeInfo, value: &Value, element: &mut XmlElement) -> Result<(), MapError> {
        if value.is_null() {
            element.attributes.insert(NIL.into(), "true".into());
            return Ok(());
        }
        if let Some(optional) = info.as_optional() {
            return self.write_value(optional.some(), value, element);
        }
        if let Some(poly) = info.as_poly() {
            let concrete = self.mapper.resolver().resolve(poly.base(), value)?;
            return self.write_value(concrete, value, element);
        }
        match value {
            Value::Lookup(entries) if info.as_object().is_some() => return self.write_object(info, entries, element),
            Value::Sequence(items) => {
                if let Some(list) = info.as_list() {
                    for item in items {
                        let mut child = XmlElement::new(ITEM);
                        self.write_item(list.item(), item, &mut child)?;
                        element.children.push(XmlNode::Element(child));
                    }
                    return Ok(());
                }
            }
            Value::Lookup(entries) => {
                if let Some(map) = info.as_map() {
                    for (key, item) in entries {
                        let mut child = XmlElement::new(ENTRY).with_attribute(KEY, key.as_str());
                        self.write_item(map.value(), item, &mut child)?;
                        element.children.push(XmlNode::Element(child));
                    }
                    return Ok(());
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
        // Scalars, and data some custom processor shaped differently than its type.
        write_plain(self, value, element);
        Ok(())
    }

    fn write_item(&self, info: &'static TypeInfo, value: &Value, element: &mut XmlElement) -> Result<(), MapError> {
        if self.style == ValueStyle::Attribute
            && is_scalar_type(info)
            && let Some(text) = self.text_of(value)
        {
            element.attributes.insert(VALUE.into(), text);
            return Ok(());
        }
        self.write_value(info, value, element)
    }

    fn write_object(&self, info: &'static TypeInfo, entries: &Lookup, element: &mut XmlElement) -> Result<(), MapError> {
        let members = self.mapper.registry().mapped_members(info);
        let mut used = Vec::with_capacity(members.len());

        for cached in members.iter() {
            let role = cached.marker_as::<Role>().copied().unwrap_or_else(Role::element);
            let key = role.key_or(cached.name());
            used.push(key);
            let Some(value) = entries.get(key) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            let key = xml_name(key, info)?;
            let member_info = cached.member().type_info();

            match role.kind {
                RoleKind::Attribute => {
                    let text = self.text_of(value).ok_or_else(|| MapError::UnsupportedValue {
                        what: format!("{} data in attribute `{key}` of `{}`", value.kind_name(), info.type_path()),
                    })?;
                    element.attributes.insert(key.into(), text);
                }
                RoleKind::Element => {
                    let mut child = XmlElement::new(key);
                    self.write_value(member_info, value, &mut child)?;
                    element.children.push(XmlNode::Element(child));
                }
                RoleKind::CData => {
                    let text = self.text_of(value).ok_or_else(|| MapError::UnsupportedValue {
                        what: format!("{} data in character data `{key}` of `{}`", value.kind_name(), info.type_path()),
                    })?;
                    element.children.push(XmlNode::Element(XmlElement::new(key).with_child(XmlNode::CData(text))));
                }
                RoleKind::ListEntry { entry } => {
                    let Some(items) = value.as_sequence() else {
                        return Err(MapError::UnsupportedValue {
                            what: format!("{} data in list `{key}` of `{}`", value.kind_name(), info.type_path()),
                        });
                    };
                    let item_info = list_item(member_info)?;
                    let name = xml_name(entry.unwrap_or(key), info)?;
                    for item in items {
                        let mut child = XmlElement::new(name);
                        self.write_item(item_info, item, &mut child)?;
                        element.children.push(XmlNode::Element(child));
                    }
                }
            }
        }

        // Discriminators, and members of derived types the static type does not know.
        for (key, value) in entries {
            if value.is_null() || used.contains(&key.as_str()) {
                continue;
            }
            let key = xml_name(key, info)?;
            match self.text_of(value) {
                Some(text) => {
                    element.attributes.insert(key.into(), text);
                }
                None => {
                    let mut child = XmlElement::new(key);
                    write_plain(self, value, &mut child);
                    element.children.push(XmlNode::Element(child));
                }
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Reading

    fn read_value(&self, info: &'static TypeInfo, element: &XmlElement) -> Result<Value, MapError> {
        if element.attribute(NIL) == Some("true") && element.children.is_empty() {
            return Ok(Value::Null);
        }
        if let Some(optional) = info.as_optional() {
            return self.read_value(optional.some(), element);
        }
        if let Some(poly) = info.as_poly() {
            let discriminators = Value::Lookup(attributes_of(element));
            let concrete = self.mapper.resolver().resolve(poly.base(), &discriminators)?;
            return self.read_value(concrete, element);
        }
        if info.as_object().is_some() {
            return self.read_object(info, element);
        }
        if let Some(list) = info.as_list() {
            let items = element
                .elements()
                .map(|child| self.read_value(list.item(), child))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Value::Sequence(items));
        }
        if let Some(map) = info.as_map() {
            let mut entries = Lookup::new();
            for child in element.elements() {
                let key = child.attribute(KEY).unwrap_or(&child.name);
                entries.insert(key.into(), self.read_value(map.value(), child)?);
            }
            return Ok(Value::Lookup(entries));
        }
        if info.as_scalar().is_some() || info.as_enum().is_some() {
            return Ok(read_scalar(element));
        }
        Ok(read_plain(element))
    }

    fn read_object(&self, info: &'static TypeInfo, element: &XmlElement) -> Result<Value, MapError> {
        let mut entries = attributes_of(element);

        for cached in self.mapper.registry().mapped_members(info).iter() {
            let role = cached.marker_as::<Role>().copied().unwrap_or_else(Role::element);
            let key = role.key_or(cached.name());
            let member_info = cached.member().type_info();

            match role.kind {
                RoleKind::Attribute | RoleKind::Element => {
                    if let Some(child) = element.element(key) {
                        entries.insert(key.into(), self.read_value(member_info, child)?);
                    }
                }
                RoleKind::CData => {
                    if let Some(child) = element.element(key) {
                        entries.insert(key.into(), Value::String(child.text()));
                    }
                }
                RoleKind::ListEntry { entry } => {
                    let item_info = list_item(member_info)?;
                    let items = element
                        .elements_named(entry.unwrap_or(key))
                        .map(|child| self.read_value(item_info, child))
                        .collect::<Result<Vec<_>, _>>()?;
                    if !items.is_empty() {
                        entries.insert(key.into(), Value::Sequence(items));
                    }
                }
            }
        }
        Ok(Value::Lookup(entries))
    }
}

/// Keys written as element or attribute names must read back.
fn xml_name<'k>(key: &'k str, owner: &'static TypeInfo) -> Result<&'k str, MapError> {
    if is_name(key) {
        Ok(key)
    } else {
        Err(MapError::UnsupportedValue {
            what: format!("`{key}` as an XML name in `{}`", owner.type_path()),
        })
    }
}

/// The document element name of `info`.
///
/// An [`XmlRoot`] marker wins, then the type name without generic arguments.
pub fn root_name(info: &'static TypeInfo) -> &'static str {
    if let Some(&XmlRoot(name)) = info.as_object().and_then(|object| object.marker::<XmlRoot>()) {
        return name;
    }
    let name = info.type_name();
    match name.find('<') {
        Some(end) => &name[..end],
        None => name,
    }
}

fn list_item(info: &'static TypeInfo) -> Result<&'static TypeInfo, MapError> {
    if let Some(list) = info.as_list() {
        return Ok(list.item());
    }
    match info.as_optional() {
        Some(optional) => list_item(optional.some()),
        None => Err(MapError::UnsupportedValue {
            what: format!("a list role on `{}`", info.type_path()),
        }),
    }
}

fn is_scalar_type(info: &'static TypeInfo) -> bool {
    match info.as_optional() {
        Some(optional) => is_scalar_type(optional.some()),
        None => info.as_scalar().is_some() || info.as_enum().is_some(),
    }
}

fn attributes_of(element: &XmlElement) -> Lookup {
    element
        .attributes
        .iter()
        .filter(|(name, _)| name.as_str() != NIL)
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect()
}

fn write_plain(mapper: &XmlMapper<'_>, value: &Value, element: &mut XmlElement) {
    match value {
        Value::Null => {
            element.attributes.insert(NIL.into(), "true".into());
        }
        Value::Sequence(items) => {
            for item in items {
                let mut child = XmlElement::new(ITEM);
                write_plain(mapper, item, &mut child);
                element.children.push(XmlNode::Element(child));
            }
        }
        Value::Lookup(entries) => {
            for (key, item) in entries {
                let mut child = XmlElement::new(ENTRY).with_attribute(KEY, key.as_str());
                write_plain(mapper, item, &mut child);
                element.children.push(XmlNode::Element(child));
            }
        }
        Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            if let Some(text) = mapper.text_of(value)
                && !text.is_empty()
            {
                element.children.push(XmlNode::Text(text));
            }
        }
    }
}

/// Element text, or the `value` attribute of an element without content.
fn read_scalar(element: &XmlElement) -> Value {
    if element.children.is_empty()
        && let Some(value) = element.attribute(VALUE)
    {
        return Value::String(value.into());
    }
    Value::String(element.text())
}

/// Infers the shape of untyped content.
///
/// Elements without children are scalars, `<entry key="..">` children make a
/// lookup and any other children a sequence.
fn read_plain(element: &XmlElement) -> Value {
    if element.attribute(NIL) == Some("true") && element.children.is_empty() {
        return Value::Null;
    }
    if !element.has_element_children() {
        return read_scalar(element);
    }
    let is_lookup = element
        .elements()
        .all(|child| child.name == ENTRY && child.attribute(KEY).is_some());
    if is_lookup {
        Value::Lookup(
            element
                .elements()
                .map(|child| (child.attribute(KEY).unwrap_or_default().into(), read_plain(child)))
                .collect(),
        )
    } else {
        Value::Sequence(element.elements().map(read_plain).collect())
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;

    use plaid_mapper::derive::Mapped;
    use plaid_mapper::impls::Poly;
    use plaid_mapper::processor::{Definition, Mapper};
    use plaid_mapper::registry::TypeRegistry;
    use plaid_mapper::{MapError, Value};

    use super::{ValueStyle, XmlMapper, read_plain};
    use crate::reader::XmlReader;
    use crate::tree::XmlNode;
    use crate::writer::XmlWriter;

    #[derive(Mapped, Debug, PartialEq)]
    enum Genre {
        Fiction,
        Science,
    }

    #[derive(Mapped, Debug, PartialEq)]
    struct Book {
        #[mapping(attribute(key = "isbn"))]
        id: u64,
        title: String,
        genre: Genre,
    }

    #[derive(Mapped, Debug, PartialEq)]
    #[mapping(xml_root = "library")]
    struct Library {
        #[mapping(attribute)]
        name: String,
        #[mapping(list(entry = "book"))]
        books: Vec<Book>,
        #[mapping(cdata)]
        notes: String,
        ratings: BTreeMap<String, u8>,
        codes: Vec<u32>,
        motto: Option<String>,
    }

    #[derive(Mapped, Debug, PartialEq)]
    #[mapping(resolve(target = Circle, value = "circle"))]
    struct Shape {
        #[mapping(attribute)]
        name: String,
    }

    #[derive(Mapped, Debug, PartialEq)]
    struct Circle {
        #[mapping(base)]
        shape: Shape,
        radius: f64,
    }

    #[derive(Mapped, Debug)]
    struct Canvas {
        shapes: Vec<Poly<Shape>>,
    }

    fn definition() -> Definition {
        let mut registry = TypeRegistry::new();
        registry.register::<Library>();
        registry.register::<Canvas>();
        XmlMapper::definition(Arc::new(registry)).unwrap()
    }

    fn library() -> Library {
        Library {
            name: "city".into(),
            books: vec![
                Book {
                    id: 9780262510875,
                    title: "SICP".into(),
                    genre: Genre::Science,
                },
                Book {
                    id: 9780141439518,
                    title: "Persuasion".into(),
                    genre: Genre::Fiction,
                },
            ],
            notes: "open <late> & ]]> on fridays".into(),
            ratings: BTreeMap::from([("SICP".into(), 5), ("Persuasion".into(), 4)]),
            codes: vec![7, 11],
            motto: None,
        }
    }

    #[test]
    fn roles_shape_the_document() {
        let definition = definition();
        let xml = XmlMapper::new(Mapper::new(&definition)).unwrap();
        let root = xml.to_element(&library()).unwrap();

        assert_eq!(root.name, "library");
        assert_eq!(root.attribute("name"), Some("city"));
        let books: Vec<_> = root.elements_named("book").collect();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].attribute("isbn"), Some("9780262510875"));
        assert_eq!(books[0].element("genre").map(|g| g.text()).as_deref(), Some("Science"));
        assert!(matches!(
            root.element("notes").map(|n| &n.children[..]),
            Some([XmlNode::CData(_)])
        ));
        let ratings = root.element("ratings").unwrap();
        assert_eq!(ratings.elements().next().and_then(|e| e.attribute("key")), Some("Persuasion"));
        assert_eq!(root.element("codes").unwrap().elements_named("item").count(), 2);
        assert!(root.element("motto").is_none());

        let text = xml.to_xml(&library()).unwrap();
        let back: Library = xml.from_xml(&text).unwrap();
        assert_eq!(back, library());
    }

    #[test]
    fn value_styles_read_alike() {
        let definition = definition();
        let writer = XmlMapper::new(Mapper::new(&definition))
            .unwrap()
            .value_style(ValueStyle::Attribute)
            .writer(XmlWriter::new().compact(true).header(false));
        let reader = XmlMapper::new(Mapper::new(&definition)).unwrap();

        let text = writer.to_xml(&library()).unwrap();
        assert!(text.contains(r#"<codes><item value="7"/><item value="11"/></codes>"#));
        assert!(text.contains(r#"<entry key="SICP" value="5"/>"#));

        let back: Library = reader.from_xml(&text).unwrap();
        assert_eq!(back, library());
    }

    #[test]
    fn polymorphic_items() {
        let definition = definition();
        let xml = XmlMapper::new(Mapper::new(&definition)).unwrap();
        let text = r#"<Canvas>
            <shapes>
                <item name="c" type="circle"><radius>0.5</radius></item>
                <item name="plain"/>
            </shapes>
        </Canvas>"#;

        let canvas: Canvas = xml.from_xml(text).unwrap();
        assert_eq!(canvas.shapes[0].downcast_ref::<Circle>().map(|c| c.radius), Some(0.5));
        assert!(canvas.shapes[1].is::<Shape>());

        let root = xml.to_element(&canvas).unwrap();
        let first = root.element("shapes").and_then(|s| s.elements().next()).unwrap();
        assert_eq!(first.attribute("type"), Some("circle"));
        assert_eq!(first.attribute("name"), Some("c"));
    }

    #[test]
    fn populate_keeps_absent_members() {
        let definition = definition();
        let xml = XmlMapper::new(Mapper::new(&definition)).unwrap();

        let mut library = library();
        xml.populate_xml(&mut library, r#"<library name="town"><motto>read</motto></library>"#)
            .unwrap();
        assert_eq!(library.name, "town");
        assert_eq!(library.motto.as_deref(), Some("read"));
        assert_eq!(library.books.len(), 2);
    }

    #[test]
    fn errors() {
        let definition = definition();
        let xml = XmlMapper::new(Mapper::new(&definition)).unwrap();
        let err = xml.from_xml::<Library>("<library>\n  <codes></code>").unwrap_err();
        assert!(matches!(err, MapError::MalformedWireData { format: "xml", line: 2, .. }));

        let sequence = Definition::sequence(Arc::new(TypeRegistry::new()));
        assert!(matches!(
            XmlMapper::new(Mapper::new(&sequence)),
            Err(MapError::Configuration(_))
        ));
    }

    #[derive(Mapped, Debug, PartialEq)]
    #[mapping(resolve(target = Square, key = "$kind", value = "square"))]
    struct Tile {
        size: u8,
    }

    #[derive(Mapped, Debug, PartialEq)]
    struct Square {
        #[mapping(base)]
        tile: Tile,
    }

    #[derive(Mapped, Debug, PartialEq)]
    struct Ranked {
        #[mapping(element(key = "1st"))]
        first: u8,
    }

    #[test]
    fn names_must_read_back() {
        let json = Definition::json(Arc::new(TypeRegistry::new()));
        assert!(matches!(
            XmlMapper::new(Mapper::new(&json)),
            Err(MapError::Configuration(_))
        ));

        let mut registry = TypeRegistry::new();
        registry.register::<Square>();
        registry.register::<Ranked>();
        let definition = XmlMapper::definition(Arc::new(registry)).unwrap();
        let xml = XmlMapper::new(Mapper::new(&definition)).unwrap();
        assert!(matches!(
            xml.to_xml(&Ranked { first: 1 }),
            Err(MapError::UnsupportedValue { .. })
        ));
        assert!(matches!(
            xml.to_xml(&Square { tile: Tile { size: 2 } }),
            Err(MapError::UnsupportedValue { .. })
        ));
        assert!(xml.to_xml(&Tile { size: 2 }).is_ok());
    }

    #[test]
    fn plain_shapes_are_inferred() {
        let root = XmlReader::new(r#"<a><entry key="x">1</entry><entry key="y" nil="true"/></a>"#)
            .parse()
            .unwrap();
        let value = read_plain(&root);
        assert_eq!(value.get("x"), Some(&Value::from("1")));
        assert_eq!(value.get("y"), Some(&Value::Null));

        let root = XmlReader::new("<a><item>1</item><item>2</item></a>").parse().unwrap();
        assert_eq!(read_plain(&root), Value::from(vec![Value::from("1"), Value::from("2")]));
    }
}
