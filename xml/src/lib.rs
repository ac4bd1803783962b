// NOTE: this is not a general purpose xml parser. it understands just enough of xml to walk
// khronos registry files: tags, attributes, text, comments and the leading declaration. no dtd,
// no cdata, no namespaces. everything is borrowed from the input.

use std::borrow::Cow;

fn split_at_str<'a>(input: &'a str, needle: &str) -> Option<(&'a str, &'a str)> {
    let end = input.find(needle)?;
    let (head, tail) = input.split_at(end);
    Some((head, &tail[needle.len()..]))
}

fn split_at_whitespace(input: &str) -> (&str, &str) {
    match input.find(|c: char| c.is_ascii_whitespace()) {
        Some(end) => (&input[..end], input[end..].trim_start()),
        None => (input, ""),
    }
}

fn strip_decl(input: &str) -> Option<&str> {
    if !input.trim_start().starts_with("<?xml") {
        return None;
    }
    split_at_str(input, "?>").map(|(_, tail)| tail.trim_start())
}

#[test]
fn test_strip_decl() {
    const WITH_DECL: &str = r#"
<?xml version="1.0" encoding="UTF-8"?>
<registry>
"#;
    assert!(strip_decl(WITH_DECL).unwrap().starts_with("<registry>"));

    const WITHOUT_DECL: &str = r#"
<registry>
"#;
    assert_eq!(strip_decl(WITHOUT_DECL), None);
}

/// decodes the five predefined entities. borrows when there is nothing to decode.
pub fn unescape(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let decoded = [
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&amp;", '&'),
            ("&quot;", '"'),
            ("&apos;", '\''),
        ]
        .into_iter()
        .find(|(entity, _)| rest.starts_with(entity));
        match decoded {
            Some((entity, c)) => {
                out.push(c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[test]
fn test_unescape() {
    assert!(matches!(unescape("GLenum"), Cow::Borrowed("GLenum")));
    assert_eq!(unescape("a &lt;b&gt; &amp;&amp; c"), "a <b> && c");
    assert_eq!(unescape("&quot;x&apos; &unknown;"), "\"x' &unknown;");
}

#[derive(Debug, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

pub struct AttributeIterator<'a> {
    attrs: &'a str,
}

impl<'a> AttributeIterator<'a> {
    pub fn new(attrs: &'a str) -> Self {
        Self { attrs }
    }
}

impl<'a> Iterator for AttributeIterator<'a> {
    type Item = Attribute<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, rest) = split_at_str(self.attrs, "=")?;
        let rest = rest.trim_start();
        let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let (value, rest) = rest[1..].split_once(quote)?;
        self.attrs = rest.trim_start();
        Some(Attribute {
            key: key.trim(),
            value,
        })
    }
}

#[test]
fn test_attribute_iterator() {
    const ATTRS: &str = "value=\"0x3000\" name='EGL_SUCCESS'\n        comment=\"a = b\"";
    let mut iterator = AttributeIterator::new(ATTRS);
    assert_eq!(
        iterator.next(),
        Some(Attribute {
            key: "value",
            value: "0x3000"
        })
    );
    assert_eq!(
        iterator.next(),
        Some(Attribute {
            key: "name",
            value: "EGL_SUCCESS"
        })
    );
    assert_eq!(
        iterator.next(),
        Some(Attribute {
            key: "comment",
            value: "a = b"
        })
    );
    assert_eq!(iterator.next(), None);
}

/// start tag or self-closing tag; `attrs` is the raw, unparsed rest of the tag.
#[derive(Debug, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: &'a str,
    pub attrs: &'a str,
}

impl<'a> Tag<'a> {
    fn parse(content: &'a str) -> Self {
        let (name, attrs) = split_at_whitespace(content.trim_end());
        Self { name, attrs }
    }

    pub fn iter_attrs(&self) -> AttributeIterator<'a> {
        AttributeIterator::new(self.attrs)
    }

    /// value of the first attr named key.
    pub fn attr(&self, key: &str) -> Option<&'a str> {
        self.iter_attrs()
            .find_map(|attr| (attr.key == key).then_some(attr.value))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Element<'a> {
    /// `<name/>`
    EmptyTag(Tag<'a>),
    /// `<name>`
    StartTag(Tag<'a>),
    /// `</name>`, holds the name.
    EndTag(&'a str),
    Text(&'a str),
    Comment(&'a str),
}

pub struct ElementIterator<'a> {
    input: &'a str,
}

impl<'a> ElementIterator<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: strip_decl(input).unwrap_or(input),
        }
    }

    // consumes input up to and including `close`, yields what was between.
    fn take_until(&mut self, skip: usize, close: &str) -> Option<&'a str> {
        let (content, rest) = split_at_str(&self.input[skip..], close)?;
        self.input = rest;
        Some(content)
    }

    fn next_tag(&mut self) -> Option<Element<'a>> {
        debug_assert!(self.input.starts_with('<'));

        let content = self.take_until(1, ">")?;
        Some(match content.strip_suffix('/') {
            Some(content) => Element::EmptyTag(Tag::parse(content)),
            None => Element::StartTag(Tag::parse(content)),
        })
    }

    fn next_text(&mut self) -> Element<'a> {
        debug_assert!(!self.input.is_empty());

        let end = self.input.find('<').unwrap_or(self.input.len());
        let (content, rest) = self.input.split_at(end);
        self.input = rest;
        Element::Text(content)
    }
}

impl<'a> Iterator for ElementIterator<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let input = self.input;
            if input.is_empty() {
                return None;
            }
            if input.starts_with("<!--") {
                return self.take_until(4, "-->").map(Element::Comment);
            }
            if input.starts_with("</") {
                return self.take_until(2, ">").map(|name| Element::EndTag(name.trim()));
            }
            // processing instructions in the middle of a document carry nothing we care about.
            if input.starts_with("<?") {
                self.take_until(2, "?>")?;
                continue;
            }
            if input.starts_with('<') {
                return self.next_tag();
            }
            return Some(self.next_text());
        }
    }
}

#[test]
fn test_empty_tag() {
    const INPUT: &str = r#"<enum value="0x3038" name="EGL_NONE"/>"#;
    let mut iterator = ElementIterator::new(INPUT);
    let Some(Element::EmptyTag(tag)) = iterator.next() else {
        panic!("expected empty tag");
    };
    assert_eq!(tag.name, "enum");
    assert_eq!(tag.attr("name"), Some("EGL_NONE"));
    assert_eq!(tag.attr("value"), Some("0x3038"));
    assert_eq!(tag.attr("type"), None);
    assert_eq!(iterator.next(), None);
}

#[test]
fn test_empty_tag_without_attrs() {
    assert_eq!(
        ElementIterator::new("<require/>").next(),
        Some(Element::EmptyTag(Tag {
            name: "require",
            attrs: ""
        }))
    );
}

#[test]
fn test_start_tag_with_wrapped_attrs() {
    const INPUT: &str = "<extension name=\"EGL_KHR_image\"\n    supported=\"egl\">";
    assert_eq!(
        ElementIterator::new(INPUT).next(),
        Some(Element::StartTag(Tag {
            name: "extension",
            attrs: "name=\"EGL_KHR_image\"\n    supported=\"egl\""
        }))
    );
}

#[test]
fn test_end_tag() {
    assert_eq!(
        ElementIterator::new("</registry>").next(),
        Some(Element::EndTag("registry"))
    );
}

#[test]
fn test_comment() {
    const INPUT: &str = "<!-- SECTION: EGL enumerant (token) definitions. -->";
    assert_eq!(
        ElementIterator::new(INPUT).next(),
        Some(Element::Comment(" SECTION: EGL enumerant (token) definitions. ")),
    );
}

#[test]
fn test_command() {
    const INPUT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<command>
    <proto>const <ptype>GLubyte</ptype> *<name>glGetString</name></proto>
</command>"#;
    let start = |name| Element::StartTag(Tag { name, attrs: "" });
    let elements: Vec<Element> = ElementIterator::new(INPUT)
        .filter(|element| !matches!(element, Element::Text(text) if text.trim().is_empty()))
        .collect();
    assert_eq!(
        elements,
        [
            start("command"),
            start("proto"),
            Element::Text("const "),
            start("ptype"),
            Element::Text("GLubyte"),
            Element::EndTag("ptype"),
            Element::Text(" *"),
            start("name"),
            Element::Text("glGetString"),
            Element::EndTag("name"),
            Element::EndTag("proto"),
            Element::EndTag("command"),
        ]
    );
}

#[test]
fn test_processing_instruction_and_unterminated() {
    let mut iterator = ElementIterator::new("<a><?pi x?></a><b");
    assert_eq!(
        iterator.next(),
        Some(Element::StartTag(Tag {
            name: "a",
            attrs: ""
        }))
    );
    assert_eq!(iterator.next(), Some(Element::EndTag("a")));
    assert_eq!(iterator.next(), None);
}
