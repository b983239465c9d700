//! Lightweight parsing of embed snippets
//!
//! A snippet is expected to hold a single `<iframe>` element. Only the first
//! iframe start tag is parsed into attributes; the text around it, and every
//! attribute that is never rewritten, is reproduced byte-for-byte by
//! [`EmbedMarkup::render`].

use regex::Regex;
use std::sync::OnceLock;

/// Match the start of an iframe tag
fn iframe_open_regex() -> &'static Regex {
    static IFRAME_OPEN: OnceLock<Regex> = OnceLock::new();
    IFRAME_OPEN.get_or_init(|| Regex::new(r"(?i)<iframe\b").unwrap())
}

/// Match one attribute (with its leading whitespace) at the start of the input
///
/// Like browsers, an attribute may follow a quoted value without whitespace
/// and a bare value may contain `=`.
fn attribute_regex() -> &'static Regex {
    static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE.get_or_init(|| {
        // Captures:
        // 1: leading whitespace, possibly empty
        // 2: name
        // 3/4/5: double-quoted, single-quoted or bare value
        Regex::new(
            r#"^(\s*)([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>`]+)))?"#,
        )
        .unwrap()
    })
}

/// A single attribute of the iframe start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    leading: String,
    name: String,
    value: Option<String>,
    raw: String,
}

impl Attribute {
    /// Create a new double-quoted attribute
    pub fn new(name: impl Into<String>, value: impl AsRef<str>) -> Self {
        let name = name.into();
        let value = value.as_ref().to_string();
        Self {
            leading: " ".to_string(),
            raw: format!("{}=\"{}\"", name, escape_attribute_value(&value)),
            name,
            value: Some(value),
        }
    }

    /// Attribute name as written in the source
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value, `None` for bare attributes such as `allowfullscreen`
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Check the attribute name, ignoring ASCII case
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(&self.leading);
        out.push_str(&self.raw);
    }
}

/// The parsed iframe start tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IframeElement {
    attributes: Vec<Attribute>,
}

impl IframeElement {
    /// All attributes in source order
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Value of the first attribute called `name`
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.is_named(name))
            .and_then(Attribute::value)
    }

    /// Check if an attribute called `name` exists, with or without a value
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.is_named(name))
    }

    /// Replace the value of `name` in place, or append it when missing
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|attr| attr.is_named(name)) {
            Some(attr) => {
                let leading = std::mem::take(&mut attr.leading);
                let mut replacement = Attribute::new(attr.name.clone(), value);
                replacement.leading = leading;
                *attr = replacement;
            }
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    /// Insert `name` right after the tag name unless it is already present
    ///
    /// Returns `true` if the attribute was inserted.
    pub fn ensure_attribute(&mut self, name: &str, value: &str) -> bool {
        if self.has_attribute(name) {
            return false;
        }
        self.attributes.insert(0, Attribute::new(name, value));
        true
    }
}

/// A snippet split around its first iframe start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedMarkup<'a> {
    prefix: &'a str,
    opener: &'a str,
    iframe: IframeElement,
    tail: &'a str,
    suffix: &'a str,
}

impl<'a> EmbedMarkup<'a> {
    /// Parse the first iframe start tag of `snippet`
    ///
    /// Returns `None` when the snippet has no iframe start tag, or when that
    /// tag is never closed with `>`.
    pub fn parse(snippet: &'a str) -> Option<Self> {
        let open = iframe_open_regex().find(snippet)?;
        let mut pos = open.end();
        let mut attributes = Vec::new();

        while let Some(caps) = attribute_regex().captures(&snippet[pos..]) {
            let whole = caps.get(0)?;
            let value = caps
                .get(3)
                .or_else(|| caps.get(4))
                .or_else(|| caps.get(5))
                .map(|m| m.as_str().to_string());

            attributes.push(Attribute {
                leading: caps[1].to_string(),
                name: caps[2].to_string(),
                value,
                raw: whole.as_str()[caps[1].len()..].to_string(),
            });
            pos += whole.end();
        }

        // Whatever the attribute scanner could not read stays verbatim
        let close = pos + snippet[pos..].find('>')?;

        Some(Self {
            prefix: &snippet[..open.start()],
            opener: open.as_str(),
            iframe: IframeElement { attributes },
            tail: &snippet[pos..close],
            suffix: &snippet[close..],
        })
    }

    /// The parsed iframe element
    pub fn iframe(&self) -> &IframeElement {
        &self.iframe
    }

    /// Mutable access to the parsed iframe element
    pub fn iframe_mut(&mut self) -> &mut IframeElement {
        &mut self.iframe
    }

    /// Reassemble the snippet
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            self.prefix.len() + self.opener.len() + self.tail.len() + self.suffix.len() + 256,
        );
        out.push_str(self.prefix);
        out.push_str(self.opener);
        for attr in &self.iframe.attributes {
            attr.write_to(&mut out);
        }
        out.push_str(self.tail);
        out.push_str(self.suffix);
        out
    }
}

/// Escape a value for a double-quoted attribute
fn escape_attribute_value(value: &str) -> String {
    value.replace('"', "&quot;")
}
