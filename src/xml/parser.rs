//! XML parser producing the namespace-resolved element tree

use crate::config::Config;
use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::xml::cursor::Cursor;
use crate::xml::model::{Attribute, Content, Document, Element, QName};
use crate::xml::namespace::{NamespaceMap, Resolver};

/// Attribute or element name before prefix resolution
struct RawName {
    prefix: Option<String>,
    local: String,
    pos: Pos,
}

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    resolver: Resolver,
    alias: String,
    max_depth: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser with the default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, &Config::default())
    }

    /// Create a new XML parser with custom configuration
    pub fn with_config(input: &'a [u8], config: &Config) -> Self {
        let input = input.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(input);
        Self {
            cursor: Cursor::new(input),
            resolver: Resolver::new(),
            alias: config.default_namespace_alias.clone(),
            max_depth: config.max_depth,
            depth: 0,
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        self.skip_prolog()?;
        let root = self.parse_element()?;
        self.skip_misc()?;

        if !self.cursor.is_eof() {
            return Err(self.error_here("content after root element"));
        }

        let namespaces = NamespaceMap::from_root(&root);
        let query_namespaces = namespaces.for_queries(&self.alias);
        Ok(Document {
            root,
            namespaces,
            query_namespaces,
        })
    }

    /// XML declaration, comments, processing instructions and doctype
    fn skip_prolog(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
            } else if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
            } else if self.cursor.starts_with(b"<!DOCTYPE") {
                self.skip_doctype()?;
            } else if self.cursor.current() == Some(b'<') {
                return Ok(());
            } else if self.cursor.is_eof() {
                return Err(self.error_here("missing root element"));
            } else {
                return Err(self.error_here("text before root element"));
            }
        }
    }

    /// Comments and processing instructions after the root element
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
            } else if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_doctype(&mut self) -> Result<()> {
        // internal subsets may contain '>' inside brackets
        let mut depth = 0usize;
        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match b {
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error_here("unterminated doctype"))
    }

    fn parse_element(&mut self) -> Result<Element> {
        if self.depth >= self.max_depth {
            return Err(Error::with_message(
                ErrorKind::MaxDepthExceeded { max: self.max_depth },
                Span::new(self.cursor.position(), self.cursor.position()),
                "maximum element nesting depth exceeded",
            ));
        }
        self.depth += 1;
        let element = self.parse_element_inner()?;
        self.depth -= 1;
        Ok(element)
    }

    fn parse_element_inner(&mut self) -> Result<Element> {
        self.expect_byte(b'<')?;

        if self.cursor.current() == Some(b'/') {
            return Err(self.error_here("unexpected closing tag"));
        }

        self.resolver.push_scope();
        let raw_name = self.parse_name()?;
        let raw_attributes = self.parse_attributes()?;

        let mut declared = NamespaceMap::new();
        let mut plain = Vec::new();
        for (name, value) in raw_attributes {
            match (name.prefix.as_deref(), name.local.as_str()) {
                (None, "xmlns") => {
                    self.resolver.declare("", &value);
                    declared.insert("", value);
                }
                (Some("xmlns"), prefix) => {
                    if value.is_empty() {
                        return Err(self.error_at(name.pos, "empty namespace binding"));
                    }
                    self.resolver.declare(prefix, &value);
                    declared.insert(prefix, value);
                }
                _ => plain.push((name, value)),
            }
        }

        let name = self.resolve_element_name(raw_name)?;
        let attributes = self.resolve_attributes(plain)?;

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            self.expect_byte(b'>')?;
            self.resolver.pop_scope();
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
                declared,
            });
        }

        self.expect_byte(b'>')?;

        let mut children = Vec::new();
        loop {
            if self.cursor.starts_with(b"</") {
                self.cursor.advance_by(2);
                let close = self.parse_name()?;
                if close.prefix != name.prefix || close.local != name.local {
                    return Err(self.error_at(close.pos, "mismatched closing tag"));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
                continue;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                self.cursor.advance_by(9);
                let text = self.take_until(b"]]>")?;
                push_text(&mut children, text);
                continue;
            }

            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                let child = self.parse_element()?;
                children.push(Content::Element(child));
                continue;
            }

            if self.cursor.is_eof() {
                return Err(self.error_here("unterminated element"));
            }

            let text = self.parse_text()?;
            push_text(&mut children, text);
        }

        self.resolver.pop_scope();
        Ok(Element {
            name,
            attributes,
            children,
            declared,
        })
    }

    fn resolve_element_name(&self, raw: RawName) -> Result<QName> {
        let namespace = match raw.prefix.as_deref() {
            Some(prefix) => match self.resolver.resolve(prefix) {
                Some(uri) => Some(uri.to_string()),
                None => return Err(self.error_at(raw.pos, &format!("unbound prefix: {prefix}"))),
            },
            None => self.resolver.resolve("").map(str::to_string),
        };
        Ok(QName::new(raw.prefix, raw.local, namespace))
    }

    fn resolve_attributes(&self, raw: Vec<(RawName, String)>) -> Result<Vec<Attribute>> {
        let mut attributes: Vec<Attribute> = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            // unprefixed attributes are in no namespace
            let namespace = match name.prefix.as_deref() {
                Some(prefix) => match self.resolver.resolve(prefix) {
                    Some(uri) => Some(uri.to_string()),
                    None => {
                        return Err(
                            self.error_at(name.pos, &format!("unbound prefix: {prefix}"))
                        )
                    }
                },
                None => None,
            };
            let qname = QName::new(name.prefix, name.local, namespace);
            if attributes
                .iter()
                .any(|a| a.name.local == qname.local && a.name.namespace == qname.namespace)
            {
                return Err(self.error_at(name.pos, "duplicate attribute"));
            }
            attributes.push(Attribute { name: qname, value });
        }
        Ok(attributes)
    }

    fn parse_attributes(&mut self) -> Result<Vec<(RawName, String)>> {
        let mut attrs = Vec::new();

        loop {
            let had_space = matches!(self.cursor.current(), Some(b' ' | b'\t' | b'\r' | b'\n'));
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) if !had_space => {
                    return Err(self.error_here("expected whitespace before attribute"))
                }
                Some(_) => {}
                None => return Err(self.error_here("unexpected end of input")),
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs
                .iter()
                .any(|(n, _): &(RawName, String)| n.prefix == name.prefix && n.local == name.local)
            {
                return Err(self.error_at(name.pos, "duplicate attribute"));
            }
            attrs.push((name, value));
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_string(raw, start_pos)?;
                let decoded = decode_entities(&text, start_pos)?;
                return Ok(normalize_attribute_whitespace(&decoded));
            }
            if b == b'<' {
                return Err(self.error_here("'<' in attribute value"));
            }
            self.cursor.advance();
        }

        Err(self.error_here("unterminated attribute value"))
    }

    fn parse_text(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = bytes_to_string(raw, start_pos)?;
        decode_entities(&text, start_pos)
    }

    fn parse_name(&mut self) -> Result<RawName> {
        let pos = self.cursor.position();
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(first) if is_name_start(first) => self.cursor.advance(),
            _ => return Err(self.error_at(pos, "expected name")),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = bytes_to_string(self.cursor.slice_from(start), pos)?;
        match raw.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() && !local.contains(':') => {
                Ok(RawName {
                    prefix: Some(prefix.to_string()),
                    local: local.to_string(),
                    pos,
                })
            }
            Some(_) => Err(self.error_at(pos, "malformed qualified name")),
            None => Ok(RawName {
                prefix: None,
                local: raw,
                pos,
            }),
        }
    }

    fn take_until(&mut self, pattern: &[u8]) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(pattern.len());
                return bytes_to_string(raw, start_pos);
            }
            self.cursor.advance();
        }
        Err(self.error_here("unterminated markup"))
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        self.take_until(pattern).map(|_| ())
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            Err(self.error_here(&format!("expected '{}'", char::from(expected))))
        }
    }

    fn error_here(&self, message: &str) -> Error {
        self.error_at(self.cursor.position(), message)
    }

    fn error_at(&self, pos: Pos, message: &str) -> Error {
        Error::with_message(ErrorKind::Parse, Span::new(pos, self.cursor.position()), message)
    }
}

/// Merge adjacent text so CDATA and character data read as one run
fn push_text(children: &mut Vec<Content>, text: String) {
    if text.is_empty() {
        return;
    }
    if let Some(Content::Text(last)) = children.last_mut() {
        last.push_str(&text);
    } else {
        children.push(Content::Text(text));
    }
}

fn bytes_to_string(bytes: &[u8], pos: Pos) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::with_message(ErrorKind::Parse, Span::new(pos, pos), "invalid utf-8"))
}

/// Attribute value normalization: literal tabs and newlines read as spaces
fn normalize_attribute_whitespace(value: &str) -> String {
    value
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str, pos: Pos) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        for next in chars.by_ref() {
            if next == ';' {
                terminated = true;
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            _ if !terminated => None,
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::with_message(
                    ErrorKind::Parse,
                    Span::new(pos, pos),
                    format!("invalid xml entity: &{entity}"),
                ));
            }
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
