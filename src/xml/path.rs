//! Path expression compiler
//!
//! Recursive descent over the location-path subset of XPath 1.0 that TEI
//! extraction needs: absolute and relative paths, `//`, `.`, name tests
//! with namespace prefixes, the child, descendant, descendant-or-self and
//! self axes, and attribute / position predicates.

use crate::error::{Error, ErrorKind, Result, Span};
use crate::xml::cursor::Cursor;
use crate::xml::model::{Element, QName};
use crate::xml::namespace::{NamespaceMap, XML_NAMESPACE};

/// Compiled path expression
#[derive(Clone, Debug, PartialEq)]
pub struct XPath {
    pub(crate) absolute: bool,
    pub(crate) steps: Vec<Step>,
}

/// Location step in a path
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Step {
    pub(crate) axis: Axis,
    pub(crate) test: NodeTest,
    pub(crate) predicates: Vec<Predicate>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    SelfAxis,
}

impl Axis {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "child" => Some(Self::Child),
            "descendant" => Some(Self::Descendant),
            "descendant-or-self" => Some(Self::DescendantOrSelf),
            "self" => Some(Self::SelfAxis),
            _ => None,
        }
    }
}

/// Node test in a location step
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum NodeTest {
    /// `node()`, also matches the document node
    Node,
    /// `*`
    AnyElement,
    /// `prefix:*`
    Namespace(String),
    /// `name` or `prefix:name`
    Name {
        namespace: Option<String>,
        local: String,
    },
}

/// Attribute name resolved against the namespace map
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AttrName {
    namespace: Option<String>,
    local: String,
}

impl AttrName {
    fn matches(&self, name: &QName) -> bool {
        name.local == self.local && name.namespace == self.namespace
    }

    pub(crate) fn value<'a>(&self, element: &'a Element) -> Option<&'a str> {
        element
            .attributes
            .iter()
            .find(|attr| self.matches(&attr.name))
            .map(|attr| attr.value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Condition {
    Exists(AttrName),
    Equals(AttrName, String),
    NotEquals(AttrName, String),
    Not(Box<Condition>),
}

impl Condition {
    pub(crate) fn holds(&self, element: &Element) -> bool {
        match self {
            Self::Exists(name) => name.value(element).is_some(),
            Self::Equals(name, expected) => name.value(element) == Some(expected.as_str()),
            Self::NotEquals(name, expected) => {
                name.value(element).is_some_and(|value| value != expected)
            }
            Self::Not(inner) => !inner.holds(element),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Predicate {
    /// 1-based position within the step's candidates
    Position(usize),
    Last,
    /// Conditions joined by `and`
    All(Vec<Condition>),
}

impl XPath {
    /// Compile `expr`, resolving prefixes against `namespaces`.
    ///
    /// The `xml` prefix is always bound.
    pub fn compile(expr: &str, namespaces: &NamespaceMap) -> Result<Self> {
        Compiler {
            cursor: Cursor::new(expr.as_bytes()),
            expr,
            namespaces,
        }
        .compile()
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }
}

struct Compiler<'a> {
    cursor: Cursor<'a>,
    expr: &'a str,
    namespaces: &'a NamespaceMap,
}

impl Compiler<'_> {
    fn compile(mut self) -> Result<XPath> {
        self.cursor.skip_whitespace();
        if self.cursor.is_eof() {
            return Err(self.error("empty path"));
        }

        let mut steps = Vec::new();
        let mut absolute = false;
        if self.cursor.starts_with(b"//") {
            self.cursor.advance_by(2);
            absolute = true;
            steps.push(descendant_or_self_node());
        } else if self.cursor.consume(b'/') {
            absolute = true;
            self.cursor.skip_whitespace();
            if self.cursor.is_eof() {
                return Ok(XPath { absolute, steps });
            }
        }

        loop {
            steps.push(self.step()?);
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"//") {
                self.cursor.advance_by(2);
                steps.push(descendant_or_self_node());
            } else if !self.cursor.consume(b'/') {
                break;
            }
        }

        if !self.cursor.is_eof() {
            return Err(self.error("unexpected trailing input"));
        }
        Ok(XPath { absolute, steps })
    }

    fn step(&mut self) -> Result<Step> {
        self.cursor.skip_whitespace();
        if self.cursor.starts_with(b"..") {
            return Err(self.error("parent steps are not supported"));
        }
        if self.cursor.consume(b'.') {
            return Ok(Step {
                axis: Axis::SelfAxis,
                test: NodeTest::Node,
                predicates: Vec::new(),
            });
        }
        if self.cursor.current() == Some(b'@') {
            return Err(self.error("attribute steps are not supported"));
        }

        let mut axis = Axis::Child;
        let test = if self.cursor.consume(b'*') {
            NodeTest::AnyElement
        } else {
            let name = self.ncname()?;
            if self.cursor.starts_with(b"::") {
                axis = Axis::from_name(&name)
                    .ok_or_else(|| self.error(&format!("unsupported axis: {name}")))?;
                self.cursor.advance_by(2);
                self.node_test()?
            } else {
                self.node_test_from(name)?
            }
        };

        let mut predicates = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            if !self.cursor.consume(b'[') {
                break;
            }
            predicates.push(self.predicate()?);
            self.cursor.skip_whitespace();
            if !self.cursor.consume(b']') {
                return Err(self.error("expected ']'"));
            }
        }

        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn node_test(&mut self) -> Result<NodeTest> {
        if self.cursor.consume(b'*') {
            return Ok(NodeTest::AnyElement);
        }
        let name = self.ncname()?;
        self.node_test_from(name)
    }

    /// Finish a node test whose first name has been read
    fn node_test_from(&mut self, name: String) -> Result<NodeTest> {
        if name == "node" && self.cursor.starts_with(b"()") {
            self.cursor.advance_by(2);
            return Ok(NodeTest::Node);
        }
        if self.cursor.current() == Some(b':') && self.cursor.peek(1) != Some(b':') {
            self.cursor.advance();
            let namespace = self.resolve(&name)?;
            if self.cursor.consume(b'*') {
                return Ok(NodeTest::Namespace(namespace));
            }
            let local = self.ncname()?;
            return Ok(NodeTest::Name {
                namespace: Some(namespace),
                local,
            });
        }
        // unprefixed names select elements in no namespace
        Ok(NodeTest::Name {
            namespace: None,
            local: name,
        })
    }

    fn predicate(&mut self) -> Result<Predicate> {
        self.cursor.skip_whitespace();
        if matches!(self.cursor.current(), Some(b'0'..=b'9')) {
            let start = self.cursor.pos();
            while matches!(self.cursor.current(), Some(b'0'..=b'9')) {
                self.cursor.advance();
            }
            let digits = String::from_utf8_lossy(self.cursor.slice_from(start));
            return match digits.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Predicate::Position(n)),
                _ => Err(self.error("position predicates start at 1")),
            };
        }
        if self.cursor.starts_with(b"last()") {
            self.cursor.advance_by(6);
            return Ok(Predicate::Last);
        }

        let mut conditions = vec![self.condition()?];
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"and")
                && matches!(self.cursor.peek(3), Some(b' ' | b'\t' | b'\n' | b'\r' | b'@'))
            {
                self.cursor.advance_by(3);
                conditions.push(self.condition()?);
            } else {
                break;
            }
        }
        Ok(Predicate::All(conditions))
    }

    fn condition(&mut self) -> Result<Condition> {
        self.cursor.skip_whitespace();
        if self.cursor.starts_with(b"not(") {
            self.cursor.advance_by(4);
            let inner = self.condition()?;
            self.cursor.skip_whitespace();
            if !self.cursor.consume(b')') {
                return Err(self.error("expected ')'"));
            }
            return Ok(Condition::Not(Box::new(inner)));
        }
        if !self.cursor.consume(b'@') {
            return Err(self.error("expected attribute test"));
        }
        let name = self.attribute_name()?;

        self.cursor.skip_whitespace();
        if self.cursor.consume(b'=') {
            let value = self.string_literal()?;
            return Ok(Condition::Equals(name, value));
        }
        if self.cursor.starts_with(b"!=") {
            self.cursor.advance_by(2);
            let value = self.string_literal()?;
            return Ok(Condition::NotEquals(name, value));
        }
        Ok(Condition::Exists(name))
    }

    fn attribute_name(&mut self) -> Result<AttrName> {
        let first = self.ncname()?;
        if self.cursor.current() == Some(b':') {
            self.cursor.advance();
            let namespace = self.resolve(&first)?;
            let local = self.ncname()?;
            return Ok(AttrName {
                namespace: Some(namespace),
                local,
            });
        }
        Ok(AttrName {
            namespace: None,
            local: first,
        })
    }

    fn string_literal(&mut self) -> Result<String> {
        self.cursor.skip_whitespace();
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.error("expected string literal")),
        };
        self.cursor.advance();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let value = String::from_utf8_lossy(self.cursor.slice_from(start)).into_owned();
                self.cursor.advance();
                return Ok(value);
            }
            self.cursor.advance();
        }
        Err(self.error("unterminated string literal"))
    }

    fn ncname(&mut self) -> Result<String> {
        let start = self.cursor.pos();
        match self.cursor.current() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' || b >= 0x80 => self.cursor.advance(),
            _ => return Err(self.error("expected name")),
        }
        while let Some(b) = self.cursor.current() {
            if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.') || b >= 0x80 {
                self.cursor.advance();
            } else {
                break;
            }
        }
        Ok(String::from_utf8_lossy(self.cursor.slice_from(start)).into_owned())
    }

    fn resolve(&self, prefix: &str) -> Result<String> {
        if prefix == "xml" {
            return Ok(XML_NAMESPACE.to_string());
        }
        self.namespaces
            .get(prefix)
            .filter(|_| !prefix.is_empty())
            .map(str::to_string)
            .ok_or_else(|| self.error(&format!("unbound prefix: {prefix}")))
    }

    fn error(&self, message: &str) -> Error {
        let pos = self.cursor.position();
        Error::with_message(
            ErrorKind::InvalidPath {
                path: self.expr.to_string(),
            },
            Span::new(pos, pos),
            format!("{message} in path {:?} at column {}", self.expr, pos.col),
        )
    }
}

fn descendant_or_self_node() -> Step {
    Step {
        axis: Axis::DescendantOrSelf,
        test: NodeTest::Node,
        predicates: Vec::new(),
    }
}
