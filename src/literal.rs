//! Literals derived from element content

use oxrdf::{Literal, NamedNodeRef};
use tracing::{debug, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::text::normalize_string;
use crate::xml::Element;

/// Options for [`build_literal`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LiteralOptions {
    /// Text prepended to the element's content
    pub prefix: String,
    /// Language used when the element has no `xml:lang`
    pub default_lang: Option<String>,
    /// Apply `default_lang` to elements without `xml:lang`
    pub enforce_default_lang: bool,
}

impl LiteralOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set a fallback language and enforce it
    pub fn with_default_lang(mut self, lang: impl Into<String>) -> Self {
        self.default_lang = Some(lang.into());
        self.enforce_default_lang = true;
        self
    }

    pub fn enforce_default_lang(mut self, enforce: bool) -> Self {
        self.enforce_default_lang = enforce;
        self
    }
}

fn language_tagged(text: String, lang: &str) -> Literal {
    match Literal::new_language_tagged_literal(text.clone(), lang) {
        Ok(literal) => literal,
        Err(err) => {
            warn!(lang, error = %err, "invalid language tag, emitting plain literal");
            Literal::new_simple_literal(text)
        }
    }
}

/// Literal from the element's full inner text, prefixed and
/// whitespace-normalized.
///
/// The element's own `xml:lang` wins; otherwise the default language is
/// used only when enforced; otherwise the literal is untagged.
pub fn build_literal(node: &Element, options: &LiteralOptions) -> Literal {
    let text = normalize_string(&format!("{}{}", options.prefix, node.inner_text()));
    if let Some(lang) = node.lang() {
        return language_tagged(text, lang);
    }
    match options.default_lang.as_deref() {
        Some(lang) if options.enforce_default_lang => language_tagged(text, lang),
        _ => {
            debug!(tag = node.tag(), "literal without language tag");
            Literal::new_simple_literal(text)
        }
    }
}

/// [`build_literal`] for callers that require a language tag
pub fn build_literal_strict(node: &Element, options: &LiteralOptions) -> Result<Literal> {
    let literal = build_literal(node, options);
    if literal.language().is_some() {
        Ok(literal)
    } else {
        Err(Error::unlocated(ErrorKind::MissingLanguage {
            text: literal.value().to_string(),
        }))
    }
}

/// WKT point literal from coordinate text such as `48.2066 16.37341`.
///
/// The text must split on `split_char` into exactly two numbers, which are
/// emitted in the given order and always joined by a space.
pub fn build_point_literal(
    node: &Element,
    datatype: NamedNodeRef<'_>,
    split_char: char,
) -> Result<Literal> {
    let text = node.inner_text();
    let trimmed = text.trim();
    let malformed = || {
        Error::unlocated(ErrorKind::MalformedCoordinates {
            text: trimmed.to_string(),
        })
    };

    let tokens: Vec<&str> = trimmed.split(split_char).map(str::trim).collect();
    let [first, second] = tokens.as_slice() else {
        return Err(malformed());
    };
    if first.is_empty() || second.is_empty() {
        return Err(malformed());
    }
    if !is_coordinate(first) || !is_coordinate(second) {
        return Err(malformed());
    }

    Ok(Literal::new_typed_literal(
        format!("Point({first} {second})"),
        datatype,
    ))
}

/// Finite decimal number; rejects `NaN`, `inf` and overflowing exponents
fn is_coordinate(token: &str) -> bool {
    token.parse::<f64>().is_ok_and(f64::is_finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::geo;
    use crate::xml::Document;

    fn parse(xml: &str) -> Result<Document> {
        Document::parse(xml)
    }

    #[test]
    fn test_literal_from_inner_text() -> Result<()> {
        let doc = parse("<persName>\n  <forename>Olaf</forename>\n  <surname>Gulbransson</surname>\n</persName>")?;
        let literal = build_literal(&doc.root, &LiteralOptions::new());
        assert_eq!(literal, Literal::new_simple_literal("Olaf Gulbransson"));
        Ok(())
    }

    #[test]
    fn test_explicit_language_wins() -> Result<()> {
        let doc = parse(r#"<placeName xml:lang="de">Reval</placeName>"#)?;
        let options = LiteralOptions::new().with_default_lang("en");
        let literal = build_literal(&doc.root, &options);
        assert_eq!(literal.value(), "Reval");
        assert_eq!(literal.language(), Some("de"));
        Ok(())
    }

    #[test]
    fn test_default_language_only_when_enforced() -> Result<()> {
        let doc = parse("<placeName>Reval</placeName>")?;
        let enforced = build_literal(&doc.root, &LiteralOptions::new().with_default_lang("de"));
        assert_eq!(enforced.language(), Some("de"));

        let relaxed = LiteralOptions::new()
            .with_default_lang("de")
            .enforce_default_lang(false);
        assert_eq!(build_literal(&doc.root, &relaxed).language(), None);
        Ok(())
    }

    #[test]
    fn test_prefix_is_normalized_with_text() -> Result<()> {
        let doc = parse("<orgName>  Stahlhelm </orgName>")?;
        let options = LiteralOptions::new().with_prefix("Org: ");
        assert_eq!(build_literal(&doc.root, &options).value(), "Org: Stahlhelm");
        Ok(())
    }

    #[test]
    fn test_empty_element_gives_empty_literal() -> Result<()> {
        let doc = parse(r#"<placeName xml:lang="und" type="alt_label"></placeName>"#)?;
        let literal = build_literal(&doc.root, &LiteralOptions::new());
        assert_eq!(literal.value(), "");
        assert_eq!(literal.language(), Some("und"));
        Ok(())
    }

    #[test]
    fn test_strict_requires_language() -> Result<()> {
        let doc = parse("<persName>Ronja, Hanna</persName>")?;
        let result = build_literal_strict(&doc.root, &LiteralOptions::new());
        assert!(matches!(
            result.as_ref().map_err(Error::kind),
            Err(ErrorKind::MissingLanguage { text }) if text == "Ronja, Hanna"
        ));
        let tagged = build_literal_strict(&doc.root, &LiteralOptions::new().with_default_lang("de"))?;
        assert_eq!(tagged.language(), Some("de"));
        Ok(())
    }

    #[test]
    fn test_point_literal() -> Result<()> {
        let doc = parse("<geo>48.2066 16.37341</geo>")?;
        let literal = build_point_literal(&doc.root, geo::WKT_LITERAL, ' ')?;
        assert_eq!(
            literal,
            Literal::new_typed_literal("Point(48.2066 16.37341)", geo::WKT_LITERAL)
        );
        Ok(())
    }

    #[test]
    fn test_point_literal_custom_separator() -> Result<()> {
        let doc = parse("<geo> 48.2066,16.37341 </geo>")?;
        let literal = build_point_literal(&doc.root, geo::WKT_LITERAL, ',')?;
        assert_eq!(literal.value(), "Point(48.2066 16.37341)");
        Ok(())
    }

    #[test]
    fn test_malformed_coordinates() -> Result<()> {
        for text in [
            "123 456 789",
            "123",
            "",
            "12  34",
            "north south",
            "NaN inf",
            "1e400 -infinity",
            "48.2 NaN",
        ] {
            let doc = parse(&format!("<geo>{text}</geo>"))?;
            let result = build_point_literal(&doc.root, geo::WKT_LITERAL, ' ');
            assert!(
                matches!(
                    result.as_ref().map_err(Error::kind),
                    Err(ErrorKind::MalformedCoordinates { .. })
                ),
                "{text:?}"
            );
        }
        Ok(())
    }
}
