//! Date classification into XML Schema typed literals

use oxrdf::{Literal, NamedNodeRef};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::vocab::xsd;

/// Lexical form used when no date is present
pub const UNDEFINED: &str = "undefined";

/// Which datatype a date string represents. Each variant carries the trimmed
/// lexical form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateKind {
    /// `YYYY-MM-DD`
    Date(String),
    /// `YYYY-MM`
    YearMonth(String),
    /// `YYYY`
    Year(String),
    /// `YYYY-MM-DDTHH:MM:SS`
    DateTime(String),
    /// `YYYY-MM-DDTHH:MM:SS` followed by `Z` or `±HH:MM`
    DateTimeWithOffset(String),
    /// Any other non-empty text
    PlainString(String),
    /// Absent or blank input
    Undefined,
}

impl DateKind {
    /// XML Schema datatype of this classification; `None` for `Undefined`
    pub fn datatype(&self) -> Option<NamedNodeRef<'static>> {
        match self {
            Self::Date(_) => Some(xsd::DATE),
            Self::YearMonth(_) => Some(xsd::G_YEAR_MONTH),
            Self::Year(_) => Some(xsd::G_YEAR),
            Self::DateTime(_) | Self::DateTimeWithOffset(_) => Some(xsd::DATE_TIME),
            Self::PlainString(_) => Some(xsd::STRING),
            Self::Undefined => None,
        }
    }

    pub fn lexical(&self) -> &str {
        match self {
            Self::Date(s)
            | Self::YearMonth(s)
            | Self::Year(s)
            | Self::DateTime(s)
            | Self::DateTimeWithOffset(s)
            | Self::PlainString(s) => s,
            Self::Undefined => UNDEFINED,
        }
    }

    /// Typed literal, or `"undefined"@en` for `Undefined`
    pub fn into_literal(self) -> Literal {
        match self.datatype() {
            Some(datatype) => Literal::new_typed_literal(self.lexical(), datatype),
            None => Literal::new_language_tagged_literal_unchecked(UNDEFINED, "en"),
        }
    }
}

const DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const LOCAL_DATETIME: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const LOCAL_DATETIME_FRAC: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const UTC_DATETIME: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
const UTC_DATETIME_FRAC: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]Z");
const OFFSET_DATETIME: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
);
const OFFSET_DATETIME_FRAC: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
);

fn is_date(value: &str) -> bool {
    Date::parse(value, DATE).is_ok()
}

fn is_local_datetime(value: &str) -> bool {
    PrimitiveDateTime::parse(value, LOCAL_DATETIME).is_ok()
        || PrimitiveDateTime::parse(value, LOCAL_DATETIME_FRAC).is_ok()
}

fn is_offset_datetime(value: &str) -> bool {
    PrimitiveDateTime::parse(value, UTC_DATETIME).is_ok()
        || PrimitiveDateTime::parse(value, UTC_DATETIME_FRAC).is_ok()
        || OffsetDateTime::parse(value, OFFSET_DATETIME).is_ok()
        || OffsetDateTime::parse(value, OFFSET_DATETIME_FRAC).is_ok()
}

/// Every pattern opens with a four digit year; `time` alone would also
/// take a leading sign.
fn starts_with_year(value: &str) -> bool {
    value.len() >= 4 && value.bytes().take(4).all(|b| b.is_ascii_digit())
}

/// Classify a date string. Patterns are anchored to the whole trimmed
/// value and checked for calendar validity; anything else is plain text.
pub fn classify(raw: Option<&str>) -> DateKind {
    let value = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return DateKind::Undefined,
    };
    let owned = value.to_string();

    if !starts_with_year(value) {
        DateKind::PlainString(owned)
    } else if is_date(value) {
        DateKind::Date(owned)
    } else if is_date(&format!("{value}-01")) {
        // a year-month is valid when the first of that month is
        DateKind::YearMonth(owned)
    } else if is_date(&format!("{value}-01-01")) {
        DateKind::Year(owned)
    } else if is_local_datetime(value) {
        DateKind::DateTime(owned)
    } else if is_offset_datetime(value) {
        DateKind::DateTimeWithOffset(owned)
    } else {
        DateKind::PlainString(owned)
    }
}

/// Typed literal for a date string; `"undefined"@en` when absent or blank.
pub fn date_to_literal(raw: Option<&str>) -> Literal {
    classify(raw).into_literal()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(value: &str, datatype: NamedNodeRef<'_>) -> Literal {
        Literal::new_typed_literal(value, datatype)
    }

    #[test]
    fn test_undefined_inputs() {
        let undefined = Literal::new_language_tagged_literal_unchecked("undefined", "en");
        assert_eq!(date_to_literal(None), undefined);
        assert_eq!(date_to_literal(Some("")), undefined);
        assert_eq!(date_to_literal(Some("  \n ")), undefined);
        assert_eq!(classify(None), DateKind::Undefined);
    }

    #[test]
    fn test_calendar_patterns() {
        assert_eq!(date_to_literal(Some("2000-01-01")), typed("2000-01-01", xsd::DATE));
        assert_eq!(date_to_literal(Some("2000-01")), typed("2000-01", xsd::G_YEAR_MONTH));
        assert_eq!(date_to_literal(Some("2000")), typed("2000", xsd::G_YEAR));
    }

    #[test]
    fn test_datetime_patterns_preserve_offset() {
        for value in [
            "2000-01-01T00:00:00",
            "2000-01-01T00:00:00Z",
            "2000-01-01T00:00:00+01:00",
            "2000-01-01T00:00:00-05:30",
        ] {
            assert_eq!(date_to_literal(Some(value)), typed(value, xsd::DATE_TIME), "{value}");
        }
        assert_eq!(
            classify(Some("2000-01-01T00:00:00")),
            DateKind::DateTime("2000-01-01T00:00:00".to_string())
        );
        assert_eq!(
            classify(Some("2000-01-01T00:00:00+01:00")),
            DateKind::DateTimeWithOffset("2000-01-01T00:00:00+01:00".to_string())
        );
    }

    #[test]
    fn test_plain_strings() {
        assert_eq!(
            date_to_literal(Some("Before Christ")),
            typed("Before Christ", xsd::STRING)
        );
        for value in [
            "20000",
            "200",
            "2000-1-1",
            "2000-13",
            "2000-02-30",
            "1955?",
            "04.07.1905",
            "+2000",
            "-2000",
            "+2000-01-01",
            "-0044-03-15T12:00:00",
        ] {
            assert_eq!(
                classify(Some(value)),
                DateKind::PlainString(value.to_string()),
                "{value}"
            );
        }
    }

    #[test]
    fn test_input_is_trimmed() {
        assert_eq!(date_to_literal(Some(" 1873-05-26\n")), typed("1873-05-26", xsd::DATE));
    }

    #[test]
    fn test_lexical_and_datatype() {
        let kind = classify(Some("1902"));
        assert_eq!(kind.lexical(), "1902");
        assert_eq!(kind.datatype(), Some(xsd::G_YEAR));
        assert_eq!(DateKind::Undefined.lexical(), UNDEFINED);
        assert_eq!(DateKind::Undefined.datatype(), None);
    }
}
