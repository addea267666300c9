use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stored record. Assigned per resource kind, starting at 1.
pub type RecordId = u64;

/// The closed set of record types served by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    User,
    Category,
    Course,
    Lesson,
    Enrollment,
    Review,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        Self::User,
        Self::Category,
        Self::Course,
        Self::Lesson,
        Self::Enrollment,
        Self::Review,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Category => "category",
            Self::Course => "course",
            Self::Lesson => "lesson",
            Self::Enrollment => "enrollment",
            Self::Review => "review",
        }
    }

    /// URL segment of the collection.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Category => "categories",
            Self::Course => "courses",
            Self::Lesson => "lessons",
            Self::Enrollment => "enrollments",
            Self::Review => "reviews",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::User => "User",
            Self::Category => "Category",
            Self::Course => "Course",
            Self::Lesson => "Lesson",
            Self::Enrollment => "Enrollment",
            Self::Review => "Review",
        };
        f.write_str(name)
    }
}

/// Typed pointer to a row of some table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordRef {
    pub kind: ResourceKind,
    pub id: RecordId,
}

impl RecordRef {
    pub fn new(kind: ResourceKind, id: RecordId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// A foreign key held by a record: the field that holds it and the row it points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub field: &'static str,
    pub target: RecordRef,
}

impl Reference {
    pub fn new(field: &'static str, kind: ResourceKind, id: RecordId) -> Self {
        Self {
            field,
            target: RecordRef::new(kind, id),
        }
    }
}

// ============================================================================
// Decimal
// ============================================================================

/// Total digits allowed in a [`Decimal`].
pub const DECIMAL_MAX_DIGITS: usize = 10;
/// Digits allowed after the point in a [`Decimal`].
pub const DECIMAL_PLACES: usize = 2;

lazy_static! {
    static ref DECIMAL_PATTERN: Regex = Regex::new(r"^([+-]?)([0-9]*)(?:\.([0-9]*))?$").unwrap();
}

/// Fixed-point money amount with two decimal places, stored as hundredths.
///
/// Accepted from JSON as a string (`"19.9"`) or a number (`19.9`), always
/// written back as a string with exactly two decimals (`"19.90"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "DecimalRepr", into = "String")]
pub struct Decimal {
    hundredths: i64,
}

impl Decimal {
    pub fn from_hundredths(hundredths: i64) -> Self {
        Self { hundredths }
    }

    pub fn hundredths(&self) -> i64 {
        self.hundredths
    }

    pub fn parse(raw: &str) -> std::result::Result<Self, String> {
        let raw = raw.trim();
        let caps = DECIMAL_PATTERN
            .captures(raw)
            .ok_or_else(|| "A valid number is required.".to_string())?;

        let negative = &caps[1] == "-";
        let whole = caps[2].trim_start_matches('0');
        let fraction = caps.get(3).map(|m| m.as_str()).unwrap_or("");

        if caps[2].is_empty() && fraction.is_empty() {
            return Err("A valid number is required.".to_string());
        }
        // Trailing zeros do not count against the decimal places.
        let fraction = fraction.trim_end_matches('0');
        if fraction.len() > DECIMAL_PLACES {
            return Err(format!(
                "Ensure that there are no more than {DECIMAL_PLACES} decimal places."
            ));
        }
        if whole.len() + fraction.len() > DECIMAL_MAX_DIGITS {
            return Err(format!(
                "Ensure that there are no more than {DECIMAL_MAX_DIGITS} digits in total."
            ));
        }
        if whole.len() > DECIMAL_MAX_DIGITS - DECIMAL_PLACES {
            return Err(format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                DECIMAL_MAX_DIGITS - DECIMAL_PLACES
            ));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| "A valid number is required.".to_string())?
        };
        let mut fraction_value: i64 = 0;
        for (position, digit) in fraction.chars().enumerate() {
            let digit = digit
                .to_digit(10)
                .map(i64::from)
                .ok_or_else(|| "A valid number is required.".to_string())?;
            fraction_value += digit * if position == 0 { 10 } else { 1 };
        }

        let magnitude = whole_value * 100 + fraction_value;
        Ok(Self {
            hundredths: if negative { -magnitude } else { magnitude },
        })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.hundredths < 0 { "-" } else { "" };
        let magnitude = self.hundredths.unsigned_abs();
        write!(f, "{sign}{}.{:02}", magnitude / 100, magnitude % 100)
    }
}

impl From<Decimal> for String {
    fn from(value: Decimal) -> Self {
        value.to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalRepr {
    Text(String),
    Number(serde_json::Number),
}

impl TryFrom<DecimalRepr> for Decimal {
    type Error = String;

    fn try_from(value: DecimalRepr) -> std::result::Result<Self, Self::Error> {
        match value {
            DecimalRepr::Text(text) => Decimal::parse(&text),
            DecimalRepr::Number(number) => Decimal::parse(&number.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_normalizes_to_two_places() {
        assert_eq!(Decimal::parse("19.9").unwrap().to_string(), "19.90");
        assert_eq!(Decimal::parse("7").unwrap().to_string(), "7.00");
        assert_eq!(Decimal::parse("0.05").unwrap().to_string(), "0.05");
        assert_eq!(Decimal::parse("-3.5").unwrap().to_string(), "-3.50");
        assert_eq!(Decimal::parse(".5").unwrap().hundredths(), 50);
        assert_eq!(Decimal::parse("12.340").unwrap().hundredths(), 1234);
    }

    #[test]
    fn decimal_rejects_bad_input() {
        assert!(Decimal::parse("").is_err());
        assert!(Decimal::parse("abc").is_err());
        assert!(Decimal::parse("1.234").is_err());
        assert!(Decimal::parse("123456789").is_err());
        assert!(Decimal::parse("1e5").is_err());
        assert!(Decimal::parse("1.\u{663}").is_err());
        assert!(Decimal::parse("\u{665}0").is_err());
        assert!(Decimal::parse("\u{ff11}.00").is_err());
    }

    #[test]
    fn decimal_accepts_json_string_and_number() {
        let from_text: Decimal = serde_json::from_str("\"49.99\"").unwrap();
        let from_number: Decimal = serde_json::from_str("49.99").unwrap();
        assert_eq!(from_text, from_number);
        assert_eq!(serde_json::to_string(&from_text).unwrap(), "\"49.99\"");
    }

    #[test]
    fn resource_kind_paths() {
        assert_eq!(ResourceKind::Category.collection(), "categories");
        assert_eq!(ResourceKind::Review.name(), "review");
        assert_eq!(RecordRef::new(ResourceKind::Course, 9).to_string(), "Course 9");
    }
}
