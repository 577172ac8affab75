//! Raw source records
//!
//! Rows come back from the data sources as positional values. Position *i* means a
//! specific business attribute by convention only, and rows may be shorter than the
//! widest layout, so every accessor distinguishes "position missing" from "position
//! present but empty".

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// A single untyped column value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// SQL NULL
    Null,
    /// Character data
    Text(String),
    /// Integral numbers of any width
    Integer(i64),
    /// Floating point numbers
    Float(f64),
    /// Booleans, rendered as `1`/`0`
    Bool(bool),
    /// Calendar dates
    Date(NaiveDate),
    /// Timestamps without zone
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    /// Renders the value the way it is written into a report line
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Whether the value renders to an empty string
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Float(n) => write!(f, "{n}"),
            FieldValue::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// One row as returned by a query: an ordered, variable-length list of values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    values: Vec<FieldValue>,
}

impl RawRecord {
    /// Creates a record from its values
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self { values }
    }

    /// Number of positions actually present
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record has no positions at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`, `None` when the row is shorter than that
    pub fn get(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index)
    }

    /// Rendered value at `index`, empty string when the position is missing
    pub fn text(&self, index: usize) -> String {
        self.get(index).map(FieldValue::render).unwrap_or_default()
    }

    /// Iterator over the present values
    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.values.iter()
    }
}

impl<V: Into<FieldValue>> FromIterator<V> for RawRecord {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// A fully materialized result set with column names
///
/// Used for the customer lookup, where columns are addressed by name.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<RawRecord>,
}

impl ResultSet {
    /// Creates a result set from column names and rows
    pub fn new(columns: Vec<String>, rows: Vec<RawRecord>) -> Self {
        Self { columns, rows }
    }

    /// Column names in select order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in fetch order
    pub fn rows(&self) -> &[RawRecord] {
        &self.rows
    }

    /// Position of a column, matched case-insensitively
    ///
    /// PostgreSQL folds unquoted identifiers to lower case, so `CXCCustomerID`
    /// commonly comes back as `cxccustomerid`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_render() {
        assert_eq!(FieldValue::Null.render(), "");
        assert_eq!(FieldValue::from("abc").render(), "abc");
        assert_eq!(FieldValue::Integer(-12).render(), "-12");
        assert_eq!(FieldValue::Float(2.5).render(), "2.5");
        assert_eq!(FieldValue::Bool(true).render(), "1");
        assert_eq!(FieldValue::Bool(false).render(), "0");

        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(FieldValue::Date(date).render(), "2024-03-09");
        let ts = date.and_hms_opt(7, 5, 0).unwrap();
        assert_eq!(FieldValue::Timestamp(ts).render(), "2024-03-09 07:05:00");
    }

    #[test]
    fn test_field_value_blank() {
        assert!(FieldValue::Null.is_blank());
        assert!(FieldValue::from("").is_blank());
        assert!(!FieldValue::from(" ").is_blank());
        assert!(!FieldValue::Integer(0).is_blank());
    }

    #[test]
    fn test_missing_vs_empty_position() {
        let record: RawRecord = vec![FieldValue::from("a"), FieldValue::Null]
            .into_iter()
            .collect();

        assert_eq!(record.len(), 2);
        assert_eq!(record.get(1), Some(&FieldValue::Null));
        assert_eq!(record.get(2), None);
        assert_eq!(record.text(1), "");
        assert_eq!(record.text(2), "");
    }

    #[test]
    fn test_option_conversion() {
        let record: RawRecord = vec![Some("x"), None].into_iter().collect();
        assert_eq!(record.get(0), Some(&FieldValue::from("x")));
        assert_eq!(record.get(1), Some(&FieldValue::Null));
    }

    #[test]
    fn test_result_set_column_lookup() {
        let set = ResultSet::new(
            vec!["persnbr".to_string(), "cxccustomerid".to_string()],
            vec![],
        );
        assert_eq!(set.column_index("PERSNBR"), Some(0));
        assert_eq!(set.column_index("CXCCustomerID"), Some(1));
        assert_eq!(set.column_index("registeredEmail"), None);
    }
}
