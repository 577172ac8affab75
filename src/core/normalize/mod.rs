//! Record normalization
//!
//! Turns one positional source row into a fixed-width detail record. Layout,
//! by output index:
//!
//! | output    | source                                   |
//! |-----------|------------------------------------------|
//! | 0..=1     | row 0..=1 (account, person)              |
//! | 2         | external customer id override, or row 1  |
//! | 3..=13    | row 2..=12                               |
//! | 14, 15    | email (override or row 13), override flag |
//! | 16..=17   | row 14..=15                              |
//! | 18..=23   | ID block parsed from row 16              |
//! | 24..=29   | row 17..=22                              |
//! | 30, 31    | phone (override or row 23), override flag |
//! | 32..=55   | row 24..=47                              |
//! | 56        | row 49                                   |
//!
//! Positions past the end of the row render as empty strings.

pub mod id_block;

use crate::domain::{CustomerIndex, CustomerOverride, PersonNbr, RawRecord};
use id_block::parse_id_block;
use std::fmt;

pub use id_block::ID_BLOCK_WIDTH;

/// Number of fields in every detail record
pub const DETAIL_FIELD_COUNT: usize = 57;

/// Field delimiter of report lines
pub const FIELD_DELIMITER: char = '|';

const ID_BLOCK_SOURCE: usize = 16;
const EMAIL_SOURCE: usize = 13;
const PHONE_SOURCE: usize = 23;
const TRAILING_SOURCE: usize = 49;

/// A normalized detail record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    fields: Vec<String>,
}

impl DetailRecord {
    /// All fields in output order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The `|`-joined line
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DetailRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, "{FIELD_DELIMITER}")?;
            }
            f.write_str(field)?;
        }
        Ok(())
    }
}

/// Builds detail records against one customer lookup
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    customers: &'a CustomerIndex,
    home_country: &'a str,
}

impl<'a> Normalizer<'a> {
    /// Creates a normalizer
    pub fn new(customers: &'a CustomerIndex, home_country: &'a str) -> Self {
        Self {
            customers,
            home_country,
        }
    }

    /// Normalizes one row
    ///
    /// Returns `None` for rows with fewer than two positions, which lack the
    /// account/person pair every record needs.
    pub fn normalize(&self, record: &RawRecord, is_organization: bool) -> Option<DetailRecord> {
        if record.len() < 2 {
            return None;
        }

        let overrides = if is_organization {
            None
        } else {
            PersonNbr::new(record.text(1)).and_then(|key| self.customers.get(&key))
        };

        let mut fields = Vec::with_capacity(DETAIL_FIELD_COUNT);
        let copy = |fields: &mut Vec<String>, range: std::ops::RangeInclusive<usize>| {
            fields.extend(range.map(|i| record.text(i)));
        };

        copy(&mut fields, 0..=1);

        let identity = overrides
            .and_then(|o| o.external_customer_id.clone())
            .unwrap_or_else(|| record.text(1));
        fields.push(identity);

        copy(&mut fields, 2..=12);
        push_with_flag(&mut fields, overrides, |o| &o.registered_email, record, EMAIL_SOURCE);
        copy(&mut fields, 14..=15);
        fields.extend(parse_id_block(
            &record.text(ID_BLOCK_SOURCE),
            is_organization,
            self.home_country,
        ));
        copy(&mut fields, 17..=22);
        push_with_flag(&mut fields, overrides, |o| &o.registered_phone, record, PHONE_SOURCE);
        copy(&mut fields, 24..=47);
        fields.push(record.text(TRAILING_SOURCE));

        debug_assert_eq!(fields.len(), DETAIL_FIELD_COUNT);
        Some(DetailRecord { fields })
    }
}

/// Pushes the override value and `1`, or the row's own value and `0`
fn push_with_flag(
    fields: &mut Vec<String>,
    overrides: Option<&CustomerOverride>,
    pick: impl Fn(&CustomerOverride) -> &Option<String>,
    record: &RawRecord,
    source: usize,
) {
    match overrides.and_then(|o| pick(o).as_deref()) {
        Some(value) => {
            fields.push(value.to_string());
            fields.push("1".to_string());
        }
        None => {
            fields.push(record.text(source));
            fields.push("0".to_string());
        }
    }
}
