//! Customer override lookup
//!
//! The secondary source knows some person attributes better than the primary one:
//! the external customer id and the registered email/phone. The lookup is built once
//! per run and shared read-only by every extraction worker.

use super::ids::PersonNbr;
use super::record::{RawRecord, ResultSet};
use std::collections::HashMap;

/// Column carrying the person key in the customer result set
pub const PERSON_KEY_COLUMN: &str = "persnbr";
/// Column carrying the external customer id
pub const CUSTOMER_ID_COLUMN: &str = "CXCCustomerID";
/// Column carrying the registered email
pub const EMAIL_COLUMN: &str = "registeredEmail";
/// Column carrying the registered phone
pub const PHONE_COLUMN: &str = "registeredPhone";

/// Override attributes for one person
///
/// Empty strings are stored as `None`; an override only applies when it has a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerOverride {
    /// External customer identifier
    pub external_customer_id: Option<String>,
    /// Registered email address
    pub registered_email: Option<String>,
    /// Registered phone number
    pub registered_phone: Option<String>,
}

impl CustomerOverride {
    /// Creates an override, discarding blank values
    pub fn new(
        external_customer_id: Option<String>,
        registered_email: Option<String>,
        registered_phone: Option<String>,
    ) -> Self {
        Self {
            external_customer_id: non_blank(external_customer_id),
            registered_email: non_blank(registered_email),
            registered_phone: non_blank(registered_phone),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Person number to override mapping
#[derive(Debug, Clone, Default)]
pub struct CustomerIndex {
    entries: HashMap<PersonNbr, CustomerOverride>,
}

impl CustomerIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from a customer result set
    ///
    /// Rows whose key column is null or blank are skipped. When a key repeats, the
    /// later row replaces the earlier one.
    pub fn from_result_set(set: &ResultSet) -> Self {
        let mut index = Self::new();

        let Some(key_col) = set.column_index(PERSON_KEY_COLUMN) else {
            tracing::warn!(
                columns = ?set.columns(),
                "Customer result set has no {} column, no overrides loaded",
                PERSON_KEY_COLUMN
            );
            return index;
        };
        let id_col = set.column_index(CUSTOMER_ID_COLUMN);
        let email_col = set.column_index(EMAIL_COLUMN);
        let phone_col = set.column_index(PHONE_COLUMN);

        let column_text = |row: &RawRecord, col: Option<usize>| -> Option<String> {
            col.and_then(|c| row.get(c)).map(|v| v.render())
        };

        for row in set.rows() {
            let Some(persnbr) = PersonNbr::new(row.text(key_col)) else {
                continue;
            };
            let entry = CustomerOverride::new(
                column_text(row, id_col),
                column_text(row, email_col),
                column_text(row, phone_col),
            );
            index.insert(persnbr, entry);
        }

        index
    }

    /// Adds or replaces the override for a person
    pub fn insert(&mut self, persnbr: PersonNbr, entry: CustomerOverride) {
        self.entries.insert(persnbr, entry);
    }

    /// Override for a person, if any
    pub fn get(&self, persnbr: &PersonNbr) -> Option<&CustomerOverride> {
        self.entries.get(persnbr)
    }

    /// Number of persons with an override
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no overrides
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
