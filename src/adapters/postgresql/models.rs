//! PostgreSQL row and parameter models
//!
//! Converts driver rows into [`RawRecord`]s and binds worker partitions to
//! prepared statements. Templates use `:name` placeholders; PostgreSQL wants
//! `$n`, so placeholders are rewritten to `$n::int8` before the statement is
//! prepared. The cast pins the parameter type whatever column it is compared to.

use crate::adapters::database::traits::Partition;
use crate::domain::{FieldValue, RawRecord, SourceError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::{Captures, Regex};
use std::error::Error;
use std::sync::OnceLock;
use tokio_postgres::types::{FromSql, Type};
use tokio_postgres::Row;

/// Named parameters a template may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedParam {
    /// `:max_thread`
    MaxThread,
    /// `:thread_id`
    ThreadId,
}

impl NamedParam {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "max_thread" => Some(NamedParam::MaxThread),
            "thread_id" => Some(NamedParam::ThreadId),
            _ => None,
        }
    }

    fn value(self, partition: Partition) -> i64 {
        match self {
            NamedParam::MaxThread => partition.max_thread,
            NamedParam::ThreadId => partition.thread_id,
        }
    }
}

/// A template rewritten to positional placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedSql {
    /// SQL with `$n` placeholders
    pub sql: String,
    /// Which named parameter each `$n` stands for, in position order
    pub params: Vec<NamedParam>,
}

fn named_param_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // A preceding ':' means a `::type` cast, which must be left alone
        Regex::new(r"(^|[^:]):(max_thread|thread_id)\b").expect("named parameter pattern is valid")
    })
}

/// Rewrites `:max_thread` / `:thread_id` to `$n::int8`
///
/// Positions are assigned in order of first appearance and reused for repeats.
pub fn translate_named_params(sql: &str) -> TranslatedSql {
    let mut params: Vec<NamedParam> = Vec::new();

    let rewritten = named_param_pattern().replace_all(sql, |cap: &Captures<'_>| {
        let Some(param) = NamedParam::from_name(&cap[2]) else {
            return cap[0].to_string();
        };
        let position = match params.iter().position(|p| *p == param) {
            Some(existing) => existing + 1,
            None => {
                params.push(param);
                params.len()
            }
        };
        format!("{}${}::int8", &cap[1], position)
    });

    TranslatedSql {
        sql: rewritten.into_owned(),
        params,
    }
}

/// Builds bind values for a prepared statement
///
/// # Errors
///
/// Returns [`SourceError::QueryFailed`] if the statement uses partition
/// parameters but no partition was given, or if the server expects different
/// parameters than the template names.
pub fn bind_values(
    params: &[NamedParam],
    types: &[Type],
    partition: Option<Partition>,
) -> Result<Vec<i64>, SourceError> {
    if params.len() != types.len() {
        return Err(SourceError::QueryFailed(format!(
            "statement expects {} parameters but the template names {}",
            types.len(),
            params.len()
        )));
    }

    if let Some(ty) = types.iter().find(|ty| **ty != Type::INT8) {
        return Err(SourceError::QueryFailed(format!(
            "unexpected parameter type {ty}, partition parameters are bound as int8"
        )));
    }

    if params.is_empty() {
        return Ok(Vec::new());
    }

    let partition = partition.ok_or_else(|| {
        SourceError::QueryFailed(
            "statement references :max_thread/:thread_id but no partition was given".to_string(),
        )
    })?;

    Ok(params.iter().map(|param| param.value(partition)).collect())
}

/// Decodes every column of a row into a [`RawRecord`]
///
/// # Errors
///
/// Returns [`SourceError::InvalidValue`] if a column cannot be decoded.
pub fn row_to_record(row: &Row) -> Result<RawRecord, SourceError> {
    let mut values = Vec::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        let value = column_value(row, idx, column.type_()).map_err(|e| {
            SourceError::InvalidValue(format!("column '{}': {}", column.name(), e))
        })?;
        values.push(value);
    }
    Ok(RawRecord::new(values))
}

fn column_value(row: &Row, idx: usize, ty: &Type) -> Result<FieldValue, tokio_postgres::Error> {
    let value = if *ty == Type::TEXT
        || *ty == Type::VARCHAR
        || *ty == Type::BPCHAR
        || *ty == Type::NAME
    {
        row.try_get::<_, Option<String>>(idx)?.into()
    } else if *ty == Type::INT2 {
        row.try_get::<_, Option<i16>>(idx)?
            .map(|v| FieldValue::Integer(v.into()))
            .unwrap_or(FieldValue::Null)
    } else if *ty == Type::INT4 {
        row.try_get::<_, Option<i32>>(idx)?
            .map(|v| FieldValue::Integer(v.into()))
            .unwrap_or(FieldValue::Null)
    } else if *ty == Type::INT8 {
        row.try_get::<_, Option<i64>>(idx)?.into()
    } else if *ty == Type::NUMERIC {
        row.try_get::<_, Option<NumericText>>(idx)?
            .map(|v| FieldValue::Text(v.0))
            .unwrap_or(FieldValue::Null)
    } else if *ty == Type::FLOAT4 {
        row.try_get::<_, Option<f32>>(idx)?
            .map(|v| FieldValue::Float(v.into()))
            .unwrap_or(FieldValue::Null)
    } else if *ty == Type::FLOAT8 {
        row.try_get::<_, Option<f64>>(idx)?
            .map(FieldValue::Float)
            .unwrap_or(FieldValue::Null)
    } else if *ty == Type::BOOL {
        row.try_get::<_, Option<bool>>(idx)?
            .map(FieldValue::Bool)
            .unwrap_or(FieldValue::Null)
    } else if *ty == Type::DATE {
        row.try_get::<_, Option<NaiveDate>>(idx)?
            .map(FieldValue::Date)
            .unwrap_or(FieldValue::Null)
    } else if *ty == Type::TIMESTAMP {
        row.try_get::<_, Option<NaiveDateTime>>(idx)?
            .map(FieldValue::Timestamp)
            .unwrap_or(FieldValue::Null)
    } else if *ty == Type::TIMESTAMPTZ {
        row.try_get::<_, Option<DateTime<Utc>>>(idx)?
            .map(|v| FieldValue::Timestamp(v.naive_utc()))
            .unwrap_or(FieldValue::Null)
    } else {
        tracing::debug!(column = idx, pg_type = %ty, "Unsupported column type, reading as NULL");
        FieldValue::Null
    };
    Ok(value)
}

/// NUMERIC decoded to its exact decimal text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericText(pub String);

const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;

impl<'a> FromSql<'a> for NumericText {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        decode_numeric(raw).map(NumericText)
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::NUMERIC
    }
}

fn read_u16(raw: &[u8], at: usize) -> Result<u16, Box<dyn Error + Sync + Send>> {
    raw.get(at..at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| "truncated NUMERIC value".into())
}

/// Binary NUMERIC: ndigits, weight, sign, dscale, then base-10000 digit groups
fn decode_numeric(raw: &[u8]) -> Result<String, Box<dyn Error + Sync + Send>> {
    let ndigits = read_u16(raw, 0)? as usize;
    let weight = read_u16(raw, 2)? as i16 as i32;
    let sign = read_u16(raw, 4)?;
    let dscale = read_u16(raw, 6)? as usize;

    if sign == NUMERIC_NAN {
        return Ok("NaN".to_string());
    }

    let digits = (0..ndigits)
        .map(|i| read_u16(raw, 8 + i * 2))
        .collect::<Result<Vec<_>, _>>()?;
    let group = |i: i32| -> u16 {
        if i < 0 {
            0
        } else {
            digits.get(i as usize).copied().unwrap_or(0)
        }
    };

    let mut text = String::new();
    if sign == NUMERIC_NEG {
        text.push('-');
    }

    if weight < 0 {
        text.push('0');
    } else {
        text.push_str(&group(0).to_string());
        for i in 1..=weight {
            text.push_str(&format!("{:04}", group(i)));
        }
    }

    if dscale > 0 {
        let mut fraction = String::with_capacity(dscale + 4);
        let mut i = weight + 1;
        while fraction.len() < dscale {
            fraction.push_str(&format!("{:04}", group(i)));
            i += 1;
        }
        fraction.truncate(dscale);
        text.push('.');
        text.push_str(&fraction);
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(ndigits: u16, weight: i16, sign: u16, dscale: u16, digits: &[u16]) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(&ndigits.to_be_bytes());
        raw.extend_from_slice(&weight.to_be_bytes());
        raw.extend_from_slice(&sign.to_be_bytes());
        raw.extend_from_slice(&dscale.to_be_bytes());
        for d in digits {
            raw.extend_from_slice(&d.to_be_bytes());
        }
        raw
    }

    #[test]
    fn test_translate_named_params() {
        let translated = translate_named_params(
            "SELECT * FROM acct WHERE MOD(persnbr, :max_thread) = :thread_id",
        );
        assert_eq!(
            translated.sql,
            "SELECT * FROM acct WHERE MOD(persnbr, $1::int8) = $2::int8"
        );
        assert_eq!(
            translated.params,
            vec![NamedParam::MaxThread, NamedParam::ThreadId]
        );
    }

    #[test]
    fn test_translate_repeated_and_reordered() {
        let translated =
            translate_named_params("WHERE a = :thread_id AND b = :thread_id AND c < :max_thread");
        assert_eq!(
            translated.sql,
            "WHERE a = $1::int8 AND b = $1::int8 AND c < $2::int8"
        );
        assert_eq!(
            translated.params,
            vec![NamedParam::ThreadId, NamedParam::MaxThread]
        );
    }

    #[test]
    fn test_translate_leaves_casts_alone() {
        let translated = translate_named_params("SELECT x::thread_id_type, y::text FROM t");
        assert_eq!(translated.sql, "SELECT x::thread_id_type, y::text FROM t");
        assert!(translated.params.is_empty());
    }

    #[test]
    fn test_translate_no_params() {
        let translated = translate_named_params("SELECT 1");
        assert_eq!(translated.sql, "SELECT 1");
        assert!(translated.params.is_empty());
    }

    #[test]
    fn test_bind_values_requires_partition() {
        let err = bind_values(&[NamedParam::MaxThread], &[Type::INT8], None).unwrap_err();
        assert!(matches!(err, SourceError::QueryFailed(_)));
    }

    #[test]
    fn test_bind_values_count_mismatch() {
        let err = bind_values(&[], &[Type::INT8], Some(Partition::new(2, 0))).unwrap_err();
        assert!(matches!(err, SourceError::QueryFailed(_)));
    }

    #[test]
    fn test_bind_values_without_params() {
        let values = bind_values(&[], &[], None).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_bind_values_with_partition() {
        let values = bind_values(
            &[NamedParam::ThreadId, NamedParam::MaxThread],
            &[Type::INT8, Type::INT8],
            Some(Partition::new(4, 1)),
        )
        .unwrap();
        assert_eq!(values, vec![1, 4]);
    }

    #[test]
    fn test_bind_values_rejects_other_types() {
        let err = bind_values(&[NamedParam::ThreadId], &[Type::TEXT], Some(Partition::new(4, 1)))
            .unwrap_err();
        assert!(matches!(err, SourceError::QueryFailed(_)));
    }

    #[test]
    fn test_decode_numeric_integer() {
        // 1234567 = [123, 4567], weight 1
        let raw = numeric(2, 1, 0, 0, &[123, 4567]);
        assert_eq!(decode_numeric(&raw).unwrap(), "1234567");
    }

    #[test]
    fn test_decode_numeric_fraction() {
        // -12.50 with dscale 2
        let raw = numeric(2, 0, NUMERIC_NEG, 2, &[12, 5000]);
        assert_eq!(decode_numeric(&raw).unwrap(), "-12.50");
    }

    #[test]
    fn test_decode_numeric_small_fraction() {
        // 0.00012 = [1, 2000] starting at weight -1
        let raw = numeric(2, -1, 0, 5, &[1, 2000]);
        assert_eq!(decode_numeric(&raw).unwrap(), "0.00012");
    }

    #[test]
    fn test_decode_numeric_zero_and_nan() {
        assert_eq!(decode_numeric(&numeric(0, 0, 0, 0, &[])).unwrap(), "0");
        assert_eq!(decode_numeric(&numeric(0, 0, NUMERIC_NAN, 0, &[])).unwrap(), "NaN");
    }

    #[test]
    fn test_decode_numeric_truncated() {
        assert!(decode_numeric(&[0, 2, 0, 0]).is_err());
    }
}
