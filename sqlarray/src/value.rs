//! SQLite value model and column type mapping

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::error::Error;

/// A value as SQLite stores it.
///
/// Keys are always `SqlValue`s. Table values are `SqlValue`s after encoding,
/// which is what the search operations match against.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// NULL
    Null,
    /// INTEGER storage class
    Integer(i64),
    /// REAL storage class
    Real(f64),
    /// TEXT storage class
    Text(String),
    /// BLOB storage class
    Blob(Vec<u8>),
}

impl SqlValue {
    /// The storage class of this value
    pub fn type_tag(&self) -> TypeTag {
        match self {
            SqlValue::Null => TypeTag::Null,
            SqlValue::Integer(_) => TypeTag::Integer,
            SqlValue::Real(_) => TypeTag::Real,
            SqlValue::Text(_) => TypeTag::Text,
            SqlValue::Blob(_) => TypeTag::Blob,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Real(r) => write!(f, "{:?}", r),
            SqlValue::Text(s) => write!(f, "{}", s),
            SqlValue::Blob(b) => {
                write!(f, "x'")?;
                for byte in b {
                    write!(f, "{:02x}", byte)?;
                }
                write!(f, "'")
            }
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            SqlValue::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            SqlValue::Real(f) => ToSqlOutput::Borrowed(ValueRef::Real(*f)),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SqlValue::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

impl FromSql for SqlValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> { Ok(rusqlite::types::Value::from(value).into()) }
}

/// Convert rusqlite Value to our SqlValue
impl From<rusqlite::types::Value> for SqlValue {
    fn from(value: rusqlite::types::Value) -> Self {
        match value {
            rusqlite::types::Value::Null => SqlValue::Null,
            rusqlite::types::Value::Integer(i) => SqlValue::Integer(i),
            rusqlite::types::Value::Real(f) => SqlValue::Real(f),
            rusqlite::types::Value::Text(s) => SqlValue::Text(s),
            rusqlite::types::Value::Blob(b) => SqlValue::Blob(b),
        }
    }
}

impl From<SqlValue> for rusqlite::types::Value {
    fn from(value: SqlValue) -> Self {
        match value {
            SqlValue::Null => rusqlite::types::Value::Null,
            SqlValue::Integer(i) => rusqlite::types::Value::Integer(i),
            SqlValue::Real(f) => rusqlite::types::Value::Real(f),
            SqlValue::Text(s) => rusqlite::types::Value::Text(s),
            SqlValue::Blob(b) => rusqlite::types::Value::Blob(b),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self { SqlValue::Integer(value) }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self { SqlValue::Integer(value as i64) }
}

impl From<u32> for SqlValue {
    fn from(value: u32) -> Self { SqlValue::Integer(value as i64) }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self { SqlValue::Integer(if value { 1 } else { 0 }) }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self { SqlValue::Real(value) }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self { SqlValue::Text(value.to_owned()) }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self { SqlValue::Text(value) }
}

impl From<&String> for SqlValue {
    fn from(value: &String) -> Self { SqlValue::Text(value.clone()) }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self { SqlValue::Blob(value) }
}

impl From<&[u8]> for SqlValue {
    fn from(value: &[u8]) -> Self { SqlValue::Blob(value.to_vec()) }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

impl PartialEq<str> for SqlValue {
    fn eq(&self, other: &str) -> bool { self.as_str() == Some(other) }
}

impl PartialEq<&str> for SqlValue {
    fn eq(&self, other: &&str) -> bool { self.as_str() == Some(*other) }
}

/// SQLite's native column types, used as optional column type hints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null,
    Integer,
    Real,
    Text,
    Blob,
}

impl TypeTag {
    pub const ALL: [TypeTag; 5] = [TypeTag::Null, TypeTag::Integer, TypeTag::Real, TypeTag::Text, TypeTag::Blob];

    /// Get the SQLite type name for column creation
    pub fn sqlite_type(&self) -> &'static str {
        match self {
            TypeTag::Null => "NULL",
            TypeTag::Integer => "INTEGER",
            TypeTag::Real => "REAL",
            TypeTag::Text => "TEXT",
            TypeTag::Blob => "BLOB",
        }
    }

    /// Map a representative sample value to a column type.
    ///
    /// Only integers, reals and blobs have an unambiguous mapping. A text sample
    /// is rejected rather than guessed at; pass `TypeTag::Text` (or `"TEXT"`)
    /// explicitly instead.
    pub fn from_sample(sample: &SqlValue) -> Result<Self, Error> {
        match sample {
            SqlValue::Integer(_) => Ok(TypeTag::Integer),
            SqlValue::Real(_) => Ok(TypeTag::Real),
            SqlValue::Blob(_) => Ok(TypeTag::Blob),
            other => Err(Error::InvalidType(format!("no column type for sample value of type {}", other.type_tag()))),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.sqlite_type()) }
}

impl FromStr for TypeTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL.into_iter().find(|tag| tag.sqlite_type() == s).ok_or_else(|| {
            let valid: Vec<&str> = TypeTag::ALL.iter().map(|t| t.sqlite_type()).collect();
            Error::InvalidType(format!("type must be one of {:?} (got {:?})", valid, s))
        })
    }
}
