//! Value codecs
//!
//! A [`Codec`] converts between the values an application works with and the
//! [`SqlValue`] actually written to the `value` column. A store carries a
//! default codec which tables inherit unless they are created with their own.
//!
//! The search operations on a table (`like`, `glob`, `search`, `equal`) always
//! look at the encoded form, so they are only meaningful when the codec
//! produces comparable text, as [`Identity`] and [`JsonCodec`] do.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::CodecError;
use crate::value::{SqlValue, TypeTag};

pub trait Codec {
    /// The application-side value type
    type Value;

    fn encode(&self, value: &Self::Value) -> Result<SqlValue, CodecError>;

    fn decode(&self, stored: SqlValue) -> Result<Self::Value, CodecError>;
}

/// Stores values exactly as given
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Codec for Identity {
    type Value = SqlValue;

    fn encode(&self, value: &SqlValue) -> Result<SqlValue, CodecError> { Ok(value.clone()) }

    fn decode(&self, stored: SqlValue) -> Result<SqlValue, CodecError> { Ok(stored) }
}

/// Stores values as JSON text
pub struct JsonCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    pub fn new() -> Self { Self { _marker: PhantomData } }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Clone for JsonCodec<T> {
    fn clone(&self) -> Self { Self::new() }
}

impl<T> fmt::Debug for JsonCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "JsonCodec<{}>", std::any::type_name::<T>()) }
}

impl<T: Serialize + DeserializeOwned> Codec for JsonCodec<T> {
    type Value = T;

    fn encode(&self, value: &T) -> Result<SqlValue, CodecError> { Ok(SqlValue::Text(serde_json::to_string(value)?)) }

    fn decode(&self, stored: SqlValue) -> Result<T, CodecError> {
        match stored {
            SqlValue::Text(json) => Ok(serde_json::from_str(&json)?),
            other => Err(CodecError::UnexpectedType { expected: TypeTag::Text, found: other.type_tag() }),
        }
    }
}

/// Stores values as bincode blobs.
///
/// Blobs are not meaningful to the text search operations; use `equal` with an
/// encoded blob, or a text codec, if values need to be searched.
pub struct BincodeCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> BincodeCodec<T> {
    pub fn new() -> Self { Self { _marker: PhantomData } }
}

impl<T> Default for BincodeCodec<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Clone for BincodeCodec<T> {
    fn clone(&self) -> Self { Self::new() }
}

impl<T> fmt::Debug for BincodeCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "BincodeCodec<{}>", std::any::type_name::<T>()) }
}

impl<T: Serialize + DeserializeOwned> Codec for BincodeCodec<T> {
    type Value = T;

    fn encode(&self, value: &T) -> Result<SqlValue, CodecError> { Ok(SqlValue::Blob(bincode::serialize(value)?)) }

    fn decode(&self, stored: SqlValue) -> Result<T, CodecError> {
        match stored {
            SqlValue::Blob(bytes) => Ok(bincode::deserialize(&bytes)?),
            other => Err(CodecError::UnexpectedType { expected: TypeTag::Blob, found: other.type_tag() }),
        }
    }
}

type EncodeFn<V> = Arc<dyn Fn(&V) -> Result<SqlValue, CodecError> + Send + Sync>;
type DecodeFn<V> = Arc<dyn Fn(SqlValue) -> Result<V, CodecError> + Send + Sync>;

/// A codec built from a pair of functions
///
/// ```rust,ignore
/// let upper = FnCodec::new(
///     |v: &String| Ok(SqlValue::Text(v.to_uppercase())),
///     |stored| stored.as_str().map(str::to_owned).ok_or_else(|| CodecError::Custom("not text".into())),
/// );
/// ```
pub struct FnCodec<V> {
    encode: EncodeFn<V>,
    decode: DecodeFn<V>,
}

impl<V> FnCodec<V> {
    pub fn new<E, D>(encode: E, decode: D) -> Self
    where
        E: Fn(&V) -> Result<SqlValue, CodecError> + Send + Sync + 'static,
        D: Fn(SqlValue) -> Result<V, CodecError> + Send + Sync + 'static,
    {
        Self { encode: Arc::new(encode), decode: Arc::new(decode) }
    }
}

impl<V> Clone for FnCodec<V> {
    fn clone(&self) -> Self { Self { encode: self.encode.clone(), decode: self.decode.clone() } }
}

impl<V> fmt::Debug for FnCodec<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "FnCodec<{}>", std::any::type_name::<V>()) }
}

impl<V> Codec for FnCodec<V> {
    type Value = V;

    fn encode(&self, value: &V) -> Result<SqlValue, CodecError> { (self.encode)(value) }

    fn decode(&self, stored: SqlValue) -> Result<V, CodecError> { (self.decode)(stored) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Pair {
        one: String,
        two: String,
    }

    #[test]
    fn test_json_codec_stores_text() {
        let codec = JsonCodec::<Pair>::new();
        let stored = codec.encode(&Pair { one: "1".into(), two: "2".into() }).unwrap();
        assert_eq!(stored, SqlValue::from(r#"{"one":"1","two":"2"}"#));
    }

    #[test]
    fn test_json_codec_rejects_blob() {
        let codec = JsonCodec::<Pair>::new();
        let err = codec.decode(SqlValue::Blob(vec![1, 2, 3])).unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedType { expected: TypeTag::Text, found: TypeTag::Blob }));
    }

    #[test]
    fn test_bincode_codec_stores_blob() {
        let codec = BincodeCodec::<Vec<u32>>::new();
        let stored = codec.encode(&vec![1, 2, 3]).unwrap();
        assert_eq!(stored.type_tag(), TypeTag::Blob);
        assert!(matches!(codec.decode(SqlValue::from("nope")), Err(CodecError::UnexpectedType { .. })));
    }

    #[test]
    fn test_fn_codec() {
        let codec = FnCodec::new(
            |v: &i64| Ok(SqlValue::Text(format!("#{}", v))),
            |stored: SqlValue| {
                stored
                    .as_str()
                    .and_then(|s| s.strip_prefix('#'))
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| CodecError::Custom(format!("bad counter {}", stored)))
            },
        );
        assert_eq!(codec.encode(&12).unwrap(), SqlValue::from("#12"));
        assert_eq!(codec.decode(SqlValue::from("#12")).unwrap(), 12);
        assert!(matches!(codec.decode(SqlValue::from("12")), Err(CodecError::Custom(_))));
    }
}
