//! JSON encode/decode helpers shared by the executor.
//!
//! Typed decoding goes through `serde`; untyped access uses `serde_json`'s
//! structural `Value` (null, bool, number, string, array, object).

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::RequestError;

pub use serde_json::Value as JsonValue;

/// A decoded JSON object with string keys.
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Decode `bytes` as JSON into `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, RequestError> {
    serde_json::from_slice(bytes).map_err(RequestError::Decode)
}

/// Decode `bytes` as a JSON object. Valid JSON of any other shape is an error.
pub fn decode_object(bytes: &[u8]) -> Result<JsonObject, RequestError> {
    decode(bytes)
}

/// Serialize `value` as compact JSON.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Bytes, RequestError> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(RequestError::Encode)
}
