//! JSON encoding of cached values.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::CacheResult;

pub fn encode<T: Serialize>(value: &T) -> CacheResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> CacheResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}
