//! JSON encoding of cached values.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Serializes any value to JSON bytes for storage in a cache.
pub fn serialize_value<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, SerializationError> {
    serde_json::to_vec(value).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes read from a cache.
pub fn deserialize_value<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Genre, Movie, MoviePage};

    #[test]
    fn test_movie_page_survives_cache_encoding() {
        let movie = Movie::new(42, "X").with_genres(vec![Genre::new(1, "Action")]);
        let page = MoviePage::new(vec![movie], 1, 1, 20);

        let bytes = serialize_value(&page).unwrap();
        let decoded: MoviePage = deserialize_value(&bytes).unwrap();

        assert_eq!(decoded, page);
    }

    #[test]
    fn test_serialize_empty_slice() {
        let genres: Vec<Genre> = Vec::new();
        assert_eq!(serialize_value(&genres).unwrap(), b"[]");
    }

    #[test]
    fn test_deserialize_malformed_bytes() {
        let result = deserialize_value::<Vec<Genre>>(b"not valid json");
        assert!(matches!(
            result,
            Err(SerializationError::DeserializeFailed(_))
        ));
    }

    #[test]
    fn test_deserialize_wrong_shape() {
        let result = deserialize_value::<Movie>(b"[1, 2, 3]");
        assert!(matches!(
            result,
            Err(SerializationError::DeserializeFailed(_))
        ));
    }
}
