use serde_json::Value;
use thiserror::Error;

use super::movie::Movie;

/// One raw hit: the index-assigned id and the stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub source: Value,
}

#[derive(Debug, Error)]
#[error("failed to decode movie document {id}: {source}")]
pub struct MapError {
    pub id: String,
    #[source]
    pub source: serde_json::Error,
}

/// Turn hits into movies, in hit order, with `id` taken from the hit rather
/// than from whatever the document carries.
pub fn map_hits(hits: Vec<SearchHit>) -> Result<Vec<Movie>, MapError> {
    hits.into_iter()
        .map(|hit| {
            let mut movie: Movie = serde_json::from_value(hit.source).map_err(|source| MapError {
                id: hit.id.clone(),
                source,
            })?;
            movie.id = hit.id;
            Ok(movie)
        })
        .collect()
}
