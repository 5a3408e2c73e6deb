use serde::{Deserialize, Serialize};

/// A catalog entry as stored in the search index.
///
/// `id` is the index-assigned hit id. It is never written into the stored
/// document; the result mapper fills it in on the way out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "movie_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "99popularity", default)]
    pub popularity: f32,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub genre: Vec<String>,
    #[serde(default)]
    pub imdb_score: f32,
}

impl Movie {
    /// The document body to store: everything except the id.
    pub fn document(&self) -> Movie {
        Movie {
            id: String::new(),
            ..self.clone()
        }
    }

    pub fn has_required_fields(&self) -> bool {
        !self.name.is_empty() && !self.director.is_empty() && !self.genre.is_empty()
    }
}
