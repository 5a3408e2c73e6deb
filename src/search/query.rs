use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

pub const DEFAULT_FROM: usize = 0;
pub const DEFAULT_SIZE: usize = 20;
pub const MAX_SIZE: usize = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("from value must be an integer")]
    FromNotInteger,

    #[error("from value must be greater than -1")]
    FromNegative,

    #[error("size value must be an integer")]
    SizeNotInteger,

    #[error("size value must be greater than 0 and less than 100")]
    SizeOutOfRange,
}

impl QueryError {
    /// Name of the query parameter that failed.
    pub fn parameter(&self) -> &'static str {
        match self {
            QueryError::FromNotInteger | QueryError::FromNegative => "from",
            QueryError::SizeNotInteger | QueryError::SizeOutOfRange => "size",
        }
    }
}

/// Raw query string of `GET /v1/get/movie`. Every value stays a string so
/// bad numbers surface as our own validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
    pub director: Option<String>,
    #[serde(rename = "99popularity")]
    pub popularity: Option<String>,
    pub imdb_score: Option<String>,
    pub genre: Option<String>,
    pub from: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Director,
    Popularity,
    ImdbScore,
    Genre,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Director,
        Field::Popularity,
        Field::ImdbScore,
        Field::Genre,
    ];

    /// Field name in the stored document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Director => "director",
            Field::Popularity => "99popularity",
            Field::ImdbScore => "imdb_score",
            Field::Genre => "genre",
        }
    }

    fn clause(self, text: String) -> Clause {
        match self {
            Field::Genre => Clause::MatchPhrase { field: self, text },
            _ => Clause::Match { field: self, text },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Match { field: Field, text: String },
    MatchPhrase { field: Field, text: String },
}

impl Clause {
    pub fn field(&self) -> Field {
        match self {
            Clause::Match { field, .. } | Clause::MatchPhrase { field, .. } => *field,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Clause::Match { field, text } => json!({ "match": { field.as_str(): text } }),
            Clause::MatchPhrase { field, text } => json!({ "match_phrase": { field.as_str(): text } }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryBody {
    MatchAll,
    /// Every `should` clause must match, giving AND over the supplied filters.
    Bool {
        should: Vec<Clause>,
        minimum_should_match: usize,
    },
}

impl QueryBody {
    pub fn to_json(&self) -> Value {
        match self {
            QueryBody::MatchAll => json!({ "match_all": {} }),
            QueryBody::Bool {
                should,
                minimum_should_match,
            } => json!({
                "bool": {
                    "should": should.iter().map(Clause::to_json).collect::<Vec<_>>(),
                    "minimum_should_match": minimum_should_match,
                }
            }),
        }
    }

    pub fn minimum_should_match(&self) -> usize {
        match self {
            QueryBody::MatchAll => 0,
            QueryBody::Bool {
                minimum_should_match, ..
            } => *minimum_should_match,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub from: usize,
    pub size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            from: DEFAULT_FROM,
            size: DEFAULT_SIZE,
        }
    }
}

impl Pagination {
    /// Validate raw `from`/`size`. Out-of-range values are rejected, never clamped.
    pub fn parse(from: Option<&str>, size: Option<&str>) -> Result<Self, QueryError> {
        let from = match from {
            Some(raw) => {
                let n: i64 = raw.parse().map_err(|_| QueryError::FromNotInteger)?;
                if n < 0 {
                    return Err(QueryError::FromNegative);
                }
                usize::try_from(n).map_err(|_| QueryError::FromNotInteger)?
            }
            None => DEFAULT_FROM,
        };

        let size = match size {
            Some(raw) => {
                let n: i64 = raw.parse().map_err(|_| QueryError::SizeNotInteger)?;
                if !(1..=MAX_SIZE as i64).contains(&n) {
                    return Err(QueryError::SizeOutOfRange);
                }
                n as usize
            }
            None => DEFAULT_SIZE,
        };

        Ok(Self { from, size })
    }
}

/// A validated, executable search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: QueryBody,
    pub pagination: Pagination,
}

impl SearchRequest {
    pub fn to_json(&self) -> Value {
        json!({
            "query": self.query.to_json(),
            "from": self.pagination.from,
            "size": self.pagination.size,
        })
    }
}

impl SearchParams {
    /// Collect parameters from decoded `key=value` pairs. A repeated key keeps
    /// its first value and unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = SearchParams::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "name" => &mut params.name,
                "director" => &mut params.director,
                "99popularity" => &mut params.popularity,
                "imdb_score" => &mut params.imdb_score,
                "genre" => &mut params.genre,
                "from" => &mut params.from,
                "size" => &mut params.size,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }

    fn value(&self, field: Field) -> Option<&str> {
        let raw = match field {
            Field::Name => &self.name,
            Field::Director => &self.director,
            Field::Popularity => &self.popularity,
            Field::ImdbScore => &self.imdb_score,
            Field::Genre => &self.genre,
        };
        non_empty(raw)
    }

    /// Fields the caller actually supplied, in canonical order.
    pub fn present_filters(&self) -> Vec<(Field, &str)> {
        Field::ALL
            .iter()
            .filter_map(|f| self.value(*f).map(|v| (*f, v)))
            .collect()
    }

    pub fn build(&self) -> Result<SearchRequest, QueryError> {
        let should: Vec<Clause> = self
            .present_filters()
            .into_iter()
            .map(|(field, text)| field.clause(text.to_string()))
            .collect();

        let pagination = Pagination::parse(non_empty(&self.from), non_empty(&self.size))?;

        let query = if should.is_empty() {
            QueryBody::MatchAll
        } else {
            let minimum_should_match = should.len();
            QueryBody::Bool {
                should,
                minimum_should_match,
            }
        };

        tracing::debug!(query = %query.to_json(), from = pagination.from, size = pagination.size, "built movie search");
        Ok(SearchRequest { query, pagination })
    }
}

// An empty query-string value counts as not supplied.
fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|s| !s.is_empty())
}
