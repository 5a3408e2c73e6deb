use axum::{
    body::Bytes,
    extract::{Query, State},
    Extension,
};

use crate::auth::{authorize, Action, Category, Principal, RequestIdentity};
use crate::error::ApiError;
use crate::middleware::{ApiMessage, ApiResult};
use crate::search::{map_hits, Movie, SearchParams};
use crate::state::AppState;

use super::decode_body;

const MISSING_FIELDS: &str = "one or more fields missing in request body, required fields: name, director, genre";
const MISSING_UPDATE_FIELDS: &str =
    "one or more fields missing in request body, required fields: movie_id, name, director, genre";

/// Decoded query string in request order, duplicates included.
type QueryPairs = Query<Vec<(String, String)>>;

// First value wins when a key repeats.
fn first_param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

/// Resolve the caller's roles and check `action` against them.
async fn require_privileged(state: &AppState, identity: &RequestIdentity, action: Action) -> Result<(), ApiError> {
    let principal = state.roles().principal(&identity.email).await;
    authorize(Some(&principal), &action).into_result()
}

/// POST /v1/add/movie
pub async fn add(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
    body: Bytes,
) -> ApiResult {
    let identity = identity.require(Category::Users)?;
    require_privileged(&state, identity, Action::CreateMovie).await?;

    let movie: Movie = decode_body(&body)?;
    if !movie.has_required_fields() {
        return Err(ApiError::validation(MISSING_FIELDS));
    }

    let id = state.index.index(&movie).await?;
    tracing::info!("{} added movie {} as {}", identity.email, movie.name, id);

    Ok(ApiMessage::created("movie added successfully").field("movie_id", id))
}

/// DELETE /v1/remove/movie?movie_id=
pub async fn remove(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
    Query(pairs): QueryPairs,
) -> ApiResult {
    let identity = identity.require(Category::Users)?;
    require_privileged(&state, identity, Action::DeleteMovie).await?;

    let movie_id = first_param(&pairs, "movie_id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::validation("movie_id required as URL param"))?;

    state.index.delete(movie_id).await?;
    tracing::info!("{} deleted movie {}", identity.email, movie_id);

    Ok(ApiMessage::ok("movie deleted successfully"))
}

/// PUT /v1/update/movie
///
/// The body carries the full document plus its `movie_id`; stored fields are
/// replaced by the ones sent.
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
    body: Bytes,
) -> ApiResult {
    let identity = identity.require(Category::Users)?;
    require_privileged(&state, identity, Action::UpdateMovie).await?;

    let movie: Movie = decode_body(&body)?;
    if !movie.has_required_fields() || movie.id.is_empty() {
        return Err(ApiError::validation(MISSING_UPDATE_FIELDS));
    }

    state.index.update(&movie.id, &movie).await?;
    tracing::info!("{} updated movie {}", identity.email, movie.id);

    Ok(ApiMessage::ok("movie updated successfully"))
}

/// GET /v1/get/movie
///
/// Any authenticated caller may search. Each present filter adds one
/// `should` clause and all of them must match.
pub async fn get(
    State(state): State<AppState>,
    Extension(identity): Extension<RequestIdentity>,
    Query(pairs): QueryPairs,
) -> ApiResult {
    let identity = identity.require(Category::Users)?;
    authorize(Some(&Principal::unprivileged(&identity.email)), &Action::ListMovies).into_result()?;

    let request = SearchParams::from_pairs(pairs).build()?;
    let hits = state.index.search(&request).await?;
    let movies = map_hits(hits)?;

    tracing::debug!("{} listed {} movies", identity.email, movies.len());
    Ok(ApiMessage::ok("request successful").field("movies", movies))
}
