#![allow(dead_code)]

use imdb_api::auth::Principal;
use imdb_api::search::SearchParams;
use serde_json::{Map, Value};

pub fn principal(email: &str, is_admin: bool, is_super_admin: bool) -> Principal {
    Principal {
        email: email.to_string(),
        is_admin,
        is_super_admin,
    }
}

/// Build `SearchParams` from wire-named `key=value` pairs, as a query string would.
pub fn params(pairs: &[(&str, &str)]) -> SearchParams {
    let map: Map<String, Value> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();
    serde_json::from_value(Value::Object(map)).expect("search params")
}
