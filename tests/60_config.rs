use std::collections::HashMap;

use imdb_api::config::{AppConfig, ConfigError, LogLevel};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key: &str| map.get(key).cloned()
}

const BASE: [(&str, &str); 3] = [
    ("DATABASE_URL", "postgres://imdb@localhost/imdb"),
    ("ELASTIC_URL", "http://localhost:9200/"),
    ("SUPER_ADMINS", " root@example.com, ,ops@example.com "),
];

#[test]
fn minimal_environment_fills_defaults() {
    let config = AppConfig::from_lookup(lookup(&BASE)).unwrap();
    assert_eq!(config.search.elastic_url, "http://localhost:9200");
    assert_eq!(config.search.movie_index, "movies");
    assert_eq!(config.api.bind_addr, "127.0.0.1:8000");
    assert_eq!(config.database.max_connections, 100);
    assert_eq!(config.log_level, LogLevel::Error);
    assert_eq!(config.security.super_admins.len(), 2);
    assert!(config.security.super_admins.contains("ops@example.com"));
    assert!(config.security.bootstrap_admin.is_none());
}

#[test]
fn each_required_variable_is_named_when_missing() {
    for missing in ["ELASTIC_URL", "SUPER_ADMINS"] {
        let vars: Vec<(&str, &str)> = BASE.iter().copied().filter(|(k, _)| *k != missing).collect();
        let err = AppConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::Missing(missing));
        assert!(err.to_string().contains(missing));
    }
}

#[test]
fn database_parts_are_required_without_url() {
    let vars: Vec<(&str, &str)> = BASE.iter().copied().filter(|(k, _)| *k != "DATABASE_URL").collect();
    let err = AppConfig::from_lookup(lookup(&vars)).unwrap_err();
    assert_eq!(err, ConfigError::Missing("SQL_HOST"));
}

#[test]
fn log_levels() {
    for (raw, expected) in [
        ("INFO", LogLevel::Info),
        ("DEBUG", LogLevel::Debug),
        ("ERROR", LogLevel::Error),
        ("TRACE", LogLevel::Error),
    ] {
        let mut vars = BASE.to_vec();
        vars.push(("LOG_LEVEL", raw));
        assert_eq!(AppConfig::from_lookup(lookup(&vars)).unwrap().log_level, expected, "{}", raw);
    }
}
