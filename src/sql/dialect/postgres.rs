//! PostgreSQL: `json_build_*` constructors and strict GROUP BY.

use super::SqlDialect;

#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        match name.to_uppercase().as_str() {
            "JSON_GROUP_ARRAY" => Some("JSON_AGG"),
            "JSON_OBJECT" => Some("JSON_BUILD_OBJECT"),
            "JSON_ARRAY" => Some("JSON_BUILD_ARRAY"),
            "JSON" => Some("TO_JSON"),
            _ => None,
        }
    }
}
