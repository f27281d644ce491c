//! Run configuration
//!
//! A run reads every entity from `{source_prefix}/{entity}/{partition}` in the
//! source location and writes it to `{dest_prefix}/{entity}/{partition}` in the
//! destination location.

use crate::decode::parse_literal;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Locations, prefixes and entities of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Source bucket or location URL
    pub source_bucket: String,
    /// Prefix of the extracts inside the source bucket
    pub source_prefix: String,
    /// Destination bucket or location URL
    pub dest_bucket: String,
    /// Prefix of the output inside the destination bucket
    pub dest_prefix: String,
    /// Partition path literal, e.g. `year=2024/month=01/day=15`
    pub partition: String,
    /// Entities to process, in order
    pub entities: Vec<String>,
}

impl PipelineConfig {
    /// Create a configuration
    pub fn new(
        source_bucket: impl Into<String>,
        source_prefix: impl Into<String>,
        dest_bucket: impl Into<String>,
        dest_prefix: impl Into<String>,
        partition: impl Into<String>,
        entities: Vec<String>,
    ) -> Self {
        Self {
            source_bucket: source_bucket.into(),
            source_prefix: source_prefix.into(),
            dest_bucket: dest_bucket.into(),
            dest_prefix: dest_prefix.into(),
            partition: partition.into(),
            entities,
        }
    }

    /// Prefix holding an entity's extracts
    pub fn source_path(&self, entity: &str) -> String {
        join_path(&[&self.source_prefix, entity, &self.partition])
    }

    /// Prefix receiving an entity's output
    pub fn target_path(&self, entity: &str) -> String {
        join_path(&[&self.dest_prefix, entity, &self.partition])
    }
}

/// Join path segments with `/`, skipping empty segments
fn join_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Parse an entity list argument
///
/// Accepts a Python-style list (`['employees', 'jobs']`), a JSON array, or
/// comma-separated names.
pub fn parse_entity_list(text: &str) -> Result<Vec<String>> {
    let trimmed = text.trim();

    let entities: Vec<String> = if trimmed.starts_with('[') || trimmed.starts_with('(') {
        match parse_literal(trimmed)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name.trim().to_string()),
                    other => Err(Error::invalid_argument(
                        "entities",
                        format!("entity names must be strings, found {other}"),
                    )),
                })
                .collect::<Result<_>>()?,
            _ => {
                return Err(Error::invalid_argument("entities", "expected a list"));
            }
        }
    } else {
        trimmed
            .split(',')
            .map(|name| name.trim().trim_matches(['\'', '"']).to_string())
            .collect()
    };

    let entities: Vec<String> = entities.into_iter().filter(|e| !e.is_empty()).collect();
    if entities.is_empty() {
        return Err(Error::invalid_argument("entities", "no entity names given"));
    }
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn config() -> PipelineConfig {
        PipelineConfig::new(
            "ib-bucket",
            "hr/raw/",
            "dlp-bucket",
            "/hr/lake",
            "year=2024/month=01/day=15",
            vec!["employees".to_string()],
        )
    }

    #[test]
    fn test_source_and_target_paths() {
        let config = config();
        assert_eq!(
            config.source_path("employees"),
            "hr/raw/employees/year=2024/month=01/day=15"
        );
        assert_eq!(
            config.target_path("employees"),
            "hr/lake/employees/year=2024/month=01/day=15"
        );
    }

    #[test]
    fn test_paths_with_empty_prefix() {
        let mut config = config();
        config.source_prefix = String::new();
        assert_eq!(
            config.source_path("jobs"),
            "jobs/year=2024/month=01/day=15"
        );
    }

    #[test_case("['employees', 'jobs']" ; "python list")]
    #[test_case(r#"["employees", "jobs"]"# ; "json array")]
    #[test_case("('employees', 'jobs',)" ; "python tuple")]
    #[test_case("employees, jobs" ; "comma separated")]
    fn test_parse_entity_list(text: &str) {
        assert_eq!(
            parse_entity_list(text).unwrap(),
            vec!["employees".to_string(), "jobs".to_string()]
        );
    }

    #[test]
    fn test_parse_entity_list_errors() {
        assert!(parse_entity_list("").is_err());
        assert!(parse_entity_list("[]").is_err());
        assert!(parse_entity_list("[1, 2]").is_err());
        assert!(parse_entity_list("['employees'").is_err());
    }
}
