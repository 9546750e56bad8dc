//! Repository entity - the latest snapshot of every starred repository.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Repository model, keyed by the GitHub repository ID.
///
/// Rows are overwritten wholesale on every sync, so they always reflect the
/// most recent fetch.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repositories")]
pub struct Model {
    /// GitHub repository ID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// The upstream repository resource as fetched, serialized as JSON.
    #[sea_orm(column_type = "Text")]
    pub body: String,

    /// Repository description.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Repository topics (stored as a JSON array).
    #[sea_orm(column_type = "Json")]
    pub topics: serde_json::Value,

    /// `owner/name`, when the upstream resource carried it.
    pub full_name: Option<String>,

    /// README contents fetched alongside the repository.
    #[sea_orm(column_type = "Text", nullable)]
    pub readme: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Topics as strings. Non-string entries are skipped.
    pub fn topic_list(&self) -> Vec<String> {
        self.topics
            .as_array()
            .map(|topics| {
                topics
                    .iter()
                    .filter_map(|t| t.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_model(topics: serde_json::Value) -> Model {
        Model {
            id: 1_296_269,
            body: "{}".to_string(),
            description: Some("My first repository".to_string()),
            topics,
            full_name: Some("octocat/Hello-World".to_string()),
            readme: None,
        }
    }

    #[test]
    fn test_topic_list() {
        let model = make_test_model(serde_json::json!(["rust", "cli"]));
        assert_eq!(model.topic_list(), vec!["rust", "cli"]);
    }

    #[test]
    fn test_topic_list_ignores_non_arrays() {
        let model = make_test_model(serde_json::json!({"not": "a list"}));
        assert!(model.topic_list().is_empty());
    }
}
