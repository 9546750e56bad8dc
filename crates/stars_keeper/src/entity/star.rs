//! Star entity - one row per (repository, starred_at) event.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Star model - the moment the authenticated user starred a repository.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stars")]
pub struct Model {
    /// Deterministic identifier derived from `repository_id` and `starred_at`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// When the repository was starred (RFC 3339).
    pub starred_at: String,

    /// GitHub repository ID. Not enforced as a foreign key.
    pub repository_id: i64,

    /// The upstream star resource as fetched, serialized as JSON.
    #[sea_orm(column_type = "Text")]
    pub body: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
