//! Common re-exports for convenient entity usage.

pub use super::repository::{
    ActiveModel as RepositoryActiveModel, Column as RepositoryColumn, Entity as Repository,
    Model as RepositoryModel,
};
pub use super::star::{
    ActiveModel as StarActiveModel, Column as StarColumn, Entity as Star, Model as StarModel,
};
