//! SeaORM entity definitions for the stars-keeper database schema.

pub mod prelude;
pub mod repository;
pub mod star;
