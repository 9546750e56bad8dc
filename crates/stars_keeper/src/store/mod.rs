//! Insert-or-overwrite persistence for stars and repositories.
//!
//! Each table has its own module. Every write runs in a short transaction of
//! its own, so a failing record never rolls back records committed before it.

mod errors;
pub mod repositories;
pub mod stars;

pub use errors::{Result, StoreError};
