//! Service layer providing business-oriented record operations on top of models.
//! - Translates flat query-string input into typed predicates before anything
//!   reaches the store's query language.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod query;
pub mod records;
#[cfg(test)]
pub mod test_support;
