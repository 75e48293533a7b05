//! Deterministic fixtures for tests and demos.
//!
//! Every function is pure: two calls build two independent, field-equal values.
//! Variants are derived from a base fixture through `to_builder` or struct update
//! syntax, so only the fields that matter to a scenario are spelled out.

pub mod avatar;
pub mod comment;
pub mod id;
pub mod location;
pub mod project;
pub mod user;

#[cfg(test)]
#[path = "tests/factories_tests.rs"]
mod tests;
