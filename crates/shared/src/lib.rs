//! Domain values and the API error model shared by the feed client and its fixtures.

pub mod domain;
pub mod error;
