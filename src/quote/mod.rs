//! Pool construction quoting: dimension calculators, KP pricing profiles,
//! cost aggregation and the HTTP routes that expose them.
//!
//! The calculation chain is pure and synchronous; only the route layer
//! touches axum. `calculators` turns validated dimensions into physical
//! quantities, `profiles` holds the builtin KP reference quotes,
//! `costing` scales reference costs to the requested size, and
//! `requests`/`responses` are the JSON DTOs.

pub mod calculators;
pub mod costing;
pub mod profiles;
pub mod requests;
pub mod responses;
pub mod routes;

pub use profiles::ProfileStore;
pub use routes::router;
