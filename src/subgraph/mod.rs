//! GraphQL subgraph access.
//!
//! Each DEX publishes its own subgraph with its own field names. Everything in
//! here ends at the boundary: responses are normalized into
//! [`crate::models`] types before anything else sees them.

mod client;
mod error;
mod exchange;
pub mod queries;
pub mod schema;

pub use client::SubgraphClient;
pub use error::SubgraphError;
pub use exchange::{Exchange, DEFAULT_BLOCKS_SUBGRAPH_URL};
