//! Network graph model and builder.
//!
//! Stations are nodes; line segments and interchange transfers are directed
//! edges, always inserted in both directions.

mod builder;
mod config;
mod model;

pub use builder::GraphBuilder;
pub use config::GraphConfig;
pub use model::{
    DEFAULT_HOP_MINUTES, DEFAULT_TRANSFER_MINUTES, Edge, EdgeId, Graph, GraphError, StationNode,
};
