// Core query-building exports
pub mod composer;
pub mod limit;
pub mod ring;

pub use composer::{presence_clause, QueryComposer, QueryPlan, SqlParam, DEFAULT_SRID};
pub use limit::{LimitPolicy, DEFAULT_LIMIT, MAX_LIMIT};
pub use ring::{build_ring, vertex_token, GeometryError, Ring};
