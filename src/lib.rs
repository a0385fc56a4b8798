//! Juso Geo - road-name address query service
//!
//! Exposes `kr_juso` address records over HTTP. The core turns a client-drawn
//! point list into a closed WKT polygon and composes it with optional region
//! filters into a single parameterized PostGIS query.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{build_ring, GeometryError, LimitPolicy, QueryComposer, QueryPlan, Ring, SqlParam};
pub use crate::models::{AddressItem, AddressRecord, GeoPoint, QueryFilter, PolygonQueryRequest};
