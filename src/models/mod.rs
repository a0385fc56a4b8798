// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{AddressItem, AddressRecord, GeoPoint, QueryFilter, RegionSelector};
pub use requests::{AddressPath, FlagParam, LimitParam, PolygonQueryRequest, RegionQueryParams, UpdateCoordsRequest};
pub use responses::{ErrorResponse, HealthResponse, PolygonQueryResponse, RegionListResponse, UpdateCoordsResponse};
